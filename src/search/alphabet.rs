//! Candidate alphabet.

use super::error::ConfigError;

const DIGITS_UPPER: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[cfg(feature = "lowercase")]
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

/// Ordered set of distinct ASCII characters.
///
/// Candidates are enumerated in the order the characters appear here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<u8>,
}

impl Alphabet {
    pub fn new(chars: &str) -> Result<Self, ConfigError> {
        let mut seen = [false; 128];
        for c in chars.chars() {
            if !c.is_ascii() {
                return Err(ConfigError::NonAsciiAlphabet(c));
            }
            let slot = &mut seen[c as usize];
            if *slot {
                return Err(ConfigError::DuplicateAlphabetChar(c));
            }
            *slot = true;
        }
        if chars.len() < 2 {
            return Err(ConfigError::AlphabetTooSmall(chars.len()));
        }
        Ok(Self {
            chars: chars.as_bytes().to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.chars
    }

    /// Number of candidates of `length` characters, `None` on overflow.
    pub fn search_space(&self, length: usize) -> Option<u64> {
        let length = u32::try_from(length).ok()?;
        (self.chars.len() as u64).checked_pow(length)
    }
}

impl Default for Alphabet {
    /// `0`-`9` then `A`-`Z`, followed by `a`-`z` with the `lowercase` feature.
    fn default() -> Self {
        let mut chars = DIGITS_UPPER.as_bytes().to_vec();
        #[cfg(feature = "lowercase")]
        chars.extend_from_slice(LOWER.as_bytes());
        Self { chars }
    }
}
