//! Lexicographic candidate enumeration.

use super::alphabet::Alphabet;

/// Every string of a fixed length over an alphabet, in lexicographic order.
///
/// Position 0 is the most significant. The iterator keeps an index vector
/// and advances it with carry propagation; it ends once the carry runs past
/// position 0, right after the all-last-character candidate.
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    alphabet: &'a [u8],
    indices: Vec<usize>,
    remaining: u64,
    done: bool,
}

impl<'a> Candidates<'a> {
    pub fn new(alphabet: &'a Alphabet, length: usize) -> Self {
        Self {
            alphabet: alphabet.as_bytes(),
            indices: vec![0; length],
            // Saturates only for spaces that the config rejects anyway.
            remaining: alphabet.search_space(length).unwrap_or(u64::MAX),
            done: false,
        }
    }

    fn current(&self) -> String {
        self.indices
            .iter()
            .map(|&i| self.alphabet[i] as char)
            .collect()
    }

    /// Advance to the successor. Returns false when the carry overflows.
    fn advance(&mut self) -> bool {
        let base = self.alphabet.len();
        for slot in self.indices.iter_mut().rev() {
            *slot += 1;
            if *slot < base {
                return true;
            }
            *slot = 0;
        }
        false
    }
}

impl Iterator for Candidates<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        let candidate = self.current();
        self.done = !self.advance();
        self.remaining = self.remaining.saturating_sub(1);
        Some(candidate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}
