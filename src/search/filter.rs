//! Pre-verification candidate filter.

/// A cheap rule that rejects a candidate without touching the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// First character is an ASCII digit.
    LeadingDigit,
}

impl Rule {
    fn rejects(self, candidate: &str) -> bool {
        match self {
            Self::LeadingDigit => candidate.as_bytes().first().is_some_and(u8::is_ascii_digit),
        }
    }
}

/// Set of rejection rules. Pure: the verdict depends only on the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    rules: Vec<Rule>,
}

impl Filter {
    /// A filter that accepts every candidate.
    pub fn none() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        }
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn reject(&self, candidate: &str) -> bool {
        self.rules.iter().any(|rule| rule.rejects(candidate))
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::none().with_rule(Rule::LeadingDigit)
    }
}
