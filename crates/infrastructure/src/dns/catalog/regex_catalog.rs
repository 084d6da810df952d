use fancy_regex::Regex;

/// Compiled `/…/` patterns from a list source (§4.2). Matching is linear in
/// pattern count — lists are expected to carry far more exact strings than
/// regexes, so this sub-catalog stays small in practice.
pub struct RegexCatalog {
    patterns: Vec<Regex>,
}

impl RegexCatalog {
    pub fn matches(&self, s: &str) -> bool {
        self.patterns.iter().any(|re| matches!(re.is_match(s), Ok(true)))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn empty() -> Self {
        Self { patterns: Vec::new() }
    }
}

#[derive(Default)]
pub struct RegexCatalogBuilder {
    patterns: Vec<Regex>,
    invalid: Vec<String>,
}

impl RegexCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A malformed pattern is dropped and recorded rather than failing the
    /// whole source load (§4.5 per-source partial-failure semantics).
    pub fn insert(&mut self, pattern: &str) {
        match Regex::new(pattern) {
            Ok(re) => self.patterns.push(re),
            Err(_) => self.invalid.push(pattern.to_string()),
        }
    }

    pub fn invalid_patterns(&self) -> &[String] {
        &self.invalid
    }

    pub fn build(self) -> RegexCatalog {
        RegexCatalog { patterns: self.patterns }
    }
}
