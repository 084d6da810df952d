use super::regex_catalog::{RegexCatalog, RegexCatalogBuilder};
use super::string_catalog::{StringCatalog, StringCatalogBuilder};
use blocky_domain::request::Request;

/// A single token parsed out of a list source line (§4.2): either a literal
/// domain or a `/…/`-delimited regex body.
pub enum ListToken {
    Exact(String),
    Regex(String),
}

/// Combined string + regex matcher for one group's deny or allow list
/// (§3, §4.4). Built once per refresh cycle and swapped in atomically by
/// the catalog manager.
pub struct DomainCatalog {
    strings: StringCatalog,
    regexes: RegexCatalog,
}

impl DomainCatalog {
    pub fn empty() -> Self {
        Self { strings: StringCatalog::empty(), regexes: RegexCatalog::empty() }
    }

    pub fn len(&self) -> usize {
        self.strings.len() + self.regexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn matches_exact(&self, name: &str) -> bool {
        self.strings.contains(name) || self.regexes.matches(name)
    }

    /// Walks from the full query name up towards the root, testing each
    /// suffix, per the §4.4 chained-match invariant: while the candidate
    /// still contains a dot, test it; on miss, drop the leftmost label and
    /// retry. A bare single-label name is never tested.
    pub fn matches_chain(&self, name: &str) -> bool {
        let mut cur = name;
        while cur.contains('.') {
            if self.matches_exact(cur) {
                return true;
            }
            match Request::parent_label(cur) {
                Some(parent) => cur = parent,
                None => break,
            }
        }
        false
    }
}

#[derive(Default)]
pub struct DomainCatalogBuilder {
    strings: StringCatalogBuilder,
    regexes: RegexCatalogBuilder,
}

impl DomainCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: ListToken) {
        match token {
            ListToken::Exact(domain) => self.strings.insert(&domain.to_ascii_lowercase()),
            ListToken::Regex(pattern) => self.regexes.insert(&pattern),
        }
    }

    pub fn invalid_regex_count(&self) -> usize {
        self.regexes.invalid_patterns().len()
    }

    pub fn build(self) -> DomainCatalog {
        DomainCatalog { strings: self.strings.build(), regexes: self.regexes.build() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(exact: &[&str], regex: &[&str]) -> DomainCatalog {
        let mut b = DomainCatalogBuilder::new();
        for d in exact {
            b.insert(ListToken::Exact((*d).to_string()));
        }
        for r in regex {
            b.insert(ListToken::Regex((*r).to_string()));
        }
        b.build()
    }

    #[test]
    fn literal_match() {
        let cat = catalog(&["ads.example.com"], &[]);
        assert!(cat.matches_chain("ads.example.com"));
    }

    #[test]
    fn subdomain_matches_parent_suffix() {
        let cat = catalog(&["doubleclick.net"], &[]);
        assert!(cat.matches_chain("ad.track.doubleclick.net"));
        assert!(!cat.matches_chain("doubleclick.net.example.com"));
    }

    #[test]
    fn unrelated_domain_no_match() {
        let cat = catalog(&["doubleclick.net"], &[]);
        assert!(!cat.matches_chain("example.com"));
    }

    #[test]
    fn single_label_never_matches() {
        let cat = catalog(&["localhost"], &[]);
        assert!(!cat.matches_chain("localhost"));
    }

    #[test]
    fn regex_entries_match() {
        let cat = catalog(&[], &[r"^ad[0-9]+\.example\.com$"]);
        assert!(cat.matches_chain("ad7.example.com"));
        assert!(!cat.matches_chain("adx.example.com"));
    }
}
