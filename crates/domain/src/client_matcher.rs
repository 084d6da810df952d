use fancy_regex::Regex;
use ipnetwork::IpNetwork;
use std::net::IpAddr;

/// One key of `clientGroupsBlock`: a client-matcher may be a literal client
/// name, a shell-style glob over client names, or a CIDR over the client IP.
#[derive(Debug, Clone)]
pub enum ClientMatcher {
    Name(String),
    Glob(Regex),
    Cidr(IpNetwork),
}

impl ClientMatcher {
    pub fn parse(raw: &str) -> Self {
        if let Ok(net) = raw.parse::<IpNetwork>() {
            return ClientMatcher::Cidr(net);
        }
        if raw.contains('*') || raw.contains('?') {
            return ClientMatcher::Glob(compile_glob(raw));
        }
        ClientMatcher::Name(raw.to_string())
    }

    /// Whether this matcher applies to a client identified by its resolved
    /// names (possibly empty) and IP address.
    pub fn matches(&self, client_names: &[String], client_ip: IpAddr) -> bool {
        match self {
            ClientMatcher::Name(name) => client_names.iter().any(|n| n.eq_ignore_ascii_case(name)),
            ClientMatcher::Glob(re) => client_names.iter().any(|n| matches!(re.is_match(n), Ok(true))),
            ClientMatcher::Cidr(net) => net.contains(client_ip),
        }
    }
}

/// Translates a shell-style glob (`*` = any run of characters, `?` = exactly
/// one) into an anchored, case-insensitive regex, mirroring how list source
/// regex patterns are compiled in the domain catalog.
fn compile_glob(pattern: &str) -> Regex {
    let mut buf = String::from("(?i)^");
    for ch in pattern.chars() {
        match ch {
            '*' => buf.push_str(".*"),
            '?' => buf.push('.'),
            other => push_escaped(&mut buf, other),
        }
    }
    buf.push('$');
    Regex::new(&buf).expect("glob-derived pattern is always a valid regex")
}

fn push_escaped(buf: &mut String, c: char) {
    if matches!(c, '.' | '^' | '$' | '|' | '(' | ')' | '[' | ']' | '{' | '}' | '+' | '\\') {
        buf.push('\\');
    }
    buf.push(c);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_matches_wildcard_suffix() {
        let m = ClientMatcher::parse("nas-*");
        assert!(m.matches(&["nas-office".to_string()], "127.0.0.1".parse().unwrap()));
        assert!(!m.matches(&["printer".to_string()], "127.0.0.1".parse().unwrap()));
    }

    #[test]
    fn glob_question_mark_matches_exactly_one_char() {
        let m = ClientMatcher::parse("nas-?");
        assert!(m.matches(&["nas-1".to_string()], "127.0.0.1".parse().unwrap()));
        assert!(!m.matches(&["nas-12".to_string()], "127.0.0.1".parse().unwrap()));
    }

    #[test]
    fn parse_prefers_cidr_over_glob() {
        assert!(matches!(ClientMatcher::parse("192.168.1.0/24"), ClientMatcher::Cidr(_)));
    }

    #[test]
    fn cidr_matcher_contains_ip() {
        let m = ClientMatcher::parse("192.168.1.0/24");
        let ip: IpAddr = "192.168.1.42".parse().unwrap();
        assert!(m.matches(&[], ip));
        let other: IpAddr = "10.0.0.1".parse().unwrap();
        assert!(!m.matches(&[], other));
    }
}
