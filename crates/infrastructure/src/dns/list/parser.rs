use crate::dns::catalog::ListToken;
use blocky_domain::validators::validate_domain;
use std::net::IpAddr;

/// Strips a `#` comment (full-line or trailing) and surrounding whitespace.
/// Returns `None` for blank/comment-only lines.
fn strip_comment(line: &str) -> Option<&str> {
    let without_comment = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };
    let trimmed = without_comment.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Parses one list line into a token, accepting hosts-file syntax
/// (`<ip> <hostname>` → hostname) alongside bare domains and `/…/` regexes
/// (§4.2). Returns `Err` with a short reason for malformed lines so the
/// caller can count them against `maxErrorsPerSource`.
pub fn parse_list_line(raw: &str) -> Result<Option<ListToken>, String> {
    let Some(line) = strip_comment(raw) else {
        return Ok(None);
    };

    if let Some(body) = line.strip_prefix('/').and_then(|s| s.strip_suffix('/')) {
        if body.is_empty() {
            return Err("empty regex body".to_string());
        }
        return Ok(Some(ListToken::Regex(body.to_string())));
    }

    let domain = match line.split_whitespace().collect::<Vec<_>>().as_slice() {
        [single] => single.to_string(),
        [first, second] if first.parse::<IpAddr>().is_ok() => second.to_string(),
        _ => return Err(format!("unrecognized list line: {line}")),
    };

    validate_domain(&domain)?;
    Ok(Some(ListToken::Exact(domain)))
}

/// Parses a whole list source's text, aborting with an error once malformed
/// lines exceed `max_errors`. Returns the successfully parsed tokens and the
/// count of malformed lines skipped along the way.
pub fn parse_list_text(text: &str, max_errors: u32) -> Result<(Vec<ListToken>, u32), String> {
    let mut tokens = Vec::new();
    let mut errors = 0u32;
    for line in text.lines() {
        match parse_list_line(line) {
            Ok(Some(token)) => tokens.push(token),
            Ok(None) => {}
            Err(_) => {
                errors += 1;
                if errors > max_errors {
                    return Err(format!("exceeded maxErrorsPerSource ({max_errors}) while parsing list"));
                }
            }
        }
    }
    Ok((tokens, errors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_domain() {
        assert!(matches!(parse_list_line("doubleclick.net").unwrap(), Some(ListToken::Exact(d)) if d == "doubleclick.net"));
    }

    #[test]
    fn parses_hosts_file_syntax() {
        let tok = parse_list_line("0.0.0.0 ads.example.com").unwrap().unwrap();
        assert!(matches!(tok, ListToken::Exact(d) if d == "ads.example.com"));
    }

    #[test]
    fn parses_regex_entry() {
        let tok = parse_list_line(r"/^ad[0-9]+\.example\.com$/").unwrap().unwrap();
        assert!(matches!(tok, ListToken::Regex(p) if p == r"^ad[0-9]+\.example\.com$"));
    }

    #[test]
    fn skips_comments_and_blanks() {
        assert!(parse_list_line("# a whole comment").unwrap().is_none());
        assert!(parse_list_line("   ").unwrap().is_none());
        let tok = parse_list_line("doubleclick.net # inline comment").unwrap().unwrap();
        assert!(matches!(tok, ListToken::Exact(d) if d == "doubleclick.net"));
    }

    #[test]
    fn aborts_past_max_errors() {
        let text = "not a domain at all\nanother bad !! line\nyet.another.bad.!!.one\n";
        let result = parse_list_text(text, 1);
        assert!(result.is_err());
    }

    #[test]
    fn tolerates_errors_under_threshold() {
        let text = "doubleclick.net\nbad !! line\nheise.de\n";
        let (tokens, errors) = parse_list_text(text, 2).unwrap();
        assert_eq!(errors, 1);
        assert_eq!(tokens.len(), 2);
    }
}
