/// A lowercased domain label is well-formed if non-empty and contains only
/// letters, digits, hyphens, and internal dots (no leading/trailing dot).
pub fn validate_domain(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("domain name cannot be empty".to_string());
    }
    if name.starts_with('.') || name.ends_with('.') && name.len() > 1 {
        return Err(format!("domain name '{name}' has a stray leading/trailing dot"));
    }
    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_' || c == '*');
    if !valid {
        return Err(format!("domain name '{name}' contains invalid characters"));
    }
    Ok(())
}

pub fn validate_url(url: &str) -> Result<(), String> {
    if url.len() > 2048 {
        return Err("URL cannot exceed 2048 characters".to_string());
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err("URL must start with http:// or https://".to_string());
    }
    Ok(())
}
