/// Parse a boolean flag (form checkbox, env var, query value).
/// Missing or blank values yield `default`.
pub fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_lowercase()) {
        Some(t) if !t.is_empty() => matches!(t.as_str(), "1" | "true" | "yes" | "on"),
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::parse_flag;

    #[test]
    fn checkbox_and_text_values() {
        assert!(parse_flag(Some("on"), false));
        assert!(parse_flag(Some(" TRUE "), false));
        assert!(!parse_flag(Some("false"), true));
        assert!(!parse_flag(Some("off"), true));
        assert!(parse_flag(Some("   "), true));
        assert!(!parse_flag(None, false));
    }
}
