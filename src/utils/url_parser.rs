/// Extract the host (and port) from a URL string, e.g. for the page header.
pub fn hostname_from_url(u: &str) -> String {
    let s = u.trim();
    if s.is_empty() {
        return "".into();
    }
    let s = if let Some(idx) = s.find("://") { &s[idx + 3..] } else { s };
    let host = s.split(['/', '?', '#']).next().unwrap_or(s);
    host.rsplit('@').next().unwrap_or(host).to_string()
}

#[cfg(test)]
mod tests {
    use super::hostname_from_url;

    #[test]
    fn strips_scheme_path_and_credentials() {
        assert_eq!(hostname_from_url("https://api.example.com/api/products"), "api.example.com");
        assert_eq!(hostname_from_url("http://user:pw@localhost:5000?x=1"), "localhost:5000");
        assert_eq!(hostname_from_url("  "), "");
    }
}
