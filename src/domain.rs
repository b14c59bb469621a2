//! Domain extraction
//!
//! Rules are matched against the authority of a URL (`host[:port]`), never
//! against its path or query.

use url::Url;

/// Extract the `host[:port]` authority of an absolute URL.
///
/// The host is taken as the URL parser leaves it (lowercased, default port
/// dropped). Anything that does not parse as an absolute URL with a host
/// yields an empty string, which callers treat as "no rule can match".
pub fn extract_domain(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };

    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://api.github.com/x", "api.github.com" ; "plain host")]
    #[test_case("http://localhost:3000/y", "localhost:3000" ; "host with port")]
    #[test_case("https://api.example.com:8443/v1?q=1", "api.example.com:8443" ; "port with query")]
    #[test_case("https://API.Example.COM/path", "api.example.com" ; "host is lowercased")]
    #[test_case("https://example.com:443/", "example.com" ; "default port dropped")]
    #[test_case("http://127.0.0.1:8080", "127.0.0.1:8080" ; "ipv4 with port")]
    fn test_extract_domain(url: &str, expected: &str) {
        assert_eq!(extract_domain(url), expected);
    }

    #[test_case("not a url" ; "free text")]
    #[test_case("" ; "empty")]
    #[test_case("api.github.com/x" ; "missing scheme")]
    #[test_case("https://" ; "missing host")]
    #[test_case("mailto:someone@example.com" ; "no authority")]
    fn test_extract_domain_malformed(url: &str) {
        assert_eq!(extract_domain(url), "");
    }
}
