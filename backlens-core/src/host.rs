// Referring-domain normalization

use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("URL '{0}' has no host")]
    MissingHost(String),
}

/// Hostname of `source` with a single leading `www.` removed.
/// URLs that parse without a host (`mailto:`, `file:`) give `MissingHost`.
pub fn referring_domain(source: &str) -> Result<String, HostError> {
    let parsed = Url::parse(source).map_err(|e| HostError::InvalidUrl {
        url: source.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(strip_www(host).to_string()),
        _ => Err(HostError::MissingHost(source.to_string())),
    }
}

/// Strips one literal leading `www.`, never more.
pub fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Everything after the last dot, or the whole host when it has none.
pub fn top_level_domain(host: &str) -> &str {
    host.rsplit('.').next().unwrap_or(host)
}

/// Reduce user input such as `https://www.example.com/blog/` to `example.com`.
pub fn clean_domain(input: &str) -> String {
    let mut rest = input.trim();
    for scheme in ["https://", "http://"] {
        if let Some(stripped) = strip_prefix_ignore_case(rest, scheme) {
            rest = stripped;
            break;
        }
    }
    if let Some(stripped) = strip_prefix_ignore_case(rest, "www.") {
        rest = stripped;
    }

    rest.trim_end_matches('/')
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referring_domain_strips_single_www() {
        assert_eq!(referring_domain("http://www.example.com/a").unwrap(), "example.com");
        assert_eq!(referring_domain("https://example.com/b?c=d").unwrap(), "example.com");
        assert_eq!(referring_domain("http://www.www.example.com/").unwrap(), "www.example.com");
    }

    #[test]
    fn test_referring_domain_only_strips_leading_www() {
        assert_eq!(
            referring_domain("http://blog.www.example.com/").unwrap(),
            "blog.www.example.com"
        );
    }

    #[test]
    fn test_referring_domain_lowercases_host() {
        assert_eq!(referring_domain("HTTP://WWW.Example.COM/Path").unwrap(), "example.com");
    }

    #[test]
    fn test_referring_domain_invalid() {
        assert!(matches!(
            referring_domain("not a url"),
            Err(HostError::InvalidUrl { .. })
        ));
        assert!(matches!(referring_domain(""), Err(HostError::InvalidUrl { .. })));
    }

    #[test]
    fn test_referring_domain_without_host() {
        assert!(matches!(
            referring_domain("mailto:someone@example.com"),
            Err(HostError::MissingHost(_))
        ));
        assert!(matches!(
            referring_domain("file:///tmp/links.html"),
            Err(HostError::MissingHost(_))
        ));
    }

    #[test]
    fn test_top_level_domain() {
        assert_eq!(top_level_domain("example.com"), "com");
        assert_eq!(top_level_domain("news.bbc.co.uk"), "uk");
        assert_eq!(top_level_domain("localhost"), "localhost");
    }

    #[test]
    fn test_clean_domain() {
        assert_eq!(clean_domain("https://www.example.com/blog/"), "example.com");
        assert_eq!(clean_domain("example.com///"), "example.com");
        assert_eq!(clean_domain("  http://sub.example.com/a/b "), "sub.example.com");
        assert_eq!(clean_domain("www.example.com"), "example.com");
    }
}
