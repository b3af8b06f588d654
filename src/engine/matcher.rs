use crate::error::GuardError;
use url::{Host, Url};

/// Normalizes a hostname for comparison: lowercase, drop a trailing dot,
/// strip one leading "www.". Rejects anything `url` does not accept as a
/// host, so loosely-typed input never coerces silently.
pub fn normalize_host(raw: &str) -> Result<String, GuardError> {
    let trimmed = raw.trim().trim_end_matches('.').to_lowercase();
    if trimmed.is_empty() {
        return Err(GuardError::Configuration("empty hostname".to_string()));
    }
    Host::parse(&trimmed)
        .map_err(|e| GuardError::Configuration(format!("invalid hostname '{raw}': {e}")))?;
    let host = trimmed.strip_prefix("www.").unwrap_or(&trimmed);
    if host.is_empty() {
        return Err(GuardError::Configuration(format!("invalid hostname '{raw}'")));
    }
    Ok(host.to_string())
}

/// Extracts the normalized origin hostname from a content URL.
pub fn host_of_url(origin_url: &str) -> Result<String, GuardError> {
    let url = Url::parse(origin_url).map_err(|e| GuardError::SourceFetch {
        source_id: origin_url.to_string(),
        message: format!("invalid URL: {e}"),
    })?;
    let host = url.host_str().ok_or_else(|| GuardError::SourceFetch {
        source_id: origin_url.to_string(),
        message: "URL has no hostname".to_string(),
    })?;
    normalize_host(host)
}

/// Exact equality of already-normalized hostnames. No substring containment,
/// no subdomain wildcarding: "youtube.com" must not match
/// "notyoutube.com.evil.example".
pub fn hosts_match(source_host: &str, item_host: &str) -> bool {
    source_host == item_host
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_www_and_case() {
        assert_eq!(normalize_host("WWW.YouTube.com").unwrap(), "youtube.com");
        assert_eq!(normalize_host("vimeo.com.").unwrap(), "vimeo.com");
        assert_eq!(normalize_host("  videos.example  ").unwrap(), "videos.example");
    }

    #[test]
    fn test_normalize_keeps_non_www_subdomains() {
        assert_eq!(normalize_host("videos.blocked.com").unwrap(), "videos.blocked.com");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_host("").is_err());
        assert!(normalize_host("   ").is_err());
        assert!(normalize_host("exa mple.com").is_err());
        assert!(normalize_host("http://not-a-bare-host/path").is_err());
    }

    #[test]
    fn test_host_of_url() {
        assert_eq!(
            host_of_url("https://www.youtube.com/watch?v=x").unwrap(),
            "youtube.com"
        );
        assert!(host_of_url("not a url").is_err());
        assert!(host_of_url("file:///tmp/x").is_err());
    }

    #[test]
    fn test_match_is_exact_not_substring() {
        assert!(hosts_match("youtube.com", "youtube.com"));
        assert!(!hosts_match("youtube.com", "notyoutube.com.evil.example"));
        assert!(!hosts_match("blocked.com", "videos.blocked.com"));
    }
}
