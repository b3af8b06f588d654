use super::matcher::normalize_host;
use crate::error::GuardError;
use std::time::Duration;
use url::Url;

/// One configured blocklist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlocklistSource {
    pub raw: String,
    /// Normalized hostname used for matching.
    pub host: String,
}

impl BlocklistSource {
    /// Accepts a bare hostname or a URL (its hostname is taken). Strict:
    /// anything else is a ConfigurationError, never silently coerced.
    pub fn parse(raw: &str) -> Result<Self, GuardError> {
        let raw = raw.trim();
        let host = if raw.contains("://") {
            let url = Url::parse(raw)
                .map_err(|e| GuardError::Configuration(format!("invalid source '{raw}': {e}")))?;
            let host = url.host_str().ok_or_else(|| {
                GuardError::Configuration(format!("source '{raw}' has no hostname"))
            })?;
            normalize_host(host)?
        } else {
            normalize_host(raw)?
        };
        Ok(Self {
            raw: raw.to_string(),
            host,
        })
    }
}

/// The active polling configuration, replaced wholesale on every
/// reconfiguration.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub sources: Vec<BlocklistSource>,
    pub interval: Duration,
}

impl PollConfig {
    /// Parses a newline- or comma-separated source list. Entries are
    /// trimmed, empty entries dropped. All-or-nothing: one invalid entry
    /// fails the whole parse so a bad edit never half-applies.
    pub fn parse(raw_source_list: &str, interval_seconds: u64) -> Result<Self, GuardError> {
        let sources = raw_source_list
            .split(|c| c == '\n' || c == ',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(BlocklistSource::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            sources,
            interval: Duration::from_secs(interval_seconds),
        })
    }

    /// An inert config never schedules work: no sources, or no interval.
    pub fn is_inert(&self) -> bool {
        self.sources.is_empty() || self.interval.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_newline_and_comma_separated() {
        let config = PollConfig::parse("youtube.com\n vimeo.com ,, \n", 60).unwrap();
        let hosts: Vec<&str> = config.sources.iter().map(|s| s.host.as_str()).collect();
        assert_eq!(hosts, vec!["youtube.com", "vimeo.com"]);
        assert_eq!(config.interval, Duration::from_secs(60));
        assert!(!config.is_inert());
    }

    #[test]
    fn test_parse_url_sources() {
        let source = BlocklistSource::parse("https://www.youtube.com/feeds").unwrap();
        assert_eq!(source.host, "youtube.com");
    }

    #[test]
    fn test_invalid_entry_rejects_whole_list() {
        assert!(PollConfig::parse("good.example\nbad host", 60).is_err());
    }

    #[test]
    fn test_inert_configs() {
        assert!(PollConfig::parse("", 60).unwrap().is_inert());
        assert!(PollConfig::parse(" \n , ", 60).unwrap().is_inert());
        assert!(PollConfig::parse("youtube.com", 0).unwrap().is_inert());
    }
}
