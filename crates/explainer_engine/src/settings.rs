use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(4000);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
}

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Delay between a non-terminal status response and the next poll.
    pub poll_interval: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url"),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl BackendSettings {
    /// Settings pointing at `base_url`, which must be an http(s) URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, SettingsError> {
        let invalid = |reason: String| SettingsError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let parsed = Url::parse(base_url).map_err(|err| invalid(err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
        }
        if parsed.cannot_be_a_base() {
            return Err(invalid("not a base url".to_string()));
        }
        Ok(Self {
            base_url: parsed,
            ..Self::default()
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Result<Self, SettingsError> {
        if poll_interval.is_zero() {
            return Err(SettingsError::ZeroPollInterval);
        }
        self.poll_interval = poll_interval;
        Ok(self)
    }

    /// Absolute URL for `segments` below the base URL. Segments are
    /// percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_below_base_path() {
        let settings = BackendSettings::with_base_url("http://host:8000/explainer/").unwrap();
        assert_eq!(
            settings.endpoint(&["api", "status", "a b/c"]).as_str(),
            "http://host:8000/explainer/api/status/a%20b%2Fc"
        );

        let settings = BackendSettings::with_base_url("http://host:8000").unwrap();
        assert_eq!(
            settings.endpoint(&["api", "generate"]).as_str(),
            "http://host:8000/api/generate"
        );
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            BackendSettings::with_base_url("ftp://host"),
            Err(SettingsError::InvalidBaseUrl { .. })
        ));
        assert!(BackendSettings::with_base_url("not a url").is_err());
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let err = BackendSettings::default()
            .with_poll_interval(Duration::ZERO)
            .unwrap_err();
        assert_eq!(err, SettingsError::ZeroPollInterval);
    }
}
