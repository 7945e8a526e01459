/// Runtime settings for Daybook, read once at startup.
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_PAGE_PREFIX: &str = "delta_ops_summary_";
pub const DEFAULT_PAGE_POSTFIX: &str = ".pdf";
pub const DEFAULT_PAGE_TITLE: &str = "Files in folder";
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_API_HOST: &str = "0.0.0.0";
pub const DEFAULT_API_PORT: u16 = 8000;

/// Settings shared by the fetcher and the web handlers.
///
/// Built with [`Settings::from_env`] in the binaries. Tests use
/// [`Settings::from_lookup`] with a fixture map instead of mutating the
/// process environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// URL fetched by the downloader (`DOWNLOAD_PAGE`).
    pub download_page: Option<String>,
    pub page_prefix: String,
    pub page_postfix: String,
    /// Folder holding every stored file (`DESTINATION_FOLDER`).
    pub destination_folder: Option<PathBuf>,
    /// Files per listing page, always > 0.
    pub page_size: usize,
    pub page_title: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub api_host: String,
    pub api_port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset for the two settings that are checked for presence.
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let page_size = match lookup("PAGE_SIZE") {
            None => DEFAULT_PAGE_SIZE,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!("Invalid PAGE_SIZE {:?}, using {}", raw, DEFAULT_PAGE_SIZE);
                    DEFAULT_PAGE_SIZE
                }
            },
        };

        let request_timeout = lookup("FETCH_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);
        let connect_timeout = lookup("FETCH_CONNECT_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
        let api_port = lookup("API_PORT")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_API_PORT);

        Self {
            download_page: non_empty("DOWNLOAD_PAGE"),
            page_prefix: lookup("PAGE_PREFIX").unwrap_or_else(|| DEFAULT_PAGE_PREFIX.to_string()),
            page_postfix: lookup("PAGE_POSTFIX").unwrap_or_else(|| DEFAULT_PAGE_POSTFIX.to_string()),
            destination_folder: non_empty("DESTINATION_FOLDER").map(PathBuf::from),
            page_size,
            page_title: lookup("PAGE_TITLE").unwrap_or_else(|| DEFAULT_PAGE_TITLE.to_string()),
            request_timeout: Duration::from_secs(request_timeout),
            connect_timeout: Duration::from_secs(connect_timeout),
            api_host: lookup("API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.to_string()),
            api_port,
        }
    }

    /// Folder the fetcher writes into; the current directory when unset.
    pub fn fetch_folder(&self) -> PathBuf {
        self.destination_folder
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// `host:port` the API binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.download_page.is_none());
        assert!(s.destination_folder.is_none());
        assert_eq!(s.page_prefix, "delta_ops_summary_");
        assert_eq!(s.page_postfix, ".pdf");
        assert_eq!(s.page_size, 20);
        assert_eq!(s.page_title, "Files in folder");
        assert_eq!(s.request_timeout, Duration::from_secs(60));
        assert_eq!(s.fetch_folder(), PathBuf::from("."));
        assert_eq!(s.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_overrides() {
        let s = settings(&[
            ("DOWNLOAD_PAGE", "https://example.com/report"),
            ("PAGE_PREFIX", "ops_"),
            ("PAGE_POSTFIX", ".html"),
            ("DESTINATION_FOLDER", "/srv/reports"),
            ("PAGE_SIZE", "5"),
            ("PAGE_TITLE", "Reports"),
            ("FETCH_TIMEOUT_SECS", "3"),
            ("API_PORT", "9090"),
        ]);
        assert_eq!(s.download_page.as_deref(), Some("https://example.com/report"));
        assert_eq!(s.page_prefix, "ops_");
        assert_eq!(s.page_postfix, ".html");
        assert_eq!(s.fetch_folder(), PathBuf::from("/srv/reports"));
        assert_eq!(s.page_size, 5);
        assert_eq!(s.page_title, "Reports");
        assert_eq!(s.request_timeout, Duration::from_secs(3));
        assert_eq!(s.api_port, 9090);
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let s = settings(&[("DOWNLOAD_PAGE", ""), ("DESTINATION_FOLDER", "  ")]);
        assert!(s.download_page.is_none());
        assert!(s.destination_folder.is_none());
    }

    #[test]
    fn test_bad_page_size_falls_back() {
        assert_eq!(settings(&[("PAGE_SIZE", "0")]).page_size, 20);
        assert_eq!(settings(&[("PAGE_SIZE", "ten")]).page_size, 20);
        assert_eq!(settings(&[("PAGE_SIZE", " 7 ")]).page_size, 7);
    }
}
