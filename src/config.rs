//! Runtime configuration, read once from the environment at startup.
//!
//! Only the pieces worth overriding live here (site URLs for testing against
//! a local server, headful mode for watching the browser). Timeouts and
//! selectors are fixed constants in the modules that use them.

const DEFAULT_BASE_URL: &str = "https://orbi.kr";
const DEFAULT_LOGIN_URL: &str = "https://login.orbi.kr/login";

#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Site root for the listing and modify pages, no trailing slash.
    pub base_url: String,
    /// Full URL of the login form.
    pub login_url: String,
    /// Headless unless `ORBISWEEP_HEADFUL=1`.
    pub headless: bool,
}

impl SweepConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("ORBISWEEP_BASE_URL")
            .map(|url| normalize_base_url(&url))
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let login_url = std::env::var("ORBISWEEP_LOGIN_URL")
            .unwrap_or_else(|_| DEFAULT_LOGIN_URL.to_string());

        let headless = std::env::var("ORBISWEEP_HEADFUL").map_or(true, |v| v != "1");

        Self {
            base_url,
            login_url,
            headless,
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            headless: true,
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_orbi() {
        let config = SweepConfig::default();
        assert_eq!(config.base_url, "https://orbi.kr");
        assert_eq!(config.login_url, "https://login.orbi.kr/login");
        assert!(config.headless);
    }

    #[test]
    fn base_url_loses_trailing_slashes() {
        assert_eq!(normalize_base_url("http://127.0.0.1:8080/"), "http://127.0.0.1:8080");
        assert_eq!(normalize_base_url("  https://orbi.kr  "), "https://orbi.kr");
    }
}
