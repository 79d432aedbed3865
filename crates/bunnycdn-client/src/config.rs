//! Client configuration

use crate::{ClientError, Result};
use std::fmt;
use std::time::Duration;

/// Root of the account management API
pub const MANAGEMENT_API_BASE: &str = "https://bunnycdn.com/api/";

/// Storage host used for the default (Falkenstein) region
pub const STORAGE_API_HOST: &str = "storage.bunnycdn.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

fn default_user_agent() -> String {
    format!("bunnycdn-client/{}", env!("CARGO_PKG_VERSION"))
}

fn required_env(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| ClientError::Config(format!("missing environment variable {}", name)))
}

/// Configuration for [`ManagementClient`](crate::ManagementClient)
#[derive(Clone)]
pub struct ManagementConfig {
    /// Account API key, sent as the `AccessKey` header
    pub api_key: String,
    /// API root, `https://bunnycdn.com/api/` unless overridden
    pub endpoint: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: MANAGEMENT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }
}

impl ManagementConfig {
    /// Create a new config with the given account API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Read `BUNNYCDN_API_KEY` and, optionally, `BUNNYCDN_API_ENDPOINT`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(required_env("BUNNYCDN_API_KEY")?);
        if let Ok(endpoint) = std::env::var("BUNNYCDN_API_ENDPOINT") {
            config.endpoint = endpoint;
        }
        Ok(config)
    }

    /// Point the client at a different API root
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl fmt::Debug for ManagementConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagementConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Configuration for [`StorageClient`](crate::StorageClient)
#[derive(Clone)]
pub struct StorageConfig {
    /// Storage zone password, sent as the `AccessKey` header
    pub access_key: String,
    /// Name of the storage zone
    pub storage_zone: String,
    /// Region code such as `ny` or `sg`; empty or `de` selects the default host
    pub region: String,
    /// Storage host override, bypassing the region mapping
    pub endpoint: Option<String>,
    /// Time allowed to establish a connection
    pub connect_timeout: Duration,
    /// Longest pause allowed between two reads; a transfer that keeps
    /// making progress is never cut off by it
    pub read_timeout: Duration,
    /// Optional deadline for a whole request, body transfer included
    pub timeout: Option<Duration>,
    /// User agent string
    pub user_agent: String,
}

impl StorageConfig {
    /// Create a new config for the default region
    pub fn new(access_key: impl Into<String>, storage_zone: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            storage_zone: storage_zone.into(),
            region: "de".to_string(),
            endpoint: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_TIMEOUT,
            timeout: None,
            user_agent: default_user_agent(),
        }
    }

    /// Read `BUNNYCDN_STORAGE_KEY`, `BUNNYCDN_STORAGE_ZONE` and, optionally,
    /// `BUNNYCDN_STORAGE_REGION`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(
            required_env("BUNNYCDN_STORAGE_KEY")?,
            required_env("BUNNYCDN_STORAGE_ZONE")?,
        );
        if let Ok(region) = std::env::var("BUNNYCDN_STORAGE_REGION") {
            config.region = region;
        }
        Ok(config)
    }

    /// Set the region code. Any string is accepted.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Use a fixed storage host instead of the one derived from the region
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the idle timeout between reads
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Cap every request, transfers included, at `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Host serving this zone, without the zone path
    pub fn storage_host(&self) -> String {
        if let Some(endpoint) = &self.endpoint {
            return endpoint.clone();
        }

        let region = self.region.trim();
        if region.is_empty() || region.eq_ignore_ascii_case("de") {
            format!("https://{}/", STORAGE_API_HOST)
        } else {
            format!("https://{}.{}/", region, STORAGE_API_HOST)
        }
    }

    /// Base URL of the zone, e.g. `https://storage.bunnycdn.com/<zone>/`
    pub fn base_url(&self) -> String {
        format!(
            "{}/{}/",
            self.storage_host().trim_end_matches('/'),
            self.storage_zone.trim_matches('/')
        )
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("access_key", &"<redacted>")
            .field("storage_zone", &self.storage_zone)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_region_base_url() {
        let config = StorageConfig::new("key", "assets");
        assert_eq!(config.base_url(), "https://storage.bunnycdn.com/assets/");

        let config = StorageConfig::new("key", "assets").with_region("");
        assert_eq!(config.base_url(), "https://storage.bunnycdn.com/assets/");

        let config = StorageConfig::new("key", "assets").with_region("DE");
        assert_eq!(config.base_url(), "https://storage.bunnycdn.com/assets/");
    }

    #[test]
    fn test_regional_base_url() {
        let config = StorageConfig::new("key", "assets").with_region("ny");
        assert_eq!(config.base_url(), "https://ny.storage.bunnycdn.com/assets/");

        // Unknown codes are passed through untouched
        let config = StorageConfig::new("key", "assets").with_region("zz");
        assert_eq!(config.base_url(), "https://zz.storage.bunnycdn.com/assets/");
    }

    #[test]
    fn test_endpoint_override() {
        let config = StorageConfig::new("key", "assets")
            .with_region("ny")
            .with_endpoint("http://127.0.0.1:9000/");
        assert_eq!(config.base_url(), "http://127.0.0.1:9000/assets/");
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let management = format!("{:?}", ManagementConfig::new("super-secret"));
        let storage = format!("{:?}", StorageConfig::new("zone-secret", "assets"));

        assert!(!management.contains("super-secret"));
        assert!(!storage.contains("zone-secret"));
        assert!(storage.contains("assets"));
    }

    #[test]
    fn test_management_defaults() {
        let config = ManagementConfig::new("key").with_timeout(Duration::from_secs(5));
        assert_eq!(config.endpoint, MANAGEMENT_API_BASE);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.user_agent.starts_with("bunnycdn-client/"));
    }

    #[test]
    fn test_storage_transfers_have_no_total_deadline_by_default() {
        let config = StorageConfig::new("key", "assets");
        assert_eq!(config.timeout, None);
        assert_eq!(config.read_timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));

        let config = config
            .with_read_timeout(Duration::from_secs(5))
            .with_timeout(Duration::from_secs(600));
        assert_eq!(config.read_timeout, Duration::from_secs(5));
        assert_eq!(config.timeout, Some(Duration::from_secs(600)));
    }
}
