use serde::{Deserialize, Serialize};

/// Token-signing configuration, loaded as the `auth` section of the server
/// config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthnConfig {
    /// HS256 signing secret. Must be overridden in any real deployment.
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_secs: u64,
    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_secs: u64,
}

const fn default_access_ttl() -> u64 {
    3600
}

const fn default_refresh_ttl() -> u64 {
    7 * 86400
}

impl Default for AuthnConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "insecure-dev-secret-change-me-please".to_string(),
            access_ttl_secs: default_access_ttl(),
            refresh_ttl_secs: default_refresh_ttl(),
        }
    }
}
