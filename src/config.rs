use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use validator::Validate;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub server: ServerSettings,
    #[validate(nested)]
    pub identity: IdentitySettings,
    #[validate(nested)]
    pub services: ServiceSettings,
    #[serde(default)]
    #[validate(nested)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServerSettings {
    #[validate(length(min = 1))]
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Keycloak realm holding candidate and recruiter identities
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IdentitySettings {
    #[validate(url)]
    pub base_url: String,
    #[validate(length(min = 1))]
    pub realm: String,
    #[validate(length(min = 1))]
    pub admin_username: String,
    pub admin_password: String,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 1000))]
    pub page_size: usize,
}

/// Base URIs of the platform services queried during matching
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServiceSettings {
    #[validate(url)]
    pub availability_uri: String,
    #[validate(url)]
    pub offer_uri: String,
    #[validate(url)]
    pub plan_uri: String,
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MatchingSettings {
    #[serde(default = "default_availability_concurrency")]
    #[validate(range(min = 1, max = 64))]
    pub availability_concurrency: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            availability_concurrency: default_availability_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSettings {
    /// HS256 secret; bearer tokens are only decoded when unset
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingSettings {
    /// Subscriber filter for the configured level, `info` if it does not parse
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }

    pub fn is_pretty(&self) -> bool {
        self.format.eq_ignore_ascii_case("pretty")
    }
}

fn default_client_id() -> String { "admin-cli".to_string() }
fn default_page_size() -> usize { 100 }
fn default_timeout_secs() -> u64 { 10 }
fn default_availability_concurrency() -> usize { crate::core::DEFAULT_AVAILABILITY_CONCURRENCY }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

/// Deployment variables that predate the `RECRUIT__` naming scheme
const LEGACY_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("KEYCLOAK_URI", "identity.base_url"),
    ("KEYCLOAK_REALM", "identity.realm"),
    ("ADMIN_USERNAME", "identity.admin_username"),
    ("ADMIN_PASSWORD", "identity.admin_password"),
    ("CLIENT_ID", "identity.client_id"),
    ("AVAILABILITY_API_URI", "services.availability_uri"),
    ("OFFER_API_URI", "services.offer_uri"),
    ("PLAN_API_URI", "services.plan_uri"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with RECRUIT_)
    /// 4. Legacy deployment variables (KEYCLOAK_URI, OFFER_API_URI, LOG_LEVEL, ...)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with RECRUIT_)
            // e.g., RECRUIT__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("RECRUIT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings, |name| std::env::var(name).ok())?;

        settings.try_deserialize()
    }

}

/// Apply the legacy deployment variables on top of the layered config
fn substitute_env_vars<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    for (variable, key) in LEGACY_ENV_OVERRIDES {
        if let Some(value) = lookup(*variable) {
            builder = builder.set_override(*key, value)?;
        }
    }

    builder.build()
}
