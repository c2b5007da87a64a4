use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// Backend origin; the client appends `/api/v1`.
    pub api_base: String,
    pub log_level: String,
    /// Directory holding the durable cart and session namespaces.
    pub data_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// WhatsApp number for checkout hand-off, country code included, no `+`.
    pub whatsapp_phone: String,
    pub low_stock_threshold: u32,
    /// Page size used when pulling the whole catalogue for local filtering.
    pub catalogue_fetch_limit: u32,
    /// Pre-seeded bearer token; takes precedence over the stored one.
    pub api_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("api_base", &self.api_base)
            .field("log_level", &self.log_level)
            .field("data_dir", &self.data_dir)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("whatsapp_phone", &self.whatsapp_phone)
            .field("low_stock_threshold", &self.low_stock_threshold)
            .field("catalogue_fetch_limit", &self.catalogue_fetch_limit)
            .field("api_token", &self.api_token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}
