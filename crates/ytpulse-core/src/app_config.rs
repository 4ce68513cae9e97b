use std::net::SocketAddr;

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
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub youtube_api_key: String,
    pub youtube_base_url: String,
    pub request_timeout_secs: u64,
    /// Dashboard origins allowed by CORS. Entries may use a `https://*.host`
    /// wildcard to match any subdomain.
    pub cors_origins: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("youtube_api_key", &"[redacted]")
            .field("youtube_base_url", &self.youtube_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}
