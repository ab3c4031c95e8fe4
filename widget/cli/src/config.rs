/// Harness configuration resolved from the environment.
///
/// Command-line flags take precedence over these values.
pub struct HarnessConfig {
    pub tenant_id: Option<String>,
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub log_level: String,
}

impl HarnessConfig {
    pub fn from_env() -> Self {
        Self {
            tenant_id: std::env::var("DOCWING_TENANT_ID").ok(),
            api_key: std::env::var("DOCWING_API_KEY").ok(),
            api_base_url: std::env::var("DOCWING_API_BASE_URL").ok(),
            log_level: std::env::var("DOCWING_LOG").unwrap_or_else(|_| "warn".to_string()),
        }
    }
}
