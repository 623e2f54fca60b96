use serde::Deserialize;

/// How the balance lookup service authenticates requests.
///
/// Deployments carry either a static API key header or a sign-in account
/// that is exchanged for a bearer token before every query. Credentials are
/// configuration owned by the operator; nothing is hard-coded here.
#[derive(Debug, Clone, Deserialize)]
pub enum AuthMode {
    /// `apiKey` header on the lookup request.
    ApiKey(String),
    /// Exchanged for a bearer token via the sign-in collaborator.
    Credentials { access_id: String, password: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Base URL of the IN100 lookup API (sign-in + balance finder).
    pub in100_base_url: String,
    pub auth: AuthMode,
    /// Base URL of the bank registry used for enrichment.
    pub bank_registry_base_url: String,
    /// Base URL of the hosted persistence service (PostgREST-style).
    pub persistence_base_url: String,
    /// API key for the persistence service.
    pub persistence_api_key: String,
    /// URL answering `{"ip": "..."}` for the origin-IP column. Optional;
    /// absent means `127.0.0.1` is recorded.
    pub ip_lookup_url: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            in100_base_url: require_url("IN100_BASE_URL")?,
            auth: auth_from_env()?,
            bank_registry_base_url: std::env::var("BANK_REGISTRY_BASE_URL")
                .unwrap_or_else(|_| "https://brasilapi.com.br".to_string()),
            persistence_base_url: require_url("SUPABASE_URL")?,
            persistence_api_key: require_non_empty("SUPABASE_ANON_KEY")?,
            ip_lookup_url: std::env::var("IP_LOOKUP_URL")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("IN100 Base URL: {}", config.in100_base_url);
        tracing::debug!("Bank Registry Base URL: {}", config.bank_registry_base_url);
        tracing::debug!("Server Port: {}", config.port);
        match config.auth {
            AuthMode::ApiKey(_) => tracing::info!("Auth mode: static API key"),
            AuthMode::Credentials { ref access_id, .. } => {
                tracing::info!("Auth mode: sign-in credentials ({})", access_id)
            }
        }

        Ok(config)
    }
}

fn auth_from_env() -> anyhow::Result<AuthMode> {
    if let Ok(key) = std::env::var("IN100_API_KEY") {
        if !key.trim().is_empty() {
            return Ok(AuthMode::ApiKey(key));
        }
    }
    let access_id = std::env::var("IN100_ACCESS_ID").map_err(|_| {
        anyhow::anyhow!("IN100_API_KEY or IN100_ACCESS_ID/IN100_PASSWORD required")
    })?;
    let password = std::env::var("IN100_PASSWORD")
        .map_err(|_| anyhow::anyhow!("IN100_PASSWORD environment variable required"))?;
    if access_id.trim().is_empty() || password.trim().is_empty() {
        anyhow::bail!("IN100_ACCESS_ID and IN100_PASSWORD cannot be empty");
    }
    Ok(AuthMode::Credentials {
        access_id,
        password,
    })
}

fn require_non_empty(name: &str) -> anyhow::Result<String> {
    std::env::var(name)
        .map_err(|_| anyhow::anyhow!("{} environment variable required", name))
        .and_then(|value| {
            if value.trim().is_empty() {
                anyhow::bail!("{} cannot be empty", name);
            }
            Ok(value)
        })
}

fn require_url(name: &str) -> anyhow::Result<String> {
    let url = require_non_empty(name)?;
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("{} must start with http:// or https://", name);
    }
    Ok(url)
}
