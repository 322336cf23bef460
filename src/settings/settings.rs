use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub auth: Auth,
    pub search: Search,
    pub session: Session,
    pub http: Http,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub app_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_base: String,
    pub token_url: String,
    #[serde(default = "default_state_ttl_secs")]
    pub state_ttl_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Search {
    pub backend: String, // "fake" or "real"
    pub site: String,
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Session {
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

fn default_state_ttl_secs() -> u64 {
    600
}

fn default_sort() -> String {
    "price_asc".to_string()
}

fn default_limit() -> u32 {
    20
}

fn default_api_base() -> String {
    "https://api.mercadolibre.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_idle_ttl_secs() -> u64 {
    1800
}

fn default_sweep_interval_secs() -> u64 {
    60
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        // e.g. MELI_AUTH__CLIENT_SECRET overrides auth.client_secret
        .add_source(Environment::with_prefix("MELI").separator("__"))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<()> {
    let required = [
        ("auth.app_id", &settings.auth.app_id),
        ("auth.client_secret", &settings.auth.client_secret),
        ("auth.redirect_uri", &settings.auth.redirect_uri),
        ("auth.auth_base", &settings.auth.auth_base),
        ("auth.token_url", &settings.auth.token_url),
        ("search.site", &settings.search.site),
        ("http.address", &settings.http.address),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(anyhow!("setting '{}' must not be empty", name));
        }
    }
    Ok(())
}
