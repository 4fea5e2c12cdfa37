use camino::Utf8PathBuf;

pub const PUBLIC_URL_ENV: &str = "PUBLIC_WMS_URL";

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub capabilities_url: String,
    pub theme_key: String,
    pub themes_template: Utf8PathBuf,
    pub config_template: Utf8PathBuf,
    pub themes_output: Utf8PathBuf,
    pub config_output: Utf8PathBuf,
    pub public_url: Option<String>,
}

/// Read once at entry-point assembly; empty values count as unset.
pub fn public_url_from_env() -> Option<String> {
    std::env::var(PUBLIC_URL_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
