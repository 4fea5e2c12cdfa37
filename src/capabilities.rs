use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::ThemeError;

pub trait CapabilitiesClient: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, ThemeError>;
}

#[derive(Clone)]
pub struct WmsHttpClient {
    client: Client,
}

impl WmsHttpClient {
    pub fn new() -> Result<Self, ThemeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("wms-themes/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| ThemeError::CapabilitiesHttp(err.to_string()))?,
        );

        // Single attempt, no retry; timeouts are left to the environment.
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| ThemeError::CapabilitiesHttp(err.to_string()))?;

        Ok(Self { client })
    }
}

impl CapabilitiesClient for WmsHttpClient {
    fn fetch(&self, url: &str) -> Result<String, ThemeError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| ThemeError::CapabilitiesHttp(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "capabilities request failed".to_string());
            return Err(ThemeError::CapabilitiesStatus { status, message });
        }

        response
            .text()
            .map_err(|err| ThemeError::CapabilitiesHttp(err.to_string()))
    }
}
