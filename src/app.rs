use serde::Serialize;
use tracing::info;

use crate::capabilities::CapabilitiesClient;
use crate::config::RunConfig;
use crate::error::ThemeError;
use crate::merge;
use crate::theme;
use crate::xml;
use crate::{extent, layers};

#[derive(Debug, Clone, Serialize)]
pub struct MergeResult {
    pub theme: String,
    pub layers: usize,
    pub replaced: bool,
    pub themes_path: String,
    pub config_path: String,
}

#[derive(Clone)]
pub struct App<C: CapabilitiesClient> {
    capabilities: C,
}

impl<C: CapabilitiesClient> App<C> {
    pub fn new(capabilities: C) -> Self {
        Self { capabilities }
    }

    pub fn run(&self, config: &RunConfig) -> Result<MergeResult, ThemeError> {
        info!(url = %config.capabilities_url, "fetching capabilities");
        let body = self.capabilities.fetch(&config.capabilities_url)?;
        let document = xml::parse(&body)?;

        let layer_nodes = layers::extract_layers(&document)?;
        let extent_info = extent::resolve_extent(&document);
        info!(
            theme = %config.theme_key,
            layers = layer_nodes.len(),
            extent = extent_info.is_some(),
            "extracted capabilities metadata"
        );

        let url =
            theme::derive_service_url(&config.capabilities_url, config.public_url.as_deref())?;
        let entry = theme::build_theme_entry(
            &config.theme_key,
            &url,
            &layer_nodes,
            extent_info.as_ref(),
        );

        let summary = merge::merge_theme(config, entry)?;
        info!(theme = %summary.theme, items = summary.items, "wrote themes store");

        Ok(MergeResult {
            theme: summary.theme,
            layers: layer_nodes.len(),
            replaced: summary.replaced,
            themes_path: config.themes_output.to_string(),
            config_path: config.config_output.to_string(),
        })
    }
}
