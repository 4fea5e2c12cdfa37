use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ThemeError;
use crate::extent::{BoundingBox, ExtentInfo};
use crate::layers::LayerNode;

pub const WMS_VERSION: &str = "1.3.0";
pub const IMAGE_FORMAT: &str = "image/png";
const SERVICE_PARAM: &str = "MAP";

#[derive(Debug, Clone, Serialize)]
pub struct Sublayer {
    pub name: String,
    pub title: String,
    pub visibility: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub crs: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeEntry {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub url: String,
    pub version: String,
    pub format: String,
    pub transparent: bool,
    pub tiled: bool,
    pub sublayers: Vec<Sublayer>,
    pub default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<[f64; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_crs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_bbox: Option<BoundingBox>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemesStore {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub subdirs: Vec<Value>,
    #[serde(default, rename = "backgroundLayers")]
    pub background_layers: Vec<Value>,
}

/// Legacy on-disk shapes of the themes store: a bare sequence, a sequence
/// wrapped under a `themes` key, or the canonical structure under `themes`.
/// Anything else normalizes to an empty canonical store.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ThemesDocument {
    Bare(Vec<Value>),
    Wrapped { themes: ThemesSection },
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ThemesSection {
    Canonical(ThemesStore),
    Bare(Vec<Value>),
}

impl ThemesDocument {
    pub fn normalize(self) -> ThemesStore {
        match self {
            ThemesDocument::Bare(items) => ThemesStore {
                items,
                ..ThemesStore::default()
            },
            ThemesDocument::Wrapped {
                themes: ThemesSection::Canonical(store),
            } => store,
            ThemesDocument::Wrapped {
                themes: ThemesSection::Bare(items),
            } => ThemesStore {
                items,
                ..ThemesStore::default()
            },
            ThemesDocument::Other(_) => ThemesStore::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ThemesConfigDocument {
    Object {
        #[serde(default)]
        themes: ConfigThemes,
    },
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ConfigThemes {
    Sequence(Vec<Value>),
    Other(Value),
}

impl Default for ConfigThemes {
    fn default() -> Self {
        ConfigThemes::Sequence(Vec::new())
    }
}

impl ThemesConfigDocument {
    pub fn normalize(self) -> Vec<Value> {
        match self {
            ThemesConfigDocument::Object {
                themes: ConfigThemes::Sequence(themes),
            } => themes,
            _ => Vec::new(),
        }
    }
}

/// Scheme, host and path of the capabilities URL, plus the single
/// service-identifying query parameter when present. An explicit override
/// always wins over the derived URL.
pub fn derive_service_url(
    capabilities_url: &str,
    override_url: Option<&str>,
) -> Result<String, ThemeError> {
    if let Some(url) = override_url {
        return Ok(url.to_string());
    }

    let mut parsed = Url::parse(capabilities_url)
        .map_err(|err| ThemeError::InvalidUrl(format!("{capabilities_url}: {err}")))?;
    let service_param = parsed
        .query_pairs()
        .find(|(key, _)| key == SERVICE_PARAM)
        .map(|(_, value)| value.into_owned());

    parsed.set_fragment(None);
    parsed.set_query(None);
    if let Some(value) = service_param {
        parsed.query_pairs_mut().append_pair(SERVICE_PARAM, &value);
    }
    Ok(parsed.to_string())
}

pub fn build_theme_entry(
    key: &str,
    url: &str,
    layers: &[LayerNode],
    extent: Option<&ExtentInfo>,
) -> ThemeEntry {
    let sublayers = layers
        .iter()
        .enumerate()
        .map(|(index, layer)| Sublayer {
            name: layer.name.clone(),
            title: layer.title.clone(),
            visibility: index == 0,
            crs: layer.crs.clone(),
        })
        .collect();

    ThemeEntry {
        id: key.to_string(),
        name: key.to_string(),
        title: key.to_string(),
        abstract_text: format!("Layers from {key}"),
        url: url.to_string(),
        version: WMS_VERSION.to_string(),
        format: IMAGE_FORMAT.to_string(),
        transparent: true,
        tiled: false,
        sublayers,
        default: true,
        extent: extent.map(|info| info.extent),
        map_crs: extent.and_then(|info| info.map_crs.clone()),
        center: extent.map(|info| info.center()),
        initial_bbox: extent.and_then(|info| info.bbox.clone()),
    }
}
