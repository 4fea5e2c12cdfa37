use crate::error::ThemeError;
use crate::xml::Element;

#[derive(Debug, Clone, PartialEq)]
pub struct LayerNode {
    pub name: String,
    pub title: String,
    pub crs: Vec<String>,
}

pub fn root_service_layer(capabilities: &Element) -> Result<&Element, ThemeError> {
    capabilities
        .find("Capability")
        .and_then(|capability| capability.find("Layer"))
        .ok_or_else(|| {
            ThemeError::CapabilitiesParse("no root layer in Capability section".to_string())
        })
}

/// Named layers one level below the root service layer. Unnamed entries are
/// group headers and not selectable, so they are dropped; deeper nesting is
/// not descended into.
pub fn extract_layers(capabilities: &Element) -> Result<Vec<LayerNode>, ThemeError> {
    let root_layer = root_service_layer(capabilities)?;
    let layers = root_layer
        .sequence("Layer")
        .filter_map(|layer| {
            let name = layer.child_text("Name")?;
            let title = layer.child_text("Title").unwrap_or(name);
            let crs = layer
                .sequence("CRS")
                .chain(layer.sequence("SRS"))
                .map(|entry| entry.text.trim().to_string())
                .filter(|entry| !entry.is_empty())
                .collect();
            Some(LayerNode {
                name: name.to_string(),
                title: title.to_string(),
                crs,
            })
        })
        .collect();
    Ok(layers)
}
