use serde::Serialize;

use crate::xml::Element;

pub const GEOGRAPHIC_CRS: &str = "EPSG:4326";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundingBox {
    pub crs: String,
    pub bounds: [f64; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtentInfo {
    pub map_crs: Option<String>,
    pub extent: [f64; 4],
    pub bbox: Option<BoundingBox>,
}

impl ExtentInfo {
    pub fn center(&self) -> [f64; 2] {
        [
            (self.extent[0] + self.extent[2]) / 2.0,
            (self.extent[1] + self.extent[3]) / 2.0,
        ]
    }
}

/// First BoundingBox of the root service layer whose corners all parse as
/// finite numbers wins; no preference among CRSs. Falls back to the
/// EX_GeographicBoundingBox (always EPSG:4326), then to nothing.
pub fn resolve_extent(capabilities: &Element) -> Option<ExtentInfo> {
    let root_layer = capabilities.find("Capability")?.find("Layer")?;

    for candidate in root_layer.sequence("BoundingBox") {
        let Some(bounds) = attr_bounds(candidate) else {
            continue;
        };
        let crs = candidate
            .attr("CRS")
            .or_else(|| candidate.attr("SRS"))
            .map(str::to_string);
        return Some(ExtentInfo {
            map_crs: crs.clone(),
            extent: bounds,
            bbox: crs.map(|crs| BoundingBox { crs, bounds }),
        });
    }

    let geographic = root_layer.find("EX_GeographicBoundingBox")?;
    let bounds = [
        finite(geographic.child_text("westBoundLongitude")?)?,
        finite(geographic.child_text("southBoundLatitude")?)?,
        finite(geographic.child_text("eastBoundLongitude")?)?,
        finite(geographic.child_text("northBoundLatitude")?)?,
    ];
    Some(ExtentInfo {
        map_crs: Some(GEOGRAPHIC_CRS.to_string()),
        extent: bounds,
        bbox: Some(BoundingBox {
            crs: GEOGRAPHIC_CRS.to_string(),
            bounds,
        }),
    })
}

fn attr_bounds(element: &Element) -> Option<[f64; 4]> {
    Some([
        finite(element.attr("minx")?)?,
        finite(element.attr("miny")?)?,
        finite(element.attr("maxx")?)?,
        finite(element.attr("maxy")?)?,
    ])
}

fn finite(value: &str) -> Option<f64> {
    let parsed: f64 = value.trim().parse().ok()?;
    parsed.is_finite().then_some(parsed)
}
