//! Colormaps and colour utilities
//!
//! Heatmap plots map intensities through a colormap. A colormap is looked up
//! by name (case insensitive, `_r` suffix reverses it), expanded into a
//! 256-entry palette and paired with low/high limits in a [`ColorMapper`].

use palette::{FromColor, IntoColor, LinSrgb, Mix, Oklab, Srgb};
use serde::{Deserialize, Serialize};

use crate::source::ImageArray;
use crate::utilities::get_min_max;
use crate::{PlotskiError, Result};

/// Number of entries in a palette generated from a colormap
pub const PALETTE_SIZE: usize = 256;

// =============================================================================
// Sequential colormaps (control points)
// =============================================================================

pub const VIRIDIS: &[&str] = &[
    "#440154", "#482878", "#3e4a89", "#31688e", "#26828e",
    "#1f9e89", "#35b779", "#6ece58", "#b5de2b", "#fde725",
];

pub const PLASMA: &[&str] = &[
    "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786",
    "#d8576b", "#ed7953", "#fb9f3a", "#fdca26", "#f0f921",
];

pub const MAGMA: &[&str] = &[
    "#000004", "#180f3d", "#440f76", "#721f81", "#9e2f7f",
    "#cd4071", "#f1605d", "#fd9668", "#feca8d", "#fcfdbf",
];

pub const INFERNO: &[&str] = &[
    "#000004", "#1b0c41", "#4a0c6b", "#781c6d", "#a52c60",
    "#cf4446", "#ed6925", "#fb9b06", "#f7d13d", "#fcffa4",
];

pub const CIVIDIS: &[&str] = &[
    "#00224e", "#123570", "#3b496c", "#575d6d", "#707173",
    "#8a8678", "#a59c74", "#c3b369", "#e1cc55", "#fdea45",
];

pub const GREYS: &[&str] = &["#ffffff", "#000000"];

pub const GRAY: &[&str] = &["#000000", "#ffffff"];

pub const HOT: &[&str] = &["#0b0000", "#ff0000", "#ffff00", "#ffffff"];

pub const BLUES: &[&str] = &[
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6",
    "#4292c6", "#2171b5", "#08519c", "#08306b",
];

pub const REDS: &[&str] = &[
    "#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a",
    "#ef3b2c", "#cb181d", "#a50f15", "#67000d",
];

// =============================================================================
// Diverging colormaps
// =============================================================================

pub const RDBU: &[&str] = &[
    "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7",
    "#f7f7f7", "#d1e5f0", "#92c5de", "#4393c3", "#2166ac", "#053061",
];

pub const SPECTRAL: &[&str] = &[
    "#9e0142", "#d53e4f", "#f46d43", "#fdae61", "#fee08b",
    "#ffffbf", "#e6f598", "#abdda4", "#66c2a5", "#3288bd", "#5e4fa2",
];

pub const COOLWARM: &[&str] = &["#3b4cc0", "#dddddd", "#b40426"];

// =============================================================================
// Categorical palette (multi-line defaults)
// =============================================================================

pub const CATEGORY10: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

const COLORMAPS: &[(&str, &[&str])] = &[
    ("viridis", VIRIDIS),
    ("plasma", PLASMA),
    ("magma", MAGMA),
    ("inferno", INFERNO),
    ("cividis", CIVIDIS),
    ("greys", GREYS),
    ("gray", GRAY),
    ("hot", HOT),
    ("blues", BLUES),
    ("reds", REDS),
    ("rdbu", RDBU),
    ("spectral", SPECTRAL),
    ("coolwarm", COOLWARM),
];

/// Names of all known colormaps (without the `_r` variants)
pub fn colormap_names() -> Vec<&'static str> {
    COLORMAPS.iter().map(|(name, _)| *name).collect()
}

/// Look up colormap control points by name; `<name>_r` returns them reversed
pub fn get_colormap(name: &str) -> Option<Vec<&'static str>> {
    let lower = name.to_lowercase();
    let (base, reversed) = match lower.strip_suffix("_r") {
        Some(base) => (base, true),
        None => (lower.as_str(), false),
    };
    let stops = COLORMAPS
        .iter()
        .find(|(n, _)| *n == base)
        .map(|(_, stops)| stops.to_vec())?;
    Some(if reversed {
        stops.into_iter().rev().collect()
    } else {
        stops
    })
}

// =============================================================================
// Colour parsing and interpolation
// =============================================================================

/// Convert a CSS color name/value to hex format
pub fn color_to_hex(value: &str) -> Result<String> {
    csscolorparser::parse(value)
        .map(|c| c.to_css_hex())
        .map_err(|e| PlotskiError::ValidationError(format!("Invalid color '{}': {}", value, e)))
}

/// Interpolate between colour stops in Oklab, returning `count` hex colours
pub fn interpolate_colors(colors: &[&str], count: usize) -> Result<Vec<String>> {
    if colors.is_empty() {
        return Err(PlotskiError::ValidationError(
            "At least one color is required".to_string(),
        ));
    }
    if count == 0 {
        return Ok(vec![]);
    }

    let stops: Vec<Oklab<f32>> = colors
        .iter()
        .map(|c| parse_to_srgb(c).map(|s| Oklab::from_color(LinSrgb::from(s))))
        .collect::<Result<_>>()?;

    if stops.len() == 1 || count == 1 {
        let lin: LinSrgb<f32> = stops[0].into_color();
        return Ok(vec![srgb_to_hex(&Srgb::from(lin)); count]);
    }

    let segments = stops.len() - 1;
    Ok((0..count)
        .map(|i| {
            let t = i as f32 / (count - 1) as f32;
            let position = t * segments as f32;
            let segment = (position.floor() as usize).min(segments - 1);
            let mixed = stops[segment].mix(stops[segment + 1], position - segment as f32);
            let lin: LinSrgb<f32> = mixed.into_color();
            srgb_to_hex(&Srgb::from(lin))
        })
        .collect())
}

fn parse_to_srgb(color: &str) -> Result<Srgb<f32>> {
    let parsed = csscolorparser::parse(color)
        .map_err(|e| PlotskiError::ValidationError(format!("Invalid color '{}': {}", color, e)))?;
    Ok(Srgb::new(parsed.r as f32, parsed.g as f32, parsed.b as f32))
}

fn srgb_to_hex(color: &Srgb<f32>) -> String {
    let r = (color.red.clamp(0.0, 1.0) * 255.0).round() as u8;
    let g = (color.green.clamp(0.0, 1.0) * 255.0).round() as u8;
    let b = (color.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

// =============================================================================
// Colour mapper
// =============================================================================

/// Linear mapping of intensities onto a palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorMapper {
    pub palette: Vec<String>,
    pub low: f64,
    pub high: f64,
}

impl ColorMapper {
    /// Palette entry for an intensity, clamped to the mapper limits
    pub fn color_for(&self, value: f64) -> Option<&str> {
        if self.palette.is_empty() || value.is_nan() {
            return None;
        }
        let span = self.high - self.low;
        let t = if span > 0.0 {
            ((value - self.low) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let idx = (t * (self.palette.len() - 1) as f64).round() as usize;
        self.palette.get(idx).map(String::as_str)
    }
}

/// Convert a colormap name into a palette and a linear colour mapper for `image`
///
/// Limits default to the image's own extent; `z_min`/`z_max` override them.
pub fn convert_colormap_to_mapper(
    image: &ImageArray,
    cmap: &str,
    z_min: Option<f64>,
    z_max: Option<f64>,
) -> Result<(Vec<String>, ColorMapper)> {
    let stops = get_colormap(cmap).ok_or_else(|| {
        PlotskiError::ValidationError(format!(
            "Unknown colormap '{}'. Available colormaps: {}",
            cmap,
            colormap_names().join(", ")
        ))
    })?;
    let palette = interpolate_colors(&stops, PALETTE_SIZE)?;

    let (data_min, data_max) = get_min_max(&image.values()).unwrap_or((0.0, 1.0));
    let mapper = ColorMapper {
        palette: palette.clone(),
        low: z_min.unwrap_or(data_min),
        high: z_max.unwrap_or(data_max),
    };
    Ok((palette, mapper))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_get_colormap() {
        assert!(get_colormap("viridis").is_some());
        assert!(get_colormap("VIRIDIS").is_some()); // case insensitive
        assert!(get_colormap("unknown").is_none());
    }

    #[test]
    fn test_get_colormap_reversed() {
        let forward = get_colormap("magma").unwrap();
        let reversed = get_colormap("magma_r").unwrap();
        assert_eq!(forward.first(), reversed.last());
        assert_eq!(forward.len(), reversed.len());
    }

    #[test]
    fn test_color_to_hex() {
        assert_eq!(color_to_hex("red").unwrap(), "#ff0000");
        assert_eq!(color_to_hex("#F00").unwrap(), "#ff0000");
        assert!(color_to_hex("notacolor").is_err());
    }

    #[test]
    fn test_interpolate_colors_endpoints() {
        let colors = interpolate_colors(&["red", "white", "blue"], 5).unwrap();
        assert_eq!(colors.len(), 5);
        assert_eq!(colors[0], "#ff0000");
        assert_eq!(colors[2], "#ffffff");
        assert_eq!(colors[4], "#0000ff");
    }

    #[test]
    fn test_interpolate_colors_edge_cases() {
        assert!(interpolate_colors(&[], 5).is_err());
        assert!(interpolate_colors(&["red"], 0).unwrap().is_empty());
        assert_eq!(interpolate_colors(&["red"], 2).unwrap(), vec!["#ff0000"; 2]);
        assert!(interpolate_colors(&["red", "notacolor"], 3).is_err());
    }

    #[test]
    fn test_convert_colormap_to_mapper() {
        let image: ImageArray = Array2::from_shape_vec((2, 2), vec![0.0, 5.0, 10.0, 20.0])
            .unwrap()
            .into();

        let (palette, mapper) = convert_colormap_to_mapper(&image, "viridis", None, None).unwrap();
        assert_eq!(palette.len(), PALETTE_SIZE);
        assert_eq!(palette[0], "#440154");
        assert_eq!(mapper.low, 0.0);
        assert_eq!(mapper.high, 20.0);

        let (_, mapper) =
            convert_colormap_to_mapper(&image, "viridis", Some(-1.0), Some(1.0)).unwrap();
        assert_eq!((mapper.low, mapper.high), (-1.0, 1.0));

        assert!(convert_colormap_to_mapper(&image, "jet-ish", None, None).is_err());
    }

    #[test]
    fn test_color_mapper_clamps() {
        let mapper = ColorMapper {
            palette: vec!["#000000".into(), "#808080".into(), "#ffffff".into()],
            low: 0.0,
            high: 10.0,
        };
        assert_eq!(mapper.color_for(-5.0), Some("#000000"));
        assert_eq!(mapper.color_for(5.0), Some("#808080"));
        assert_eq!(mapper.color_for(50.0), Some("#ffffff"));
        assert_eq!(mapper.color_for(f64::NAN), None);
    }
}
