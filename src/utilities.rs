//! Small stateless helpers shared by plots and the store

use crate::{PlotskiError, Result};
use std::path::Path;
use std::process::Command;
use uuid::Uuid;

/// Get the minimum and maximum of a slice, ignoring NaN values
///
/// Returns `None` when the slice holds no finite-comparable values.
pub fn get_min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Combine several (min, max) extents into one
pub fn merge_extents(extents: &[(f64, f64)]) -> Option<(f64, f64)> {
    extents.iter().copied().reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
}

/// Random, unique identifier (uuid v4 as 32 hex characters)
pub fn get_unique_str() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Calculate plot height from an array shape so the plot keeps its aspect ratio
///
/// The shape is read as `(height, width, ...)`. Returns `(plot_height, plot_width)`
/// where the width is unchanged.
pub fn calculate_aspect_ratio(shape: &[usize], plot_width: u32) -> Result<(u32, u32)> {
    if shape.len() < 2 {
        return Err(PlotskiError::ValidationError(
            "In order to calculate the aspect ratio of the plot, the shape must have two elements (h, w)"
                .to_string(),
        ));
    }
    let (height, width) = (shape[0], shape[1]);
    if width == 0 {
        return Err(PlotskiError::ValidationError(
            "Cannot calculate the aspect ratio of an array with zero width".to_string(),
        ));
    }
    let plot_height = ((height as f64 / width as f64) * plot_width as f64) as u32;
    Ok((plot_height, plot_width))
}

/// Fit an array shape into a square box of `max_dim` pixels
///
/// Height follows the aspect ratio at `max_dim` width; when that exceeds
/// `max_dim` the height is capped and the width shrinks by the same ratio.
pub fn fit_dimensions(shape: &[usize], max_dim: u32) -> Result<(u32, u32)> {
    let (mut plot_height, mut plot_width) = calculate_aspect_ratio(shape, max_dim)?;
    if plot_height > max_dim {
        let ratio = max_dim as f64 / plot_height as f64;
        plot_height = max_dim;
        plot_width = (plot_width as f64 * ratio) as u32;
    }
    Ok((plot_height, plot_width))
}

/// Pad the upper end of a range by a multiplicative factor (e.g. 1.05 for 5%)
pub fn pad_max((lo, hi): (f64, f64), factor: f64) -> (f64, f64) {
    (lo, hi * factor)
}

/// Open a file in the default browser using the platform opener
pub fn open_in_browser(path: &Path) -> Result<()> {
    let mut cmd = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        Command::new("xdg-open")
    };
    cmd.arg(path);

    tracing::debug!("Opening {} in the browser", path.display());
    cmd.spawn().map(|_| ()).map_err(|e| {
        PlotskiError::WriterError(format!("Failed to open {} in the browser: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_min_max() {
        assert_eq!(get_min_max(&[3.0, -1.0, 7.5, 2.0]), Some((-1.0, 7.5)));
        assert_eq!(get_min_max(&[4.0]), Some((4.0, 4.0)));
        assert_eq!(get_min_max(&[]), None);
    }

    #[test]
    fn test_get_min_max_ignores_nan() {
        assert_eq!(get_min_max(&[f64::NAN, 1.0, 2.0]), Some((1.0, 2.0)));
        assert_eq!(get_min_max(&[f64::NAN]), None);
    }

    #[test]
    fn test_merge_extents() {
        assert_eq!(merge_extents(&[(0.0, 5.0), (-2.0, 3.0)]), Some((-2.0, 5.0)));
        assert_eq!(merge_extents(&[]), None);
    }

    #[test]
    fn test_unique_str() {
        let a = get_unique_str();
        let b = get_unique_str();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_calculate_aspect_ratio() {
        assert_eq!(calculate_aspect_ratio(&[100, 200], 600).unwrap(), (300, 600));
        assert_eq!(calculate_aspect_ratio(&[50, 50, 4], 600).unwrap(), (600, 600));
        assert!(calculate_aspect_ratio(&[10], 600).is_err());
    }

    #[test]
    fn test_fit_dimensions_caps_height() {
        // tall image: 1200 x 600 at width 600 would be 1200 high
        assert_eq!(fit_dimensions(&[1200, 600], 600).unwrap(), (600, 300));
        // wide image keeps the full width
        assert_eq!(fit_dimensions(&[100, 400], 600).unwrap(), (150, 600));
    }

    #[test]
    fn test_pad_max() {
        assert_eq!(pad_max((0.0, 100.0), 1.05), (0.0, 105.0));
    }
}
