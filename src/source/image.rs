//! N-dimensional image arrays carried by `image` fields

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

/// Element type of an image array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageDtype {
    Float64,
    Int64,
    UInt8,
}

impl std::fmt::Display for ImageDtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ImageDtype::Float64 => "float64",
            ImageDtype::Int64 => "int64",
            ImageDtype::UInt8 => "uint8",
        };
        write!(f, "{}", name)
    }
}

/// An image array; 2D for intensity images, (h, w, 4) for RGBA images
#[derive(Debug, Clone, PartialEq)]
pub enum ImageArray {
    Float64(ArrayD<f64>),
    Int64(ArrayD<i64>),
    UInt8(ArrayD<u8>),
}

impl ImageArray {
    pub fn dtype(&self) -> ImageDtype {
        match self {
            ImageArray::Float64(_) => ImageDtype::Float64,
            ImageArray::Int64(_) => ImageDtype::Int64,
            ImageArray::UInt8(_) => ImageDtype::UInt8,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            ImageArray::Float64(a) => a.shape(),
            ImageArray::Int64(a) => a.shape(),
            ImageArray::UInt8(a) => a.shape(),
        }
    }

    /// Number of rows (first axis)
    pub fn height(&self) -> usize {
        self.shape().first().copied().unwrap_or(0)
    }

    /// Number of columns (second axis)
    pub fn width(&self) -> usize {
        self.shape().get(1).copied().unwrap_or(0)
    }

    /// Value at `(row, col)` of a 2D array as f64
    pub fn value_at(&self, row: usize, col: usize) -> Option<f64> {
        let idx = [row, col];
        match self {
            ImageArray::Float64(a) => a.get(&idx[..]).copied(),
            ImageArray::Int64(a) => a.get(&idx[..]).map(|v| *v as f64),
            ImageArray::UInt8(a) => a.get(&idx[..]).map(|v| *v as f64),
        }
    }

    /// RGBA channels at `(row, col)` of a (h, w, 4) 8-bit array
    pub fn rgba_at(&self, row: usize, col: usize) -> Option<[u8; 4]> {
        let ImageArray::UInt8(a) = self else {
            return None;
        };
        let mut out = [0u8; 4];
        for (channel, slot) in out.iter_mut().enumerate() {
            *slot = *a.get(&[row, col, channel][..])?;
        }
        Some(out)
    }

    /// All values flattened to f64 (used for colour-mapper limits)
    pub fn values(&self) -> Vec<f64> {
        match self {
            ImageArray::Float64(a) => a.iter().copied().collect(),
            ImageArray::Int64(a) => a.iter().map(|v| *v as f64).collect(),
            ImageArray::UInt8(a) => a.iter().map(|v| *v as f64).collect(),
        }
    }
}

impl From<ndarray::Array2<f64>> for ImageArray {
    fn from(value: ndarray::Array2<f64>) -> Self {
        ImageArray::Float64(value.into_dyn())
    }
}

impl From<ndarray::Array2<i64>> for ImageArray {
    fn from(value: ndarray::Array2<i64>) -> Self {
        ImageArray::Int64(value.into_dyn())
    }
}

impl From<ndarray::Array2<u8>> for ImageArray {
    fn from(value: ndarray::Array2<u8>) -> Self {
        ImageArray::UInt8(value.into_dyn())
    }
}

impl From<ndarray::Array3<u8>> for ImageArray {
    fn from(value: ndarray::Array3<u8>) -> Self {
        ImageArray::UInt8(value.into_dyn())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};

    #[test]
    fn test_shape_and_dtype() {
        let image: ImageArray = Array2::<f64>::zeros((3, 5)).into();
        assert_eq!(image.shape(), &[3, 5]);
        assert_eq!(image.height(), 3);
        assert_eq!(image.width(), 5);
        assert_eq!(image.dtype(), ImageDtype::Float64);
        assert_eq!(image.dtype().to_string(), "float64");
    }

    #[test]
    fn test_value_at() {
        let image: ImageArray = Array2::from_shape_vec((2, 2), vec![1i64, 2, 3, 4])
            .unwrap()
            .into();
        assert_eq!(image.value_at(1, 0), Some(3.0));
        assert_eq!(image.value_at(2, 0), None);
    }

    #[test]
    fn test_rgba_at() {
        let mut rgba = Array3::<u8>::zeros((1, 2, 4));
        rgba[[0, 1, 0]] = 255;
        rgba[[0, 1, 3]] = 128;
        let image: ImageArray = rgba.into();
        assert_eq!(image.rgba_at(0, 1), Some([255, 0, 0, 128]));

        let float: ImageArray = Array2::<f64>::zeros((1, 1)).into();
        assert_eq!(float.rgba_at(0, 0), None);
    }
}
