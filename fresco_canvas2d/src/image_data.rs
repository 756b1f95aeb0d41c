// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw RGBA pixel blocks for `getImageData`/`putImageData`.

use crate::CanvasError;

/// A block of straight-alpha RGBA8 pixels in device space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    /// Pixel bytes, 4 per pixel, row-major.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageData {
    /// Creates a transparent-black block of the given size.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::InvalidDimensions);
        }
        Ok(Self {
            data: vec![0; width as usize * height as usize * 4],
            width,
            height,
        })
    }

    /// Wraps existing bytes.
    ///
    /// The length must be a multiple of 4 and divide evenly by `width`;
    /// when `height` is given it must match the implied row count.
    pub fn with_data(data: Vec<u8>, width: u32, height: Option<u32>) -> Result<Self, CanvasError> {
        if width == 0 {
            return Err(CanvasError::InvalidDimensions);
        }
        if data.len() % 4 != 0 || data.len() % (width as usize * 4) != 0 {
            return Err(CanvasError::InvalidImageData);
        }
        let implied_height = (data.len() / (width as usize * 4)) as u32;
        if implied_height == 0 {
            return Err(CanvasError::InvalidDimensions);
        }
        if let Some(height) = height {
            if height != implied_height {
                return Err(CanvasError::InvalidImageData);
            }
        }
        Ok(Self {
            data,
            width,
            height: implied_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_transparent_black() {
        let data = ImageData::new(2, 3).unwrap();
        assert_eq!(data.data.len(), 24);
        assert!(data.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert_eq!(ImageData::new(0, 2), Err(CanvasError::InvalidDimensions));
        assert_eq!(ImageData::new(2, 0), Err(CanvasError::InvalidDimensions));
    }

    #[test]
    fn with_data_checks_geometry() {
        assert!(ImageData::with_data(vec![0; 16], 2, None).is_ok());
        assert_eq!(ImageData::with_data(vec![0; 16], 2, Some(2)).unwrap().height, 2);
        assert_eq!(
            ImageData::with_data(vec![0; 15], 2, None),
            Err(CanvasError::InvalidImageData)
        );
        assert_eq!(
            ImageData::with_data(vec![0; 16], 3, None),
            Err(CanvasError::InvalidImageData)
        );
        assert_eq!(
            ImageData::with_data(vec![0; 16], 2, Some(3)),
            Err(CanvasError::InvalidImageData)
        );
    }
}
