use crate::error::{CaptureError, CaptureResult};

/// Tightly packed, row-major RGB pixels: `width * height * 3` bytes, no row padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) bytes: Vec<u8>,
}

impl PixelBuffer {
    pub fn from_vec(width: u32, height: u32, bytes: Vec<u8>) -> CaptureResult<PixelBuffer> {
        let expected = width as usize * height as usize * 3;
        if bytes.len() != expected {
            return Err(CaptureError::new(format!(
                "{width}x{height} RGB buffer needs {expected} bytes, got {}",
                bytes.len()
            )));
        }

        Ok(PixelBuffer {
            width,
            height,
            bytes,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Iterates the `[r, g, b]` triplets row by row.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.bytes
            .chunks_exact(3)
            .map(|rgb| [rgb[0], rgb[1], rgb[2]])
    }

    #[cfg(feature = "image")]
    pub fn to_rgb_image(&self) -> CaptureResult<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.bytes.clone())
            .ok_or_else(|| CaptureError::new("RgbImage::from_raw failed"))
    }
}

impl AsRef<[u8]> for PixelBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<PixelBuffer> for Vec<u8> {
    fn from(value: PixelBuffer) -> Self {
        value.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        assert!(PixelBuffer::from_vec(2, 2, vec![0; 11]).is_err());
        assert!(PixelBuffer::from_vec(2, 2, vec![0; 12]).is_ok());
    }

    #[test]
    fn pixels_are_rgb_triplets() {
        let buffer = PixelBuffer::from_vec(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();

        assert_eq!(buffer.pixels().collect::<Vec<_>>(), vec![[1, 2, 3], [4, 5, 6]]);
    }

    #[cfg(feature = "image")]
    #[test]
    fn converts_to_rgb_image() {
        let buffer = PixelBuffer::from_vec(1, 1, vec![10, 20, 30]).unwrap();
        let image = buffer.to_rgb_image().unwrap();

        assert_eq!(image.get_pixel(0, 0).0, [10, 20, 30]);
    }
}
