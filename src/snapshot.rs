use crate::error::{CaptureError, CaptureResult};

/// Bit masks selecting each color channel inside a packed pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMasks {
    pub red_mask: u32,
    pub green_mask: u32,
    pub blue_mask: u32,
}

impl ColorMasks {
    pub fn new(red_mask: u32, green_mask: u32, blue_mask: u32) -> ColorMasks {
        ColorMasks {
            red_mask,
            green_mask,
            blue_mask,
        }
    }
}

impl Default for ColorMasks {
    /// The usual TrueColor layout of a 24/32 bit X visual.
    fn default() -> Self {
        ColorMasks::new(0x00ff_0000, 0x0000_ff00, 0x0000_00ff)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LsbFirst,
    MsbFirst,
}

impl From<xcb::x::ImageOrder> for ByteOrder {
    fn from(value: xcb::x::ImageOrder) -> Self {
        match value {
            xcb::x::ImageOrder::LsbFirst => ByteOrder::LsbFirst,
            xcb::x::ImageOrder::MsbFirst => ByteOrder::MsbFirst,
        }
    }
}

/// A ZPixmap image fetched from the server, plus what is needed to read pixels back out of it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    width: u32,
    height: u32,
    depth: u8,
    bits_per_pixel: u8,
    bytes_per_line: usize,
    byte_order: ByteOrder,
    masks: ColorMasks,
    data: Vec<u8>,
}

impl Snapshot {
    /// Wraps raw ZPixmap data. Rows are `scanline_pad` bit aligned.
    #[allow(clippy::too_many_arguments)]
    pub fn from_raw(
        width: u32,
        height: u32,
        depth: u8,
        bits_per_pixel: u8,
        scanline_pad: u8,
        byte_order: ByteOrder,
        masks: ColorMasks,
        data: Vec<u8>,
    ) -> CaptureResult<Snapshot> {
        if !matches!(bits_per_pixel, 8 | 16 | 24 | 32) {
            return Err(CaptureError::new(format!(
                "Unsupported {bits_per_pixel} bits per pixel"
            )));
        }

        if scanline_pad == 0 || scanline_pad % 8 != 0 {
            return Err(CaptureError::new(format!(
                "Unsupported scanline pad {scanline_pad}"
            )));
        }

        let pad = scanline_pad as usize;
        let bits_per_line = width as usize * bits_per_pixel as usize;
        let bytes_per_line = bits_per_line.div_ceil(pad) * (pad / 8);
        let expected = bytes_per_line * height as usize;

        if data.len() < expected {
            return Err(CaptureError::new(format!(
                "{width}x{height} image needs {expected} bytes, got {}",
                data.len()
            )));
        }

        Ok(Snapshot {
            width,
            height,
            depth,
            bits_per_pixel,
            bytes_per_line,
            byte_order,
            masks,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn masks(&self) -> ColorMasks {
        self.masks
    }

    /// Reads the packed pixel at `(x, y)`, or `None` outside the image.
    pub fn get_pixel(&self, x: i64, y: i64) -> Option<u32> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }

        let bytes_per_pixel = self.bits_per_pixel as usize / 8;
        let index = y as usize * self.bytes_per_line + x as usize * bytes_per_pixel;
        let bytes = &self.data[index..index + bytes_per_pixel];

        let pixel = match self.byte_order {
            ByteOrder::LsbFirst => bytes
                .iter()
                .rev()
                .fold(0u32, |acc, byte| (acc << 8) | *byte as u32),
            ByteOrder::MsbFirst => bytes
                .iter()
                .fold(0u32, |acc, byte| (acc << 8) | *byte as u32),
        };

        // Xlib drops the bits above the image depth, e.g. the padding byte of a 24 bit visual.
        if self.depth < 32 {
            Some(pixel & ((1u32 << self.depth) - 1))
        } else {
            Some(pixel)
        }
    }
}
