//! Cheap, repeated captures of X11 screen rectangles as raw RGB bytes.
//!
//! Every buffer is `width * height * 3` bytes of row-major `R, G, B` triplets.
//!
//! ```no_run
//! let thumbnails = prtscn::get_screens(&[0, 0, 640, 360, 640, 0, 640, 360])?;
//! assert_eq!(thumbnails[0].len(), 640 * 360 * 3);
//! # Ok::<(), prtscn::CaptureError>(())
//! ```

mod batch;
mod buffer;
mod config;
mod display;
mod error;
mod extract;
mod rect;
mod snapshot;

#[cfg(test)]
mod testing;

pub use batch::BatchCaptureService;
pub use buffer::PixelBuffer;
pub use config::DisplayConfig;
pub use display::{DisplayConnection, DisplayServer, XcbConnection, XcbDisplay};
pub use error::{CaptureError, CaptureResult};
pub use extract::{
    extract_from_live_display, extract_from_live_display_into, extract_from_snapshot,
    unpack_pixel,
};
pub use rect::Rectangle;
pub use snapshot::{ByteOrder, ColorMasks, Snapshot};

/// Captures one rectangle of the default display.
pub fn get_screen(x: i32, y: i32, width: u32, height: u32) -> CaptureResult<PixelBuffer> {
    BatchCaptureService::new().get_screen(&Rectangle::new(x, y, width, height))
}

/// Captures one rectangle of the default display into a caller provided buffer
/// of at least `width * height * 3` bytes.
pub fn get_screen_into(
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    out: &mut [u8],
) -> CaptureResult<()> {
    BatchCaptureService::new().get_screen_into(&Rectangle::new(x, y, width, height), out)
}

/// Captures a flattened `x, y, width, height, ...` list, one round trip per rectangle.
pub fn get_screens(values: &[i64]) -> CaptureResult<Vec<PixelBuffer>> {
    BatchCaptureService::new().get_screens_flat(values)
}

/// Captures a flattened `x, y, width, height, ...` list from a single full screen image.
pub fn get_screens_single_image(values: &[i64]) -> CaptureResult<Vec<PixelBuffer>> {
    BatchCaptureService::new().get_screens_single_image_flat(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_lists_fail_before_connecting() {
        // These never reach the X server, so they behave the same without one.
        assert!(matches!(get_screens(&[]), Err(CaptureError::InvalidArgument(_))));
        assert!(matches!(
            get_screens_single_image(&[0, 0, 10]),
            Err(CaptureError::InvalidArgument(_))
        ));
        assert!(matches!(
            get_screen(0, 0, 0, 0),
            Err(CaptureError::InvalidArgument(_))
        ));
    }
}
