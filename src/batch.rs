use std::time::Instant;

use scopeguard::defer;

use crate::{
    buffer::PixelBuffer,
    config::DisplayConfig,
    display::{DisplayConnection, DisplayServer, XcbDisplay},
    error::{CaptureError, CaptureResult},
    extract::{extract_from_live_display, extract_from_live_display_into, extract_from_snapshot},
    rect::Rectangle,
};

fn validate_rectangles(rects: &[Rectangle]) -> CaptureResult<()> {
    if rects.is_empty() {
        return Err(CaptureError::invalid_argument(
            "You must supply at least one rectangle.",
        ));
    }

    rects.iter().try_for_each(Rectangle::validate)
}

/// Captures lists of screen rectangles, one connection per call.
///
/// Every call validates its input first, then opens its own connection and
/// closes it before returning, whether the call succeeds or not.
#[derive(Debug, Clone, Default)]
pub struct BatchCaptureService<D: DisplayServer = XcbDisplay> {
    display: D,
}

impl BatchCaptureService<XcbDisplay> {
    pub fn new() -> Self {
        BatchCaptureService::with_config(DisplayConfig::default())
    }

    pub fn with_config(config: DisplayConfig) -> Self {
        BatchCaptureService::from_display(XcbDisplay::new(config))
    }
}

impl<D: DisplayServer> BatchCaptureService<D> {
    pub fn from_display(display: D) -> Self {
        BatchCaptureService { display }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Captures a single rectangle.
    pub fn get_screen(&self, rect: &Rectangle) -> CaptureResult<PixelBuffer> {
        rect.validate()?;

        let conn = self.display.connect()?;
        extract_from_live_display(&conn, rect)
    }

    /// Captures a single rectangle into the first `rect.rgb_len()` bytes of `out`.
    pub fn get_screen_into(&self, rect: &Rectangle, out: &mut [u8]) -> CaptureResult<()> {
        rect.validate()?;
        if out.len() < rect.rgb_len() {
            return Err(CaptureError::invalid_argument(format!(
                "output buffer holds {} bytes, {}x{} RGB needs {}",
                out.len(),
                rect.width,
                rect.height,
                rect.rgb_len()
            )));
        }

        let conn = self.display.connect()?;
        extract_from_live_display_into(&conn, rect, out)
    }

    /// Captures each rectangle with its own round trip over one shared connection.
    pub fn get_screens(&self, rects: &[Rectangle]) -> CaptureResult<Vec<PixelBuffer>> {
        validate_rectangles(rects)?;

        let start = Instant::now();
        defer! {
            log::debug!("get_screens: {} rectangles in {:?}", rects.len(), start.elapsed());
        }

        let conn = self.display.connect()?;
        rects
            .iter()
            .map(|rect| extract_from_live_display(&conn, rect))
            .collect()
    }

    /// Fetches the whole screen once and slices every rectangle out of it.
    ///
    /// One round trip in total, yet usually slower than [`get_screens`](Self::get_screens)
    /// since reading pixels back from a full screen image dominates.
    /// Parts of a rectangle lying off screen come back black instead of failing.
    pub fn get_screens_single_image(&self, rects: &[Rectangle]) -> CaptureResult<Vec<PixelBuffer>> {
        validate_rectangles(rects)?;

        let start = Instant::now();
        defer! {
            log::debug!(
                "get_screens_single_image: {} rectangles in {:?}",
                rects.len(),
                start.elapsed()
            );
        }

        let conn = self.display.connect()?;
        let snapshot = conn.capture_full_screen()?;
        let masks = snapshot.masks();

        log::trace!(
            "slicing {} rectangles from {}x{} snapshot",
            rects.len(),
            snapshot.width(),
            snapshot.height()
        );

        let buffers = rects
            .iter()
            .map(|rect| {
                let x = rect.x as i64;
                let y = rect.y as i64;

                extract_from_snapshot(
                    &snapshot,
                    &masks,
                    x,
                    y,
                    rect.width as i64 + x,
                    rect.height as i64 + y,
                )
            })
            .collect();

        Ok(buffers)
    }

    /// [`get_screens`](Self::get_screens) over a flattened `x, y, width, height, ...` list.
    pub fn get_screens_flat(&self, values: &[i64]) -> CaptureResult<Vec<PixelBuffer>> {
        let rects = Rectangle::from_flat(values)?;
        self.get_screens(&rects)
    }

    /// [`get_screens_single_image`](Self::get_screens_single_image) over a flattened list.
    pub fn get_screens_single_image_flat(&self, values: &[i64]) -> CaptureResult<Vec<PixelBuffer>> {
        let rects = Rectangle::from_flat(values)?;
        self.get_screens_single_image(&rects)
    }
}
