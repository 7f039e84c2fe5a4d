use crate::{
    buffer::PixelBuffer,
    display::DisplayConnection,
    error::{CaptureError, CaptureResult},
    rect::Rectangle,
    snapshot::{ColorMasks, Snapshot},
};

/// Splits a packed pixel into `[r, g, b]`.
///
/// The shifts are fixed at 16/8/0 whatever the masks say, so visuals without
/// 8 bits per channel come out with wrong colors.
pub fn unpack_pixel(pixel: u32, masks: &ColorMasks) -> [u8; 3] {
    let blue = (pixel & masks.blue_mask) as u8;
    let green = ((pixel & masks.green_mask) >> 8) as u8;
    let red = ((pixel & masks.red_mask) >> 16) as u8;

    [red, green, blue]
}

fn span(start: i64, end: i64) -> usize {
    (end - start).max(0) as usize
}

/// Writes the RGB triplets of columns `x_offset..x_end` and rows `y_offset..y_end`
/// into `out`, returning how many bytes were written. Pixels outside the
/// snapshot are written as black.
fn write_region(
    snapshot: &Snapshot,
    masks: &ColorMasks,
    x_offset: i64,
    y_offset: i64,
    x_end: i64,
    y_end: i64,
    out: &mut [u8],
) -> usize {
    let mut index = 0;
    for y in y_offset..y_end {
        for x in x_offset..x_end {
            let rgb = snapshot
                .get_pixel(x, y)
                .map(|pixel| unpack_pixel(pixel, masks))
                .unwrap_or_default();

            out[index..index + 3].copy_from_slice(&rgb);
            index += 3;
        }
    }

    index
}

/// Fetches `rect` from the display and converts it to RGB.
///
/// The fetched image is dropped before returning.
pub fn extract_from_live_display<C: DisplayConnection + ?Sized>(
    conn: &C,
    rect: &Rectangle,
) -> CaptureResult<PixelBuffer> {
    let mut bytes = vec![0u8; rect.rgb_len()];
    extract_from_live_display_into(conn, rect, &mut bytes)?;

    PixelBuffer::from_vec(rect.width, rect.height, bytes)
}

/// Like [`extract_from_live_display`], but fills the first `rect.rgb_len()` bytes of `out`.
pub fn extract_from_live_display_into<C: DisplayConnection + ?Sized>(
    conn: &C,
    rect: &Rectangle,
    out: &mut [u8],
) -> CaptureResult<()> {
    if out.len() < rect.rgb_len() {
        return Err(CaptureError::invalid_argument(format!(
            "output buffer holds {} bytes, {}x{} RGB needs {}",
            out.len(),
            rect.width,
            rect.height,
            rect.rgb_len()
        )));
    }

    let snapshot = conn.capture_rectangle(rect)?;
    let masks = snapshot.masks();

    write_region(
        &snapshot,
        &masks,
        0,
        0,
        rect.width as i64,
        rect.height as i64,
        out,
    );

    Ok(())
}

/// Converts part of an already fetched snapshot to RGB. The snapshot stays with the caller.
///
/// `x_end` and `y_end` are end coordinates, not sizes: a `width` x `height`
/// rectangle at `(x, y)` is read with `x_end = width + x` and `y_end = height + y`.
/// The result is `(x_end - x_offset) x (y_end - y_offset)` pixels, or empty
/// when an end lies before its offset.
pub fn extract_from_snapshot(
    snapshot: &Snapshot,
    masks: &ColorMasks,
    x_offset: i64,
    y_offset: i64,
    x_end: i64,
    y_end: i64,
) -> PixelBuffer {
    let width = span(x_offset, x_end);
    let height = span(y_offset, y_end);
    let mut bytes = vec![0u8; width * height * 3];

    write_region(snapshot, masks, x_offset, y_offset, x_end, y_end, &mut bytes);

    PixelBuffer {
        width: width as u32,
        height: height as u32,
        bytes,
    }
}
