use xcb::{
    Connection,
    x::{Drawable, GetGeometry, GetImage, ImageFormat, Setup, Visualid, Window},
};

use crate::{
    config::DisplayConfig,
    error::{CaptureError, CaptureResult},
    rect::Rectangle,
    snapshot::{ColorMasks, Snapshot},
};

/// Something that can open connections to a windowing system.
pub trait DisplayServer {
    type Connection: DisplayConnection;

    /// Opens a new connection. Dropping it closes the connection.
    fn connect(&self) -> CaptureResult<Self::Connection>;
}

/// An open connection able to fetch pixels from the root drawable.
pub trait DisplayConnection {
    /// Fetches exactly `rect` in one round trip.
    fn capture_rectangle(&self, rect: &Rectangle) -> CaptureResult<Snapshot>;

    /// Fetches the whole root drawable in one image.
    fn capture_full_screen(&self) -> CaptureResult<Snapshot>;
}

#[derive(Debug, Clone, Default)]
pub struct XcbDisplay {
    config: DisplayConfig,
}

impl XcbDisplay {
    pub fn new(config: DisplayConfig) -> Self {
        XcbDisplay { config }
    }
}

impl DisplayServer for XcbDisplay {
    type Connection = XcbConnection;

    fn connect(&self) -> CaptureResult<XcbConnection> {
        XcbConnection::open(self.config.display_name.as_deref())
    }
}

pub struct XcbConnection {
    conn: Connection,
    root: Window,
    root_visual: Visualid,
}

impl XcbConnection {
    pub fn open(display_name: Option<&str>) -> CaptureResult<XcbConnection> {
        let (conn, index) = Connection::connect(display_name)?;

        let screen = conn
            .get_setup()
            .roots()
            .nth(index as usize)
            .ok_or_else(|| CaptureError::new("Not found screen"))?;

        let root = screen.root();
        let root_visual = screen.root_visual();

        log::debug!(
            "connected to display {:?}, screen {index}",
            display_name.unwrap_or("$DISPLAY")
        );

        Ok(XcbConnection {
            conn,
            root,
            root_visual,
        })
    }

    fn get_image(&self, x: i16, y: i16, width: u16, height: u16) -> CaptureResult<Snapshot> {
        log::trace!("GetImage {width}x{height} at ({x}, {y})");

        let get_image_cookie = self.conn.send_request(&GetImage {
            format: ImageFormat::ZPixmap,
            drawable: Drawable::Window(self.root),
            x,
            y,
            width,
            height,
            plane_mask: u32::MAX,
        });

        let get_image_reply = self.conn.wait_for_reply(get_image_cookie)?;
        let depth = get_image_reply.depth();
        let setup = self.conn.get_setup();

        let pixmap_format = setup
            .pixmap_formats()
            .iter()
            .find(|item| item.depth() == depth)
            .ok_or_else(|| CaptureError::new(format!("Not found pixmap format for depth {depth}")))?;

        let masks = match find_visual_masks(setup, get_image_reply.visual()) {
            Some(masks) => masks,
            None => {
                log::warn!(
                    "visual {} not found, using root visual masks",
                    get_image_reply.visual()
                );
                find_visual_masks(setup, self.root_visual)
                    .ok_or_else(|| CaptureError::new("Not found root visual"))?
            }
        };

        Snapshot::from_raw(
            width as u32,
            height as u32,
            depth,
            pixmap_format.bits_per_pixel(),
            pixmap_format.scanline_pad(),
            setup.image_byte_order().into(),
            masks,
            get_image_reply.data().to_vec(),
        )
    }
}

fn find_visual_masks(setup: &Setup, visual_id: Visualid) -> Option<ColorMasks> {
    setup
        .roots()
        .flat_map(|screen| screen.allowed_depths())
        .flat_map(|depth| depth.visuals())
        .find(|visual| visual.visual_id() == visual_id)
        .map(|visual| ColorMasks::new(visual.red_mask(), visual.green_mask(), visual.blue_mask()))
}

fn wire_rectangle(rect: &Rectangle) -> CaptureResult<(i16, i16, u16, u16)> {
    rect.validate()?;

    // validate() guarantees every field fits.
    Ok((
        rect.x as i16,
        rect.y as i16,
        rect.width as u16,
        rect.height as u16,
    ))
}

impl DisplayConnection for XcbConnection {
    fn capture_rectangle(&self, rect: &Rectangle) -> CaptureResult<Snapshot> {
        let (x, y, width, height) = wire_rectangle(rect)?;

        self.get_image(x, y, width, height)
    }

    fn capture_full_screen(&self) -> CaptureResult<Snapshot> {
        let get_geometry_cookie = self.conn.send_request(&GetGeometry {
            drawable: Drawable::Window(self.root),
        });
        let get_geometry_reply = self.conn.wait_for_reply(get_geometry_cookie)?;

        self.get_image(
            0,
            0,
            get_geometry_reply.width(),
            get_geometry_reply.height(),
        )
    }
}

impl Drop for XcbConnection {
    fn drop(&mut self) {
        log::debug!("closing display connection");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_rectangle_fits_protocol_types() {
        assert_eq!(
            wire_rectangle(&Rectangle::new(-5, 10, 640, 480)).unwrap(),
            (-5, 10, 640, 480)
        );
    }

    #[test]
    fn wire_rectangle_rejects_overflow() {
        assert!(matches!(
            wire_rectangle(&Rectangle::new(0, 0, 100_000, 1)),
            Err(CaptureError::InvalidArgument(_))
        ));
    }

    #[test]
    fn connecting_to_a_missing_display_fails() {
        let display = XcbDisplay::new(DisplayConfig::new().display_name(":4096"));

        assert!(matches!(
            display.connect(),
            Err(CaptureError::Connection(_))
        ));
    }
}
