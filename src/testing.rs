//! In-memory display used by the unit tests.

use std::{cell::Cell, rc::Rc};

use crate::{
    display::{DisplayConnection, DisplayServer},
    error::{CaptureError, CaptureResult},
    rect::Rectangle,
    snapshot::{ByteOrder, ColorMasks, Snapshot},
};

/// Builds a 24 bit depth, 32 bpp LSB-first snapshot from a pixel function.
pub(crate) fn snapshot_from_fn<F: Fn(u32, u32) -> u32>(
    width: u32,
    height: u32,
    pixel: F,
) -> Snapshot {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&pixel(x, y).to_le_bytes());
        }
    }

    Snapshot::from_raw(
        width,
        height,
        24,
        32,
        32,
        ByteOrder::LsbFirst,
        ColorMasks::default(),
        data,
    )
    .unwrap()
}

pub(crate) fn solid(width: u32, height: u32, [r, g, b]: [u8; 3]) -> Snapshot {
    snapshot_from_fn(width, height, |_, _| {
        (r as u32) << 16 | (g as u32) << 8 | b as u32
    })
}

#[derive(Debug, Default)]
struct Stats {
    connects: Cell<usize>,
    closes: Cell<usize>,
    round_trips: Cell<usize>,
    full_screen_fetches: Cell<usize>,
}

/// A static framebuffer standing in for an X server.
pub(crate) struct MemoryDisplay {
    framebuffer: Rc<Snapshot>,
    stats: Rc<Stats>,
    reachable: bool,
}

impl MemoryDisplay {
    pub(crate) fn new(framebuffer: Snapshot) -> Self {
        MemoryDisplay {
            framebuffer: Rc::new(framebuffer),
            stats: Rc::default(),
            reachable: true,
        }
    }

    /// Red follows x, green follows y, blue is zero.
    pub(crate) fn gradient(width: u32, height: u32) -> Self {
        MemoryDisplay::new(snapshot_from_fn(width, height, |x, y| {
            (x & 0xff) << 16 | (y & 0xff) << 8
        }))
    }

    pub(crate) fn unreachable() -> Self {
        MemoryDisplay {
            reachable: false,
            ..MemoryDisplay::gradient(1, 1)
        }
    }

    pub(crate) fn framebuffer(&self) -> &Snapshot {
        &self.framebuffer
    }

    pub(crate) fn connects(&self) -> usize {
        self.stats.connects.get()
    }

    pub(crate) fn closes(&self) -> usize {
        self.stats.closes.get()
    }

    pub(crate) fn round_trips(&self) -> usize {
        self.stats.round_trips.get()
    }

    pub(crate) fn full_screen_fetches(&self) -> usize {
        self.stats.full_screen_fetches.get()
    }
}

impl DisplayServer for MemoryDisplay {
    type Connection = MemoryConnection;

    fn connect(&self) -> CaptureResult<MemoryConnection> {
        if !self.reachable {
            return Err(CaptureError::Connection(xcb::ConnError::Connection));
        }

        self.stats.connects.set(self.stats.connects.get() + 1);

        Ok(MemoryConnection {
            framebuffer: self.framebuffer.clone(),
            stats: self.stats.clone(),
        })
    }
}

pub(crate) struct MemoryConnection {
    framebuffer: Rc<Snapshot>,
    stats: Rc<Stats>,
}

impl DisplayConnection for MemoryConnection {
    fn capture_rectangle(&self, rect: &Rectangle) -> CaptureResult<Snapshot> {
        self.stats.round_trips.set(self.stats.round_trips.get() + 1);

        // The server answers BadMatch for regions leaving the root window.
        if !rect.is_within(self.framebuffer.width(), self.framebuffer.height()) {
            return Err(CaptureError::new("BadMatch"));
        }

        let framebuffer = &self.framebuffer;
        Ok(snapshot_from_fn(rect.width, rect.height, |x, y| {
            framebuffer
                .get_pixel(rect.x as i64 + x as i64, rect.y as i64 + y as i64)
                .unwrap_or_default()
        }))
    }

    fn capture_full_screen(&self) -> CaptureResult<Snapshot> {
        self.stats.round_trips.set(self.stats.round_trips.get() + 1);
        self.stats
            .full_screen_fetches
            .set(self.stats.full_screen_fetches.get() + 1);

        Ok(self.framebuffer.as_ref().clone())
    }
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        self.stats.closes.set(self.stats.closes.get() + 1);
    }
}
