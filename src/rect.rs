use crate::error::{CaptureError, CaptureResult};

/// A region of the screen, in root window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Rectangle {
        Rectangle {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of bytes an RGB capture of this rectangle occupies.
    pub fn rgb_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    /// Checks the rectangle is non-empty and fits the X11 wire types
    /// (16 bit signed origin, 16 bit unsigned extent).
    pub fn validate(&self) -> CaptureResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CaptureError::invalid_argument(format!(
                "{}x{} rectangle at ({}, {}) is empty",
                self.width, self.height, self.x, self.y
            )));
        }

        if i16::try_from(self.x).is_err()
            || i16::try_from(self.y).is_err()
            || u16::try_from(self.width).is_err()
            || u16::try_from(self.height).is_err()
        {
            return Err(CaptureError::invalid_argument(format!(
                "{}x{} rectangle at ({}, {}) exceeds the X11 coordinate range",
                self.width, self.height, self.x, self.y
            )));
        }

        Ok(())
    }

    /// Whether the whole rectangle lies inside a `width` x `height` area anchored at the origin.
    pub fn is_within(&self, width: u32, height: u32) -> bool {
        let right = self.x as i64 + self.width as i64;
        let bottom = self.y as i64 + self.height as i64;

        self.x >= 0 && self.y >= 0 && right <= width as i64 && bottom <= height as i64
    }

    /// Decodes a flattened `x, y, width, height, x, y, ...` list.
    ///
    /// Every value must be a non-negative integer, the list must be non-empty and
    /// its length a multiple of four.
    pub fn from_flat(values: &[i64]) -> CaptureResult<Vec<Rectangle>> {
        if values.is_empty() {
            return Err(CaptureError::invalid_argument(
                "You must supply at least one argument.",
            ));
        }

        if values.len() % 4 != 0 {
            return Err(CaptureError::invalid_argument(format!(
                "expected x, y, width, height quadruples, got {} values",
                values.len()
            )));
        }

        if let Some(value) = values.iter().find(|value| **value < 0) {
            return Err(CaptureError::invalid_argument(format!(
                "negative argument {value}"
            )));
        }

        values
            .chunks_exact(4)
            .map(|chunk| {
                let rect = Rectangle::new(
                    to_coordinate(chunk[0])?,
                    to_coordinate(chunk[1])?,
                    to_extent(chunk[2])?,
                    to_extent(chunk[3])?,
                );
                rect.validate()?;

                Ok(rect)
            })
            .collect()
    }

    /// Same as [`Rectangle::from_flat`] for textual arguments, e.g. from a command line.
    pub fn parse_flat<S: AsRef<str>>(values: &[S]) -> CaptureResult<Vec<Rectangle>> {
        let numbers = values
            .iter()
            .map(|value| {
                let value = value.as_ref().trim();
                value.parse::<i64>().map_err(|_| {
                    CaptureError::invalid_argument(format!("Non-numeric argument {value:?}"))
                })
            })
            .collect::<CaptureResult<Vec<i64>>>()?;

        Rectangle::from_flat(&numbers)
    }
}

fn to_coordinate(value: i64) -> CaptureResult<i32> {
    i32::try_from(value)
        .map_err(|_| CaptureError::invalid_argument(format!("coordinate {value} out of range")))
}

fn to_extent(value: i64) -> CaptureResult<u32> {
    u32::try_from(value)
        .map_err(|_| CaptureError::invalid_argument(format!("extent {value} out of range")))
}
