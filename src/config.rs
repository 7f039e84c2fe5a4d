/// Which X display to capture from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Display name such as `":1"`. `None` lets xcb read `$DISPLAY`.
    pub display_name: Option<String>,
}

impl DisplayConfig {
    pub fn new() -> Self {
        DisplayConfig::default()
    }

    pub fn display_name<S: Into<String>>(mut self, display_name: S) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}
