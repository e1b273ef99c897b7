//! Rendering options shared by the SVG, raster and file writers.

/// How a [`QrCode`](crate::qrcode::QrCode) is drawn.
///
/// The defaults give a 4-module quiet zone, 10 units per module, black modules
/// and a solid white background.
///
/// # Example
///
/// ```rust
/// use minqr::config::RenderOptions;
///
/// let opts = RenderOptions::default().with_unit(4).with_light(None);
/// assert_eq!(opts.margin, 4);
/// assert_eq!(opts.unit, 4);
/// assert!(opts.light.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Quiet zone width in modules on each side.
    pub margin: u32,
    /// Edge length of one module in output units (SVG user units or pixels).
    pub unit: u32,
    /// Fill colour of dark modules.
    pub dark: String,
    /// Background fill; `None` leaves the canvas transparent.
    pub light: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            margin: 4,
            unit: 10,
            dark: "#000000".to_string(),
            light: Some("#FFFFFF".to_string()),
        }
    }
}

impl RenderOptions {
    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// # Panics
    ///
    /// Panics if `unit` is zero.
    pub fn with_unit(mut self, unit: u32) -> Self {
        assert!(unit > 0, "Unit must be positive");
        self.unit = unit;
        self
    }

    pub fn with_dark(mut self, color: impl Into<String>) -> Self {
        self.dark = color.into();
        self
    }

    pub fn with_light(mut self, color: Option<&str>) -> Self {
        self.light = color.map(str::to_string);
        self
    }

    /// Side length of the rendered canvas for a symbol of `size` modules.
    ///
    /// # Panics
    ///
    /// Panics if the side length does not fit in a `u32`.
    pub fn canvas_size(&self, size: u32) -> u32 {
        self.margin
            .checked_mul(2)
            .and_then(|m| m.checked_add(size))
            .and_then(|n| n.checked_mul(self.unit))
            .expect("Canvas size out of range")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = RenderOptions::default();
        assert_eq!(opts.margin, 4);
        assert_eq!(opts.unit, 10);
        assert_eq!(opts.dark, "#000000");
        assert_eq!(opts.light.as_deref(), Some("#FFFFFF"));
    }

    #[test]
    fn test_builders() {
        let opts = RenderOptions::default()
            .with_margin(2)
            .with_unit(3)
            .with_dark("navy")
            .with_light(Some("#eee"));
        assert_eq!(opts.margin, 2);
        assert_eq!(opts.unit, 3);
        assert_eq!(opts.dark, "navy");
        assert_eq!(opts.light.as_deref(), Some("#eee"));
        assert_eq!(opts.with_light(None).light, None);
    }

    #[test]
    fn test_canvas_size() {
        assert_eq!(RenderOptions::default().canvas_size(21), 290);
        assert_eq!(RenderOptions::default().with_margin(0).with_unit(1).canvas_size(33), 33);
    }

    #[test]
    #[should_panic(expected = "Canvas size out of range")]
    fn test_canvas_size_overflow() {
        let _ = RenderOptions::default().with_unit(u32::MAX / 2).canvas_size(21);
    }

    #[test]
    #[should_panic(expected = "Canvas size out of range")]
    fn test_canvas_margin_overflow() {
        let _ = RenderOptions::default().with_margin(u32::MAX / 2 + 1).canvas_size(21);
    }

    #[test]
    #[should_panic(expected = "Unit must be positive")]
    fn test_zero_unit() {
        let _ = RenderOptions::default().with_unit(0);
    }
}
