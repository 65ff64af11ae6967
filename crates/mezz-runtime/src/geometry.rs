#![forbid(unsafe_code)]

//! Measured sizes and the box model they are measured with.

use mezz_layout::Axis;

/// A measured `{width, height}` pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The dimension along `axis`.
    #[inline]
    #[must_use]
    pub const fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::Width => self.width,
            Axis::Height => self.height,
        }
    }
}

/// Which box an observation source should measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxSizing {
    /// Content plus padding and border. Padding or border changes are
    /// reported as size changes.
    #[default]
    BorderBox,
    /// Content only.
    ContentBox,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn along_axis() {
        let size = Size::new(320.0, 240.0);
        assert_eq!(size.along(Axis::Width), 320.0);
        assert_eq!(size.along(Axis::Height), 240.0);
    }

    #[test]
    fn border_box_is_default() {
        assert_eq!(BoxSizing::default(), BoxSizing::BorderBox);
    }
}
