//! Page geometry for the renderer

use crate::types::{Result, VaultError};

/// Physical page size in PDF points (1/72 inch)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PageSize {
    #[default]
    Letter,
    A4,
    Custom { width: f32, height: f32 },
}

impl PageSize {
    /// `(width, height)` in points
    pub fn dimensions(&self) -> (f32, f32) {
        match *self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.28, 841.89),
            PageSize::Custom { width, height } => (width, height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Uniform inset from every page edge, in points
    pub margin: f32,
    pub page_size: PageSize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            margin: 50.0,
            page_size: PageSize::Letter,
        }
    }
}

impl RenderConfig {
    /// Width available for text between the side margins
    pub fn content_width(&self) -> f32 {
        self.page_size.dimensions().0 - 2.0 * self.margin
    }

    /// Height available for text between the top and bottom margins
    pub fn content_height(&self) -> f32 {
        self.page_size.dimensions().1 - 2.0 * self.margin
    }

    pub fn validate(&self) -> Result<()> {
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(VaultError::Render(format!(
                "margin must be a non-negative number, got {}",
                self.margin
            )));
        }
        let (width, height) = self.page_size.dimensions();
        if !width.is_finite() || !height.is_finite() {
            return Err(VaultError::Render("page dimensions must be finite".into()));
        }
        if self.content_width() <= 0.0 || self.content_height() <= 0.0 {
            return Err(VaultError::Render(format!(
                "margin {} leaves no content area on a {}x{} page",
                self.margin, width, height
            )));
        }
        Ok(())
    }
}
