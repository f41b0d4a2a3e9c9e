//! Board rendering: layout, paint list, raster.
//!
//! A render call runs three stages and touches nothing outside its own
//! canvas, so one [`BoardRenderer`] can serve many threads at once.

pub mod layout;
pub mod paint;
pub mod raster;

use crate::{parse_players, BoardConfig, FontHandle, PlayerToken, Result};
use sha2::{Digest, Sha256};

/// A finished board image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl RenderedImage {
    /// Hex SHA-256 of the PNG bytes.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.png_data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.png_data
    }
}

/// Immutable renderer: board configuration plus the label font.
#[derive(Debug)]
pub struct BoardRenderer {
    config: BoardConfig,
    font: FontHandle,
}

impl BoardRenderer {
    pub fn new(config: BoardConfig, font: FontHandle) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, font })
    }

    /// Renderer using the embedded bitmap face at the configured label size.
    pub fn with_builtin_font(config: BoardConfig) -> Result<Self> {
        let font = FontHandle::builtin(config.font_px());
        Self::new(config, font)
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn font(&self) -> &FontHandle {
        &self.font
    }

    /// Draw the grid and every on-board token, in order, and encode as PNG.
    pub fn render(&self, players: &[PlayerToken]) -> Result<RenderedImage> {
        let tokens = layout::layout_tokens(&self.config, players)?;
        let commands = paint::paint_board(&self.config, &tokens, &self.font);
        let size = self.config.board_size;
        raster::rasterize(size, size, &commands, &self.font)
    }

    /// Parse a JSON request body and render it.
    pub fn render_json(&self, body: &[u8]) -> Result<RenderedImage> {
        let players = parse_players(body)?;
        self.render(&players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn render_produces_board_sized_png() {
        let r = BoardRenderer::with_builtin_font(BoardConfig::with_size(100)).unwrap();
        let img = r.render(&[PlayerToken::new("1", 1, "red")]).unwrap();
        assert_eq!((img.width, img.height), (100, 100));
        assert_eq!(img.digest().len(), 64);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let err = BoardRenderer::with_builtin_font(BoardConfig::with_size(99)).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
        let err = BoardRenderer::with_builtin_font(BoardConfig::with_size(4_000_000_000)).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn render_json_surfaces_color_failures() {
        let r = BoardRenderer::with_builtin_font(BoardConfig::with_size(100)).unwrap();
        let err = r
            .render_json(br#"{"players": [{"num": 1, "pos": 3, "color": "mauve-ish"}]}"#)
            .unwrap_err();
        assert!(matches!(err, Error::RenderError(_)));
    }
}
