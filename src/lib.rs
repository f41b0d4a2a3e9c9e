//! Snakeboard
//!
//! Renders the state of a 10x10 serpentine board game (Snakes & Ladders and
//! friends) as a PNG image: a light grid plus one colored, labeled token per
//! player.
//!
//! # Features
//!
//! - **Coordinate mapping**: path positions 1..=100 to cell centers, with
//!   alternating row direction
//! - **Deterministic rendering**: same players in, same bytes out
//! - **Font fallback**: TrueType labels when a face is available, an embedded
//!   bitmap face otherwise
//! - **HTTP front end** (default `server` feature): `POST /generate-board`
//!
//! # Example
//!
//! ```
//! use snakeboard::{BoardConfig, BoardRenderer, PlayerToken};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let renderer = BoardRenderer::with_builtin_font(BoardConfig::default())?;
//! let image = renderer.render(&[
//!     PlayerToken::new("1", 15, "#FF0000"),
//!     PlayerToken::new("2", 42, "#0000FF"),
//! ])?;
//! assert_eq!(image.width, 800);
//! assert_eq!(&image.png_data[0..8], b"\x89PNG\r\n\x1a\n");
//! # Ok(())
//! # }
//! ```

use image::Rgb;

pub mod error;
pub use error::{Error, Result};

pub mod board;
pub mod color;
pub mod font;
pub mod rendering;
pub mod token;

// HTTP front end (tiny_http worker pool)
#[cfg(feature = "server")]
pub mod server;

pub use board::{map_position, PixelPoint};
pub use font::FontHandle;
pub use rendering::{BoardRenderer, RenderedImage};
pub use token::{parse_players, ColorSpec, PlayerToken};

/// Largest accepted board side, in pixels.
pub const MAX_BOARD_SIZE: u32 = 16_000;

/// Default font file looked up at startup.
pub const DEFAULT_FONT_PATH: &str = "font_bold.ttf";

/// Configuration for board rendering
///
/// The defaults reproduce the classic 800x800 board:
/// - 80px cells, 56px tokens (70% of a cell)
/// - light grey grid on white, black token outlines, white labels
///
/// # Examples
///
/// ```
/// let cfg = snakeboard::BoardConfig::default();
/// assert_eq!(cfg.cell_size(), 80);
/// assert_eq!(cfg.token_size(), 56);
/// assert_eq!(cfg.font_px(), 28.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    /// Side of the square board in pixels; must be a multiple of 10
    pub board_size: u32,
    /// Token diameter as a fraction of the cell size
    pub token_ratio: f64,
    /// Canvas fill
    pub background: Rgb<u8>,
    /// Grid line color
    pub grid_color: Rgb<u8>,
    /// Token outline color
    pub outline_color: Rgb<u8>,
    /// Label text color
    pub label_color: Rgb<u8>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            board_size: 800,
            token_ratio: 0.7,
            background: Rgb([255, 255, 255]),
            grid_color: Rgb([211, 211, 211]),
            outline_color: Rgb([0, 0, 0]),
            label_color: Rgb([255, 255, 255]),
        }
    }
}

impl BoardConfig {
    /// Default colors with a different board size.
    pub fn with_size(board_size: u32) -> Self {
        Self {
            board_size,
            ..Default::default()
        }
    }

    /// Reject sizes that would lose pixels at the board edge or not fit a canvas.
    pub fn validate(&self) -> Result<()> {
        if self.board_size == 0 || self.board_size % board::BOARD_CELLS != 0 {
            return Err(Error::ConfigError(format!(
                "board size must be a positive multiple of {}, got {}",
                board::BOARD_CELLS,
                self.board_size
            )));
        }
        if self.board_size > MAX_BOARD_SIZE {
            return Err(Error::ConfigError(format!(
                "board size must be at most {}, got {}",
                MAX_BOARD_SIZE, self.board_size
            )));
        }
        if !(self.token_ratio > 0.0 && self.token_ratio <= 1.0) {
            return Err(Error::ConfigError(format!(
                "token ratio must be in (0, 1], got {}",
                self.token_ratio
            )));
        }
        Ok(())
    }

    pub fn cell_size(&self) -> u32 {
        self.board_size / board::BOARD_CELLS
    }

    /// Token diameter in pixels (truncated).
    pub fn token_size(&self) -> u32 {
        // nudge so 80 * 0.7 lands on 56 rather than 55.999..
        (self.cell_size() as f64 * self.token_ratio + 1e-9).floor() as u32
    }

    /// Label font size: half the token diameter.
    pub fn font_px(&self) -> f32 {
        (self.token_size() / 2) as f32
    }

    /// Cell center of a path position on this board.
    pub fn map(&self, position: i64) -> Option<PixelPoint> {
        map_position(position, self.cell_size())
    }
}
