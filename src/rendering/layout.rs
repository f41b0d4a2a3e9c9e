/// Token placement: players to positioned, colored token boxes.

use crate::board::PixelPoint;
use crate::{BoardConfig, PlayerToken, Result};
use image::Rgb;
use log::debug;

/// Axis-aligned pixel rectangle; `width` and `height` count pixels inclusively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Square spanning `center - half ..= center + half` on both axes.
    pub fn centered(center: PixelPoint, half: i32) -> Self {
        let side = (2 * half + 1).max(0) as u32;
        Rect {
            x: center.x - half,
            y: center.y - half,
            width: side,
            height: side,
        }
    }

    /// Last column inside the rectangle.
    pub fn max_x(&self) -> i32 {
        self.x + self.width as i32 - 1
    }

    /// Last row inside the rectangle.
    pub fn max_y(&self) -> i32 {
        self.y + self.height as i32 - 1
    }
}

/// A token ready to be painted.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenLayout {
    pub position: i64,
    pub center: PixelPoint,
    pub bounds: Rect,
    pub fill: Rgb<u8>,
    pub label: String,
}

/// Place every on-board player, preserving input order.
///
/// Players whose position does not map to a cell are skipped. A color is
/// only resolved for players that are placed; an unparseable one fails the
/// whole layout.
pub fn layout_tokens(config: &BoardConfig, players: &[PlayerToken]) -> Result<Vec<TokenLayout>> {
    let half = (config.token_size() / 2) as i32;
    let mut tokens = Vec::with_capacity(players.len());
    for player in players {
        let position = player.position();
        let Some(center) = config.map(position) else {
            debug!("Token {:?} at position {} is off the board; skipping", player.label(), position);
            continue;
        };
        tokens.push(TokenLayout {
            position,
            center,
            bounds: Rect::centered(center, half),
            fill: player.resolve_color()?,
            label: player.label().to_string(),
        });
    }
    Ok(tokens)
}
