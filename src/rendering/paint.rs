/// Display list for a board: grid decoration plus one ellipse and label per token.

use crate::board::BOARD_CELLS;
use crate::font::FontHandle;
use crate::rendering::layout::{Rect, TokenLayout};
use crate::BoardConfig;
use image::Rgb;

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Fill the whole canvas
    Clear { rgb: Rgb<u8> },
    /// One-pixel line, endpoints inclusive; clipped to the canvas
    Line {
        from: (i32, i32),
        to: (i32, i32),
        rgb: Rgb<u8>,
    },
    /// Ellipse inscribed in `bounds` with a one-pixel outline
    Ellipse {
        bounds: Rect,
        fill: Rgb<u8>,
        outline: Rgb<u8>,
    },
    /// Text whose line box starts at (`x`, `y`)
    Text {
        x: i32,
        y: i32,
        text: String,
        rgb: Rgb<u8>,
    },
}

/// Background and the 11 + 11 grid lines at multiples of the cell size.
pub fn grid_commands(config: &BoardConfig) -> Vec<PaintCommand> {
    let size = config.board_size as i32;
    let cell = config.cell_size() as i32;
    let mut cmds = vec![PaintCommand::Clear {
        rgb: config.background,
    }];
    for i in 0..=BOARD_CELLS as i32 {
        let at = i * cell;
        cmds.push(PaintCommand::Line {
            from: (at, 0),
            to: (at, size),
            rgb: config.grid_color,
        });
        cmds.push(PaintCommand::Line {
            from: (0, at),
            to: (size, at),
            rgb: config.grid_color,
        });
    }
    cmds
}

/// Commands for one token: its disc, then its label centered by ink box.
pub fn token_commands(config: &BoardConfig, token: &TokenLayout, font: &FontHandle) -> [PaintCommand; 2] {
    let ink = font.text_bounds(&token.label);
    // center the ink box, not the text origin
    let x = token.center.x - (ink.left + ink.right) / 2;
    let y = token.center.y - (ink.top + ink.bottom) / 2;
    [
        PaintCommand::Ellipse {
            bounds: token.bounds,
            fill: token.fill,
            outline: config.outline_color,
        },
        PaintCommand::Text {
            x,
            y,
            text: token.label.clone(),
            rgb: config.label_color,
        },
    ]
}

/// Full display list; later tokens paint over earlier ones.
pub fn paint_board(config: &BoardConfig, tokens: &[TokenLayout], font: &FontHandle) -> Vec<PaintCommand> {
    let mut cmds = grid_commands(config);
    for token in tokens {
        cmds.extend(token_commands(config, token, font));
    }
    cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PixelPoint;

    #[test]
    fn grid_has_eleven_lines_each_way() {
        let cmds = grid_commands(&BoardConfig::default());
        assert_eq!(cmds.len(), 1 + 22);
        let verticals = cmds
            .iter()
            .filter(|c| matches!(c, PaintCommand::Line { from, to, .. } if from.0 == to.0))
            .count();
        assert_eq!(verticals, 11);
    }

    #[test]
    fn label_ink_is_centered_on_token() {
        let cfg = BoardConfig::default();
        let font = FontHandle::builtin(cfg.font_px());
        let center = PixelPoint { x: 440, y: 360 };
        let token = TokenLayout {
            position: 45,
            center,
            bounds: Rect::centered(center, 28),
            fill: Rgb([0, 128, 0]),
            label: "1".into(),
        };
        let [disc, label] = token_commands(&cfg, &token, &font);
        assert!(matches!(disc, PaintCommand::Ellipse { fill, .. } if fill == Rgb([0, 128, 0])));
        let PaintCommand::Text { x, y, .. } = label.clone() else {
            panic!("expected text, got {:?}", label);
        };
        let ink = font.text_bounds("1");
        let (mid_x, mid_y) = (x + (ink.left + ink.right) / 2, y + (ink.top + ink.bottom) / 2);
        assert!((mid_x - center.x).abs() <= 1);
        assert!((mid_y - center.y).abs() <= 1);
    }
}
