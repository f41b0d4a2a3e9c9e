//! Coordinate mapping for the serpentine 10x10 board.
//!
//! Path position 1 is the bottom-left cell. Row 0 runs left to right, row 1
//! right to left, and so on up to position 100 in the top-left cell.

/// Cells per board side.
pub const BOARD_CELLS: u32 = 10;

/// Highest path position on the board.
pub const LAST_POSITION: i64 = (BOARD_CELLS * BOARD_CELLS) as i64;

/// Pixel center of a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

/// Row and column of a path position, row 0 at the bottom of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

/// Locate a path position on the grid. Returns `None` outside 1..=100.
pub fn cell_of(position: i64) -> Option<Cell> {
    if !(1..=LAST_POSITION).contains(&position) {
        return None;
    }
    let zero_based = (position - 1) as u32;
    let row = zero_based / BOARD_CELLS;
    let mut col = zero_based % BOARD_CELLS;
    if row % 2 != 0 {
        col = BOARD_CELLS - 1 - col;
    }
    Some(Cell { row, col })
}

/// Map a path position to the pixel center of its cell.
///
/// The vertical axis is inverted relative to the row index: row 0 is drawn
/// at the bottom of the image.
pub fn map_position(position: i64, cell_size: u32) -> Option<PixelPoint> {
    let cell = cell_of(position)?;
    let half = cell_size / 2;
    let x = cell.col * cell_size + half;
    let y = (BOARD_CELLS - 1 - cell.row) * cell_size + half;
    Some(PixelPoint {
        x: x as i32,
        y: y as i32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_and_last_positions() {
        assert_eq!(map_position(1, 80), Some(PixelPoint { x: 40, y: 760 }));
        assert_eq!(map_position(100, 80), Some(PixelPoint { x: 40, y: 40 }));
    }

    #[test]
    fn odd_rows_run_right_to_left() {
        assert_eq!(cell_of(10), Some(Cell { row: 0, col: 9 }));
        assert_eq!(cell_of(11), Some(Cell { row: 1, col: 9 }));
        assert_eq!(cell_of(20), Some(Cell { row: 1, col: 0 }));
        assert_eq!(cell_of(21), Some(Cell { row: 2, col: 0 }));
    }

    #[test]
    fn out_of_range_is_absent() {
        for p in [i64::MIN, -5, 0, 101, i64::MAX] {
            assert_eq!(map_position(p, 80), None, "position {p}");
        }
    }
}
