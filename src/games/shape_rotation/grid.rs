//! Round-two grid shapes: filled cells on a 4x4 board.

use super::geometry::Point;
use super::path::ShapeError;

pub const GRID_SIZE: usize = 4;
pub const CELL_SIZE: usize = 50;

/// Grid problems rotate and flip around the board center.
pub const GRID_CENTER: Point = Point::new(
    (GRID_SIZE * CELL_SIZE / 2) as f64,
    (GRID_SIZE * CELL_SIZE / 2) as f64,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridProblem {
    pub id: u32,
    /// Rows separated by `/`, `1` marks a filled cell.
    pub cells: &'static str,
}

pub static GRID_PROBLEMS: [GridProblem; 12] = [
    GridProblem { id: 1, cells: "1000/1000/1100/0000" },
    GridProblem { id: 2, cells: "0100/1110/0000/0000" },
    GridProblem { id: 3, cells: "1100/0110/0000/0000" },
    GridProblem { id: 4, cells: "1110/1000/1000/0000" },
    GridProblem { id: 5, cells: "0010/0110/1100/0000" },
    GridProblem { id: 6, cells: "1000/1110/0010/0000" },
    GridProblem { id: 7, cells: "1100/0100/0111/0000" },
    GridProblem { id: 8, cells: "0100/0110/0100/0100" },
    GridProblem { id: 9, cells: "1111/1000/0000/0000" },
    GridProblem { id: 10, cells: "0110/0110/0110/1110" },
    GridProblem { id: 11, cells: "1010/1110/0010/0000" },
    GridProblem { id: 12, cells: "0001/0011/0110/1100" },
];

/// Outline every filled cell as four segments: top, right, bottom, left.
pub fn parse_grid(cells: &str) -> Result<Vec<Point>, ShapeError> {
    let mut points = Vec::new();
    for (row, line) in cells.split('/').enumerate() {
        let found = line.chars().count();
        if found != GRID_SIZE {
            return Err(ShapeError::GridRow {
                row,
                found,
                expected: GRID_SIZE,
            });
        }

        for (col, cell) in line.chars().enumerate() {
            if cell != '1' {
                continue;
            }
            let left = (col * CELL_SIZE) as f64;
            let top = (row * CELL_SIZE) as f64;
            let right = left + CELL_SIZE as f64;
            let bottom = top + CELL_SIZE as f64;

            points.extend([
                Point::new(left, top),
                Point::new(right, top),
                Point::new(right, top),
                Point::new(right, bottom),
                Point::new(right, bottom),
                Point::new(left, bottom),
                Point::new(left, bottom),
                Point::new(left, top),
            ]);
        }
    }
    Ok(points)
}

/// Board overlay: five vertical and five horizontal lines.
pub fn grid_lines() -> Vec<Point> {
    let extent = (GRID_SIZE * CELL_SIZE) as f64;
    (0..=GRID_SIZE)
        .flat_map(|i| {
            let offset = (i * CELL_SIZE) as f64;
            [
                Point::new(offset, 0.0),
                Point::new(offset, extent),
                Point::new(0.0, offset),
                Point::new(extent, offset),
            ]
        })
        .collect()
}
