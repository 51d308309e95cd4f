//! SVG-style path data to segment lists and back.

use std::fmt::Write as _;

use thiserror::Error;

use super::geometry::Point;

/// Straight segments each curve is split into.
pub const TESSELLATION_SEGMENTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("invalid number '{value}' in path command {command}")]
    InvalidNumber { command: char, value: String },

    #[error("path command {command} expects {expected} numbers, got {found}")]
    MissingArguments {
        command: char,
        expected: usize,
        found: usize,
    },

    #[error("unsupported path command '{0}'")]
    UnknownCommand(char),

    #[error("grid row {row} has {found} cells, expected {expected}")]
    GridRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("shape is left unchanged by every rotation and flip")]
    Immovable,
}

fn is_command(c: char) -> bool {
    matches!(c, 'M' | 'L' | 'Q' | 'C' | 'Z')
}

fn split_commands(data: &str) -> Result<Vec<(char, &str)>, ShapeError> {
    let mut commands = Vec::new();
    let mut current: Option<(char, usize)> = None;

    for (pos, c) in data.char_indices() {
        if is_command(c) {
            if let Some((command, start)) = current.take() {
                commands.push((command, &data[start..pos]));
            }
            current = Some((c, pos + c.len_utf8()));
        } else if current.is_none() && !c.is_whitespace() {
            return Err(ShapeError::UnknownCommand(c));
        } else if c.is_ascii_alphabetic() {
            return Err(ShapeError::UnknownCommand(c));
        }
    }
    if let Some((command, start)) = current {
        commands.push((command, &data[start..]));
    }
    Ok(commands)
}

fn parse_args(command: char, args: &str, expected: usize) -> Result<Vec<f64>, ShapeError> {
    let values = args
        .split(|c: char| c == ' ' || c == ',')
        .filter(|field| !field.trim().is_empty())
        .map(|field| {
            field.trim().parse::<f64>().map_err(|_| ShapeError::InvalidNumber {
                command,
                value: field.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() < expected {
        return Err(ShapeError::MissingArguments {
            command,
            expected,
            found: values.len(),
        });
    }
    Ok(values)
}

fn push_polyline(out: &mut Vec<Point>, samples: impl Iterator<Item = Point>) {
    let samples: Vec<Point> = samples.collect();
    for pair in samples.windows(2) {
        out.push(pair[0]);
        out.push(pair[1]);
    }
}

fn quadratic(p0: Point, p1: Point, p2: Point) -> impl Iterator<Item = Point> {
    (0..=TESSELLATION_SEGMENTS).map(move |i| {
        let t = i as f64 / TESSELLATION_SEGMENTS as f64;
        let mt = 1.0 - t;
        Point::new(
            mt * mt * p0.x + 2.0 * mt * t * p1.x + t * t * p2.x,
            mt * mt * p0.y + 2.0 * mt * t * p1.y + t * t * p2.y,
        )
    })
}

fn cubic(p0: Point, p1: Point, p2: Point, p3: Point) -> impl Iterator<Item = Point> {
    (0..=TESSELLATION_SEGMENTS).map(move |i| {
        let t = i as f64 / TESSELLATION_SEGMENTS as f64;
        let mt = 1.0 - t;
        let (a, b, c, d) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
        Point::new(
            a * p0.x + b * p1.x + c * p2.x + d * p3.x,
            a * p0.y + b * p1.y + c * p2.y + d * p3.y,
        )
    })
}

/// Parse absolute `M`/`L`/`Q`/`C`/`Z` path data into segments.
pub fn parse_path(data: &str) -> Result<Vec<Point>, ShapeError> {
    let mut points = Vec::new();
    let mut current = Point::new(0.0, 0.0);
    let mut start = current;

    for (command, args) in split_commands(data)? {
        match command {
            'M' => {
                let a = parse_args(command, args, 2)?;
                current = Point::new(a[0], a[1]);
                start = current;
            }
            'L' => {
                let a = parse_args(command, args, 2)?;
                let target = Point::new(a[0], a[1]);
                points.push(current);
                points.push(target);
                current = target;
            }
            'Q' => {
                let a = parse_args(command, args, 4)?;
                let end = Point::new(a[2], a[3]);
                push_polyline(&mut points, quadratic(current, Point::new(a[0], a[1]), end));
                current = end;
            }
            'C' => {
                let a = parse_args(command, args, 6)?;
                let end = Point::new(a[4], a[5]);
                push_polyline(
                    &mut points,
                    cubic(current, Point::new(a[0], a[1]), Point::new(a[2], a[3]), end),
                );
                current = end;
            }
            'Z' => {
                points.push(current);
                points.push(start);
            }
            other => return Err(ShapeError::UnknownCommand(other)),
        }
    }
    Ok(points)
}

/// Render segments back into path data with three decimals. A new `M` is
/// only emitted where a segment does not continue the previous one.
pub fn points_to_path(points: &[Point]) -> String {
    let mut out = String::new();
    let mut previous_end: Option<Point> = None;

    for segment in points.chunks_exact(2) {
        let (from, to) = (segment[0], segment[1]);
        if previous_end != Some(from) {
            if !out.is_empty() {
                out.push(' ');
            }
            let _ = write!(out, "M {:.3} {:.3}", from.x, from.y);
        }
        let _ = write!(out, " L {:.3} {:.3}", to.x, to.y);
        previous_end = Some(to);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::shape_rotation::geometry::compare_point_sets;

    #[test]
    fn lines_and_close() {
        let points = parse_path("M 0 0 L 10 0 L 10 10 Z").unwrap();
        assert_eq!(
            points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 0.0),
            ]
        );
    }

    #[test]
    fn commas_and_compact_commands() {
        let spaced = parse_path("M 1 2 L 3 4").unwrap();
        let compact = parse_path("M1,2L3,4").unwrap();
        assert_eq!(spaced, compact);
    }

    #[test]
    fn curves_are_tessellated() {
        let quad = parse_path("M 0 0 Q 5 10 10 0").unwrap();
        assert_eq!(quad.len(), TESSELLATION_SEGMENTS * 2);
        assert_eq!(quad[0], Point::new(0.0, 0.0));
        assert_eq!(*quad.last().unwrap(), Point::new(10.0, 0.0));

        let cubic = parse_path("M 0 0 C 0 10 10 10 10 0").unwrap();
        assert_eq!(cubic.len(), TESSELLATION_SEGMENTS * 2);
        // Segments chain end to start.
        assert_eq!(cubic[1], cubic[2]);
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(matches!(
            parse_path("M 0 zero"),
            Err(ShapeError::UnknownCommand('z'))
        ));
        assert!(matches!(
            parse_path("M 0 0 L 5"),
            Err(ShapeError::MissingArguments { command: 'L', expected: 2, found: 1 })
        ));
        assert!(matches!(
            parse_path("M 0 0 L 5 .."),
            Err(ShapeError::InvalidNumber { command: 'L', .. })
        ));
    }

    #[test]
    fn rendering_joins_continuous_segments() {
        let points = parse_path("M 0 0 L 10 0 L 10 10 M 20 20 L 30 30").unwrap();
        assert_eq!(
            points_to_path(&points),
            "M 0.000 0.000 L 10.000 0.000 L 10.000 10.000 M 20.000 20.000 L 30.000 30.000"
        );
    }

    #[test]
    fn rendered_path_parses_back_to_same_shape() {
        let points = parse_path("M 10 80 Q 52.5 10 95 80 L 60 40 Z").unwrap();
        let reparsed = parse_path(&points_to_path(&points)).unwrap();
        assert!(compare_point_sets(&points, &reparsed));
    }
}
