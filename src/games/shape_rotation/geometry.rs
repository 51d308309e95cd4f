//! Point-set kernel shared by the letter and grid rounds.
//!
//! A shape is a flat list of points where `(points[2k], points[2k + 1])` is
//! one drawn segment. Everything downstream of parsing works on straight
//! segments only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Tolerance for coordinate comparisons.
pub const EPSILON: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn approx_eq(&self, other: &Point) -> bool {
        (self.x - other.x).abs() <= EPSILON && (self.y - other.y).abs() <= EPSILON
    }
}

/// True when both sets hold the same points, in any order, within
/// [`EPSILON`] on each axis.
///
/// Every point of `a` must be paired with a distinct point of `b`. Candidates
/// come from an `EPSILON` window along x, and earlier pairings are revisited
/// when a later point has no free candidate left.
pub fn compare_point_sets(a: &[Point], b: &[Point]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut b = b.to_vec();
    b.sort_by(|p, q| p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y)));

    let candidates: Vec<Vec<usize>> = a
        .iter()
        .map(|p| {
            let start = b.partition_point(|q| q.x < p.x - EPSILON);
            (start..b.len())
                .take_while(|&j| b[j].x <= p.x + EPSILON)
                .filter(|&j| p.approx_eq(&b[j]))
                .collect()
        })
        .collect();

    let mut owner: Vec<Option<usize>> = vec![None; b.len()];
    for i in 0..a.len() {
        let mut visited = vec![false; b.len()];
        if !augment(i, &candidates, &mut owner, &mut visited) {
            return false;
        }
    }
    true
}

/// Find a free partner for `i`, moving earlier pairings along if needed.
fn augment(
    i: usize,
    candidates: &[Vec<usize>],
    owner: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &j in &candidates[i] {
        if visited[j] {
            continue;
        }
        visited[j] = true;
        let free = match owner[j] {
            None => true,
            Some(other) => augment(other, candidates, owner, visited),
        };
        if free {
            owner[j] = Some(i);
            return true;
        }
    }
    false
}

/// Mean of all points. The origin for an empty set.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::new(0.0, 0.0);
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

/// Center of the axis-aligned bounding box.
pub fn bounding_center(points: &[Point]) -> Point {
    let Some(first) = points.first() else {
        return Point::new(0.0, 0.0);
    };
    let (min_x, min_y, max_x, max_y) = points.iter().fold(
        (first.x, first.y, first.x, first.y),
        |(min_x, min_y, max_x, max_y), p| {
            (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
        },
    );
    Point::new(min_x + (max_x - min_x) / 2.0, min_y + (max_y - min_y) / 2.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    #[serde(rename = "rotate_left_45")]
    RotateLeft45,
    #[serde(rename = "rotate_right_45")]
    RotateRight45,
    FlipHorizontal,
    FlipVertical,
}

impl Transform {
    pub const ALL: [Transform; 4] = [
        Transform::RotateLeft45,
        Transform::RotateRight45,
        Transform::FlipHorizontal,
        Transform::FlipVertical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Transform::RotateLeft45 => "rotate_left_45",
            Transform::RotateRight45 => "rotate_right_45",
            Transform::FlipHorizontal => "flip_horizontal",
            Transform::FlipVertical => "flip_vertical",
        }
    }

    /// The move that undoes this one. Flips are their own inverse.
    pub fn inverse(&self) -> Transform {
        match self {
            Transform::RotateLeft45 => Transform::RotateRight45,
            Transform::RotateRight45 => Transform::RotateLeft45,
            flip => *flip,
        }
    }

    /// Apply to a point already expressed relative to the center.
    fn apply(&self, p: Point) -> Point {
        let angle = match self {
            Transform::RotateRight45 => std::f64::consts::FRAC_PI_4,
            Transform::RotateLeft45 => -std::f64::consts::FRAC_PI_4,
            Transform::FlipHorizontal => return Point::new(-p.x, p.y),
            Transform::FlipVertical => return Point::new(p.x, -p.y),
        };
        let (sin, cos) = angle.sin_cos();
        Point::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transform {
    type Err = GameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Transform::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| GameError::invalid_choice(value))
    }
}

/// Apply `transforms` in order around `center`, or around the centroid of
/// `points` when no center is given.
pub fn apply_transforms(points: &[Point], transforms: &[Transform], center: Option<Point>) -> Vec<Point> {
    let c = center.unwrap_or_else(|| centroid(points));
    points
        .iter()
        .map(|p| {
            let relative = Point::new(p.x - c.x, p.y - c.y);
            let moved = transforms.iter().fold(relative, |acc, t| t.apply(acc));
            Point::new(moved.x + c.x, moved.y + c.y)
        })
        .collect()
}
