// MIT License
//
// Copyright (c) 2024 Erik Holum
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Planar primitives and the obstacle predicates used for collision checking.
//!
//! Predicates are closed: a segment that only grazes an edge or vertex of the
//! obstacle intersects it, and a point on the boundary is contained by it.
use crate::error::{PlanningError, Result};
use crate::tree::Distance;
use geo::{Coord, Intersects, Line, LineString, Polygon};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Bearing from this point toward `other`, in radians.
    pub fn bearing(&self, other: &Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    fn coord(self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }
}

// Norm distance function for 2D points
impl Distance for Point {
    fn distance(&self, other: &Point) -> f64 {
        let (dx, dy) = (self.x - other.x, self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

// Handy for debugging
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Square sampling region on the integer lattice.
///
/// Covers coordinates `offset..=offset + range - 1` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Region {
    pub offset: i32,
    pub range: u32,
}

impl Region {
    pub fn new(offset: i32, range: u32) -> Self {
        Region { offset, range }
    }

    pub fn min(&self) -> f64 {
        f64::from(self.offset)
    }

    /// Largest coordinate the sampler can produce.
    pub fn max(&self) -> f64 {
        f64::from(self.offset) + f64::from(self.range.saturating_sub(1))
    }

    /// True if the point lies in the closed square `[min, max]²`.
    pub fn contains(&self, point: &Point) -> bool {
        let (min, max) = (self.min(), self.max());
        (min..=max).contains(&point.x) && (min..=max).contains(&point.y)
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::new(0, 13)
    }
}

/// A single closed polygonal obstacle.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    vertices: Vec<Point>,
    polygon: Polygon<f64>,
}

impl Obstacle {
    /// Builds the obstacle from its vertex ring. The ring is closed implicitly.
    ///
    /// # Errors
    ///
    /// If fewer than three vertices are given, or any of them is not finite.
    pub fn new(vertices: Vec<Point>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(PlanningError::InvalidObstacle {
                vertices: vertices.len(),
            });
        }
        if let Some(bad) = vertices
            .iter()
            .find(|v| !v.x.is_finite() || !v.y.is_finite())
        {
            return Err(PlanningError::invalid(format!(
                "obstacle vertex {bad:?} is not finite"
            )));
        }

        Ok(Obstacle::from_ring(vertices))
    }

    fn from_ring(vertices: Vec<Point>) -> Self {
        let ring: LineString<f64> = vertices.iter().map(|v| v.coord()).collect();
        Obstacle {
            polygon: Polygon::new(ring, vec![]),
            vertices,
        }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// True if the closed segment between `a` and `b` touches the obstacle's
    /// boundary or interior.
    pub fn intersects(&self, a: &Point, b: &Point) -> bool {
        Line::new(a.coord(), b.coord()).intersects(&self.polygon)
    }

    /// True if the point is inside the obstacle or on its boundary.
    pub fn contains(&self, point: &Point) -> bool {
        self.polygon.intersects(&point.coord())
    }
}

impl Default for Obstacle {
    fn default() -> Self {
        let vertices = [(2.0, 7.0), (7.0, 7.0), (6.0, 4.0), (4.0, 4.0), (4.0, 6.0), (2.0, 6.0)]
            .into_iter()
            .map(Point::from)
            .collect();
        Obstacle::from_ring(vertices)
    }
}

/// The search space: a sampling region with one obstacle in it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct World {
    pub region: Region,
    pub obstacle: Obstacle,
}

impl World {
    pub fn new(region: Region, obstacle: Obstacle) -> Self {
        World { region, obstacle }
    }

    /// True if the point is in the region and clear of the obstacle.
    pub fn is_free(&self, point: &Point) -> bool {
        self.region.contains(point) && !self.obstacle.contains(point)
    }
}

//
// Unit tests
//
