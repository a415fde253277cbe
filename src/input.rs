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

//! Checks applied to user input before it reaches the planner.
//!
//! The planner trusts its endpoints, so anything outside the region or on the
//! obstacle has to be turned away here.
use crate::config::MAX_NODE_BUDGET;
use crate::error::{PlanningError, Result};
use crate::geometry::{Point, World};

/// # Errors
///
/// If the point is not finite, lies outside the search region, or touches the obstacle.
pub fn validate_endpoint(world: &World, point: &Point) -> Result<()> {
    if !point.x.is_finite() || !point.y.is_finite() || !world.region.contains(point) {
        return Err(PlanningError::OutOfRegion {
            x: point.x,
            y: point.y,
        });
    }
    if world.obstacle.contains(point) {
        return Err(PlanningError::InsideObstacle {
            x: point.x,
            y: point.y,
        });
    }
    Ok(())
}

/// # Errors
///
/// If the budget is above [`MAX_NODE_BUDGET`].
pub fn validate_budget(node_budget: usize) -> Result<()> {
    if node_budget > MAX_NODE_BUDGET {
        return Err(PlanningError::invalid(format!(
            "node budget must be between 0 and {MAX_NODE_BUDGET}, got {node_budget}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_inside_obstacle_is_rejected() {
        let world = World::default();
        assert!(matches!(
            validate_endpoint(&world, &Point::new(5.0, 5.0)),
            Err(PlanningError::InsideObstacle { .. })
        ));
        assert!(matches!(
            validate_endpoint(&world, &Point::new(4.0, 5.0)),
            Err(PlanningError::InsideObstacle { .. })
        ));
    }

    #[test]
    fn test_endpoint_outside_region_is_rejected() {
        let world = World::default();
        for p in [
            Point::new(-0.5, 3.0),
            Point::new(3.0, 12.5),
            Point::new(f64::NAN, 1.0),
        ] {
            assert!(matches!(
                validate_endpoint(&world, &p),
                Err(PlanningError::OutOfRegion { .. })
            ));
        }
    }

    #[test]
    fn test_free_endpoints_pass() {
        let world = World::default();
        assert!(validate_endpoint(&world, &Point::new(0.0, 0.0)).is_ok());
        assert!(validate_endpoint(&world, &Point::new(12.0, 12.0)).is_ok());
        assert!(validate_endpoint(&world, &Point::new(3.0, 5.0)).is_ok());
    }

    #[test]
    fn test_budget_range() {
        assert!(validate_budget(0).is_ok());
        assert!(validate_budget(MAX_NODE_BUDGET).is_ok());
        assert!(validate_budget(MAX_NODE_BUDGET + 1).is_err());
    }
}
