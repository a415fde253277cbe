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

// Grow a tree from the start:
//
// remaining = budget
// While remaining > 0:
//     Xrand = Sample()              // the goal itself every n-th node
//     Xnear = Nearest(T, Xrand)
//     Xnew  = Steer(Xnear, Xrand)   // exactly one step toward Xrand
//     if Collides(Xnear, Xnew):
//         continue                  // free retry
//     T.add(Xnear -> Xnew); remaining -= 1
//     if !Collides(Xnew, goal) or |Xnew - goal| <= step:
//         T.add(Xnew -> goal)
//         Return Backtrack(goal)
// Return failure

use crate::config::RrtParams;
use crate::error::{PlanningError, Result};
use crate::geometry::{Point, World};
use crate::planning::sampler::Sampler;
use crate::tree::{Distance, Tree};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, trace};

/// How a planning run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The goal was added to the tree.
    GoalConnected,

    /// Every unit of node budget was spent without reaching the goal.
    BudgetExhausted,

    /// `max_attempts` loop passes ran out first.
    AttemptLimit,

    /// `max_duration` elapsed first.
    TimedOut,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::GoalConnected
    }
}

/// Result of a planning run: the full tree, and on success the path through it.
#[derive(Debug, Clone)]
pub struct Plan {
    pub outcome: Outcome,

    pub tree: Tree<Point>,

    /// Tree indices from the goal back to the start. Only present on success.
    pub path: Option<Vec<usize>>,

    /// Loop passes taken, collision retries included.
    pub attempts: u64,
}

impl Plan {
    pub fn success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Coordinates along the path, goal first. Empty when planning failed.
    pub fn path_points(&self) -> Vec<Point> {
        self.path
            .iter()
            .flatten()
            .filter_map(|&i| self.tree.value(i).copied())
            .collect()
    }
}

/// Returns the point exactly `step` away from `nearest` in the direction of `sample`.
///
/// A sample on top of `nearest` has no direction and steers along +x.
pub fn steer(nearest: &Point, sample: &Point, step: f64) -> Point {
    let theta = nearest.bearing(sample);
    Point::new(
        nearest.x + step * theta.cos(),
        nearest.y + step * theta.sin(),
    )
}

/// Goal connection test for a freshly added node.
///
/// The goal is reachable if the straight segment to it is clear, or if it is
/// within one step regardless of the obstacle.
pub fn reaches_goal(world: &World, new_point: &Point, goal: &Point, step: f64) -> bool {
    !world.obstacle.intersects(new_point, goal) || new_point.distance(goal) <= step
}

/// Walks parent links from `goal` back to the root.
///
/// # Errors
///
/// If the chain is cyclic, dangles, or ends somewhere other than the root.
pub fn backtrack(tree: &Tree<Point>, goal: usize) -> Result<Vec<usize>> {
    let path = tree.path(goal)?;
    match path.last() {
        Some(&0) => Ok(path),
        Some(&index) => Err(PlanningError::BrokenChain { index }),
        None => Err(PlanningError::BrokenChain { index: goal }),
    }
}

/// Attempts to extend the tree toward a new sample.
/// Returns the new point and the index of its parent, or None if it collides
/// or no node lies within the nearest-neighbor bound.
fn extend_tree(
    tree: &Tree<Point>,
    sampler: &mut Sampler,
    world: &World,
    goal: &Point,
    step: f64,
    bound: f64,
) -> Option<(Point, usize)> {
    let sample = sampler.sample(goal, tree.size());
    let Some(nearest) = tree.nearest_within(&sample, bound) else {
        trace!(%sample, "no tree node within bound");
        return None;
    };
    let near_point = tree.value(nearest)?;
    let new_point = steer(near_point, &sample, step);

    // If it is an invalid point try again
    if world.obstacle.intersects(&new_point, near_point) {
        trace!(%sample, %new_point, "extension collides with obstacle");
        return None;
    }

    Some((new_point, nearest))
}

/// Plans a path from `start` to `goal` around the world's obstacle.
///
/// The caller is expected to have checked that both endpoints are free.
/// Collisions are retried without consuming node budget, and the goal is only
/// tested for after an extension, so a zero budget never succeeds.
///
/// # Parameters
///
/// - `start`: Root of the tree
/// - `goal`: Point to connect to
/// - `world`: Search region and obstacle
/// - `params`: Node budget, step size, goal sample rate, seed and optional limits
///
/// # Returns
/// Returns a `Result` containing either:
/// - `Ok(Plan)`: The tree, how the search ended, and on success the path from goal to start.
///   Failing to find a path is reported here, not as an error.
/// - `Err(PlanningError)`: The parameters are invalid, or the tree invariants broke.
///
/// # Errors
///
/// See above.
pub fn rrt(start: &Point, goal: &Point, world: &World, params: &RrtParams) -> Result<Plan> {
    params.validate()?;

    let mut sampler = Sampler::new(
        world.region,
        params.goal_sample_rate,
        params.node_budget,
        params.seed,
    );
    let mut tree = Tree::new(*start, params.tree_capacity());
    let bound = params.nearest_bound.unwrap_or(f64::INFINITY);
    let start_time = Instant::now();

    info!(
        %start,
        %goal,
        budget = params.node_budget,
        step = params.step_size,
        goal_sample_rate = sampler.goal_sample_rate(),
        seed = params.seed,
        "planning"
    );

    let mut remaining = params.node_budget;
    let mut attempts: u64 = 0;
    let mut goal_idx = None;
    let outcome = loop {
        if remaining == 0 {
            break Outcome::BudgetExhausted;
        }
        if params.max_attempts.is_some_and(|max| attempts >= max) {
            break Outcome::AttemptLimit;
        }
        // Have we timed out?
        if params
            .max_duration
            .is_some_and(|limit| start_time.elapsed() > limit)
        {
            break Outcome::TimedOut;
        }
        attempts += 1;

        let Some((new_point, nearest)) =
            extend_tree(&tree, &mut sampler, world, goal, params.step_size, bound)
        else {
            continue;
        };
        let new_idx = tree.add_child(nearest, new_point)?;
        remaining -= 1;
        trace!(index = new_idx, parent = nearest, %new_point, remaining, "extended");

        if reaches_goal(world, &new_point, goal, params.step_size) {
            goal_idx = Some(tree.add_child(new_idx, *goal)?);
            break Outcome::GoalConnected;
        }
    };

    let path = goal_idx.map(|idx| backtrack(&tree, idx)).transpose()?;
    debug!(
        ?outcome,
        nodes = tree.size(),
        attempts,
        path_len = path.as_ref().map_or(0, Vec::len),
        "planning finished"
    );

    Ok(Plan {
        outcome,
        tree,
        path,
        attempts,
    })
}

//
// Unit tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Obstacle, Region};
    use float_cmp::approx_eq;

    #[test]
    fn test_steer_moves_one_step() {
        let p = steer(&Point::new(1.0, 1.0), &Point::new(4.0, 5.0), 1.0);
        assert!(approx_eq!(f64, p.x, 1.6, epsilon = 1e-12));
        assert!(approx_eq!(f64, p.y, 1.8, epsilon = 1e-12));

        // Overshoots samples closer than a step
        let p = steer(&Point::new(0.0, 0.0), &Point::new(0.0, 0.5), 2.0);
        assert!(approx_eq!(f64, p.x, 0.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, p.y, 2.0, epsilon = 1e-12));

        // No direction at all
        let p = steer(&Point::new(3.0, 3.0), &Point::new(3.0, 3.0), 0.5);
        assert_eq!(p, Point::new(3.5, 3.0));
    }

    #[test]
    fn test_reaches_goal() {
        let world = World::default();
        let goal = Point::new(12.0, 12.0);

        // Line of sight
        assert!(reaches_goal(&world, &Point::new(0.0, 8.0), &goal, 1.0));

        // Blocked and far away
        assert!(!reaches_goal(&world, &Point::new(0.0, 0.0), &goal, 1.0));

        // Blocked but within a step, which still counts
        let near = Point::new(5.0, 3.5);
        let behind = Point::new(5.0, 4.5);
        assert!(reaches_goal(&world, &near, &behind, 1.0));
        assert!(!reaches_goal(&world, &near, &behind, 0.5));
    }

    #[test]
    fn test_backtrack_requires_root() {
        let mut tree = Tree::new(Point::new(0.0, 0.0), 4);
        let a = tree.add_child(0, Point::new(1.0, 0.0)).unwrap();
        let b = tree.add_child(a, Point::new(2.0, 0.0)).unwrap();

        assert_eq!(backtrack(&tree, b).unwrap(), vec![b, a, 0]);
        assert!(matches!(
            backtrack(&tree, 17),
            Err(PlanningError::BrokenChain { index: 17 })
        ));
    }

    #[test]
    fn test_zero_budget_fails() {
        // Even with a clear line to the goal
        let world = World::default();
        let params = RrtParams::new(0, 1.0, 1);
        let plan = rrt(&Point::new(0.0, 0.0), &Point::new(1.0, 0.0), &world, &params).unwrap();

        assert_eq!(plan.outcome, Outcome::BudgetExhausted);
        assert!(!plan.success());
        assert!(plan.path.is_none());
        assert!(plan.path_points().is_empty());
        assert_eq!(plan.tree.size(), 1);
        assert_eq!(plan.attempts, 0);
    }

    #[test]
    fn test_connects_after_first_extension() {
        // Nothing stands between the first step and the goal
        let world = World::default();
        let start = Point::new(0.0, 0.0);
        let goal = Point::new(0.0, 3.0);
        let plan = rrt(&start, &goal, &world, &RrtParams::new(1, 1.0, 0).with_seed(5)).unwrap();

        assert_eq!(plan.outcome, Outcome::GoalConnected);
        assert_eq!(plan.tree.size(), 3);
        assert_eq!(plan.tree.capacity(), 3);
        assert_eq!(plan.path, Some(vec![2, 1, 0]));

        let points = plan.path_points();
        assert_eq!(points.first(), Some(&goal));
        assert_eq!(points.last(), Some(&start));
    }

    #[test]
    fn test_unreachable_bound_hits_attempt_limit() {
        // Samples are on the lattice, so a start off it is never within 0.5
        let world = World::default();
        let params = RrtParams::new(10, 1.0, 0)
            .with_nearest_bound(0.5)
            .with_max_attempts(100);
        let plan = rrt(&Point::new(0.5, 0.5), &Point::new(11.0, 11.0), &world, &params).unwrap();

        assert_eq!(plan.outcome, Outcome::AttemptLimit);
        assert_eq!(plan.attempts, 100);
        assert_eq!(plan.tree.size(), 1);
    }

    #[test]
    fn test_enclosed_start_exhausts_budget() {
        // A box around the goal that nothing can get into or see through
        let walls = vec![
            Point::new(8.0, 8.0),
            Point::new(12.0, 8.0),
            Point::new(12.0, 12.0),
            Point::new(8.0, 12.0),
        ];
        let world = World::new(Region::default(), Obstacle::new(walls).unwrap());
        let params = RrtParams::new(30, 0.5, 5).with_seed(9);
        let plan = rrt(&Point::new(1.0, 1.0), &Point::new(10.0, 10.0), &world, &params).unwrap();

        assert_eq!(plan.outcome, Outcome::BudgetExhausted);
        assert_eq!(plan.tree.size(), 31);
        assert!(plan.attempts >= 30);
        assert!(plan.path.is_none());
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let world = World::default();
        let result = rrt(
            &Point::new(0.0, 0.0),
            &Point::new(12.0, 12.0),
            &world,
            &RrtParams::new(10, 0.0, 0),
        );
        assert!(matches!(result, Err(PlanningError::InvalidParameter { .. })));
    }
}
