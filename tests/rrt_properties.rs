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

//! Property-based invariant tests for the planner.
//!
//! 1. The tree never holds more than start + budget + goal
//! 2. Every parent index points at an earlier node
//! 3. Every extension is exactly one step long and clear of the obstacle
//! 4. Success always comes with a goal-to-start path along parent links
//! 5. Failure only happens once the whole budget is spent
//! 6. The same seed grows the same tree

use float_cmp::approx_eq;
use proptest::prelude::*;
use rrtplanning::config::RrtParams;
use rrtplanning::geometry::{Point, World};
use rrtplanning::planning::rrt::{rrt, Outcome};
use rrtplanning::tree::Distance;

// ── Strategies ──────────────────────────────────────────────────────────

fn free_point() -> impl Strategy<Value = Point> {
    (0.0f64..=12.0, 0.0f64..=12.0)
        .prop_map(|(x, y)| Point::new(x, y))
        .prop_filter("must be clear of the obstacle", |p| {
            World::default().is_free(p)
        })
}

fn params_strategy() -> impl Strategy<Value = RrtParams> {
    (0usize..120, 0.2f64..2.0, 0usize..40, any::<u64>()).prop_map(
        |(budget, step, rate, seed)| {
            RrtParams::new(budget, step, rate)
                .with_seed(seed)
                .with_max_attempts(1_000_000)
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn tree_invariants_hold(start in free_point(), goal in free_point(), params in params_strategy()) {
        let world = World::default();
        let plan = rrt(&start, &goal, &world, &params).unwrap();
        let tree = &plan.tree;

        prop_assert!(tree.size() <= params.node_budget + 2);
        prop_assert!(tree.is_forest());
        prop_assert_eq!(*tree.root(), start);

        let extensions = if plan.success() { tree.size() - 1 } else { tree.size() };
        for node in &tree.nodes()[1..extensions] {
            let parent = tree.value(node.parent().unwrap()).unwrap();
            prop_assert!(approx_eq!(f64, node.value().distance(parent), params.step_size, epsilon = 1e-9));
            prop_assert!(!world.obstacle.intersects(node.value(), parent));
        }
    }

    #[test]
    fn outcome_matches_path(start in free_point(), goal in free_point(), params in params_strategy()) {
        let world = World::default();
        let plan = rrt(&start, &goal, &world, &params).unwrap();

        match plan.outcome {
            Outcome::GoalConnected => {
                let path = plan.path.clone().unwrap();
                prop_assert_eq!(path[0], plan.tree.size() - 1);
                prop_assert_eq!(*path.last().unwrap(), 0);
                for pair in path.windows(2) {
                    prop_assert_eq!(plan.tree.get(pair[0]).unwrap().parent(), Some(pair[1]));
                }

                let points = plan.path_points();
                prop_assert_eq!(points[0], goal);
                prop_assert_eq!(*points.last().unwrap(), start);

                // The goal was attached to the last extension for a reason
                let last = points[1];
                prop_assert!(
                    !world.obstacle.intersects(&last, &goal)
                        || last.distance(&goal) <= params.step_size
                );
            }
            Outcome::BudgetExhausted => {
                prop_assert!(plan.path.is_none());
                prop_assert_eq!(plan.tree.size(), params.node_budget + 1);
            }
            other => prop_assert!(false, "unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn same_seed_same_tree(start in free_point(), goal in free_point(), params in params_strategy()) {
        let world = World::default();
        let a = rrt(&start, &goal, &world, &params).unwrap();
        let b = rrt(&start, &goal, &world, &params).unwrap();

        prop_assert_eq!(a.outcome, b.outcome);
        prop_assert_eq!(a.tree.nodes(), b.tree.nodes());
        prop_assert_eq!(a.path, b.path);
    }
}
