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

//! Goal-biased sampling of the search region.
use crate::geometry::{Point, Region};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws lattice points from a [Region], substituting the goal at a fixed cadence.
///
/// The sampler keeps a threshold that starts at the goal sample rate. While the
/// tree holds fewer nodes than the threshold, samples are uniform over the region.
/// Once the tree catches up, the goal itself is returned and the threshold moves
/// forward by another `goal_sample_rate` nodes.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: StdRng,
    region: Region,
    goal_sample_rate: usize,

    // Tree size at which the goal is next returned.
    next_goal_at: usize,
}

impl Sampler {
    /// Creates a sampler seeded with `seed`.
    ///
    /// A `goal_sample_rate` of 0 disables goal bias by moving the first goal sample
    /// to a tree of `node_budget + 1` nodes, a size never seen while budget remains.
    pub fn new(region: Region, goal_sample_rate: usize, node_budget: usize, seed: u64) -> Self {
        let goal_sample_rate = effective_goal_sample_rate(goal_sample_rate, node_budget);
        Sampler {
            rng: StdRng::seed_from_u64(seed),
            region,
            goal_sample_rate,
            next_goal_at: goal_sample_rate,
        }
    }

    pub fn goal_sample_rate(&self) -> usize {
        self.goal_sample_rate
    }

    /// Produces the next sample given the current number of nodes in the tree.
    pub fn sample(&mut self, goal: &Point, tree_size: usize) -> Point {
        if tree_size < self.next_goal_at {
            self.random_point()
        } else {
            self.next_goal_at += self.goal_sample_rate;
            *goal
        }
    }

    /// Uniform lattice point in the region.
    pub fn random_point(&mut self) -> Point {
        let range = self.region.range.max(1);
        let x = f64::from(self.region.offset) + f64::from(self.rng.gen_range(0..range));
        let y = f64::from(self.region.offset) + f64::from(self.rng.gen_range(0..range));
        Point::new(x, y)
    }
}

/// Maps the user-facing rate to the one the sampler runs with, 0 meaning no goal bias.
pub fn effective_goal_sample_rate(goal_sample_rate: usize, node_budget: usize) -> usize {
    if goal_sample_rate == 0 {
        node_budget.saturating_add(1)
    } else {
        goal_sample_rate
    }
}

//
// Unit tests
//
