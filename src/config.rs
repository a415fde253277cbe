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

//! Run configuration.
//!
//! The world (search region and obstacle) is static input read from TOML, for example:
//!
//! ```toml
//! [region]
//! offset = 0
//! range = 13
//!
//! [obstacle]
//! vertices = [[2.0, 7.0], [7.0, 7.0], [6.0, 4.0], [4.0, 4.0], [4.0, 6.0], [2.0, 6.0]]
//! ```
//!
//! Planner parameters are collected in [`RrtParams`].
use crate::error::{PlanningError, Result};
use crate::geometry::{Obstacle, Point, Region, World};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Largest node budget accepted from users.
pub const MAX_NODE_BUDGET: usize = 499;

/// Slack on top of the node budget for the start and goal nodes.
pub const TREE_SLACK: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub region: Region,
    pub obstacle: ObstacleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    /// Polygon ring, closed implicitly from the last vertex back to the first.
    pub vertices: Vec<[f64; 2]>,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        let vertices = Obstacle::default()
            .vertices()
            .iter()
            .map(|v| [v.x, v.y])
            .collect();
        ObstacleConfig { vertices }
    }
}

impl WorldConfig {
    /// # Errors
    ///
    /// If the text is not a valid world description.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// # Errors
    ///
    /// If the file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Validates the configuration and builds the [World] it describes.
    ///
    /// # Errors
    ///
    /// If the region is empty or the obstacle is not a valid polygon.
    pub fn build(&self) -> Result<World> {
        if self.region.range == 0 {
            return Err(PlanningError::invalid("region range must be at least 1"));
        }
        let vertices = self
            .obstacle
            .vertices
            .iter()
            .map(|&[x, y]| Point::new(x, y))
            .collect();
        Ok(World::new(self.region, Obstacle::new(vertices)?))
    }
}

/// Parameters for a single planning run.
#[derive(Debug, Clone, PartialEq)]
pub struct RrtParams {
    /// Number of successful extensions allowed before giving up.
    pub node_budget: usize,

    /// Distance every extension moves from its nearest node.
    pub step_size: f64,

    /// Sample the goal once every this many tree nodes. 0 disables goal bias.
    pub goal_sample_rate: usize,

    pub seed: u64,

    /// Ignore tree nodes at or beyond this distance from a sample. Unbounded if None.
    pub nearest_bound: Option<f64>,

    /// Stop after this many loop passes, collision retries included.
    pub max_attempts: Option<u64>,

    /// Stop once this much wall-clock time has passed.
    pub max_duration: Option<Duration>,
}

impl RrtParams {
    pub fn new(node_budget: usize, step_size: f64, goal_sample_rate: usize) -> Self {
        RrtParams {
            node_budget,
            step_size,
            goal_sample_rate,
            seed: 0,
            nearest_bound: None,
            max_attempts: None,
            max_duration: None,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_nearest_bound(mut self, bound: f64) -> Self {
        self.nearest_bound = Some(bound);
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u64) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    #[must_use]
    pub fn with_max_duration(mut self, duration: Duration) -> Self {
        self.max_duration = Some(duration);
        self
    }

    /// Number of nodes the tree must be able to hold: start, every extension, and the goal.
    pub fn tree_capacity(&self) -> usize {
        self.node_budget.saturating_add(TREE_SLACK)
    }

    /// # Errors
    ///
    /// If the step size or nearest-neighbor bound is not a positive finite number.
    pub fn validate(&self) -> Result<()> {
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(PlanningError::invalid(format!(
                "step size must be positive, got {}",
                self.step_size
            )));
        }
        if let Some(bound) = self.nearest_bound {
            if bound.is_nan() || bound <= 0.0 {
                return Err(PlanningError::invalid(format!(
                    "nearest-neighbor bound must be positive, got {bound}"
                )));
            }
        }
        Ok(())
    }
}

/// Seed derived from the system clock, for runs that don't ask for a specific one.
pub fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs() ^ u64::from(d.subsec_nanos()))
}

//
// Unit tests
//
