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

//! Error type shared by the tree, geometry, and planning modules.
//!
//! Failing to reach the goal is not an error. It is reported through
//! [`crate::planning::rrt::Outcome`] on a successful result.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlanningError>;

#[derive(Debug, Error)]
pub enum PlanningError {
    /// The tree is already holding as many nodes as it was sized for.
    #[error("tree capacity of {capacity} nodes exceeded")]
    CapacityExceeded { capacity: usize },

    #[error("parent index {parent} is not in a tree of {size} nodes")]
    UnknownParent { parent: usize, size: usize },

    /// Walking parent links hit a cycle or a dangling index.
    #[error("broken parent chain at node {index}")]
    BrokenChain { index: usize },

    #[error("an obstacle needs at least 3 vertices, got {vertices}")]
    InvalidObstacle { vertices: usize },

    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("point ({x}, {y}) is outside the search region")]
    OutOfRegion { x: f64, y: f64 },

    #[error("point ({x}, {y}) is inside the obstacle")]
    InsideObstacle { x: f64, y: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlanningError {
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// True for errors that mean the tree invariants were violated, as opposed
    /// to bad caller input.
    #[must_use]
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::CapacityExceeded { .. } | Self::UnknownParent { .. } | Self::BrokenChain { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::PlanningError;

    #[test]
    fn test_error_display() {
        let err = PlanningError::CapacityExceeded { capacity: 12 };
        assert_eq!(err.to_string(), "tree capacity of 12 nodes exceeded");

        let err = PlanningError::invalid("step size must be positive");
        assert_eq!(
            err.to_string(),
            "invalid parameter: step size must be positive"
        );
    }

    #[test]
    fn test_invariant_violations() {
        assert!(PlanningError::BrokenChain { index: 3 }.is_invariant_violation());
        assert!(PlanningError::UnknownParent { parent: 9, size: 2 }.is_invariant_violation());
        assert!(!PlanningError::OutOfRegion { x: -1.0, y: 0.0 }.is_invariant_violation());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PlanningError = io_err.into();
        assert!(matches!(err, PlanningError::Io(_)));
    }
}
