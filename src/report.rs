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

//! Serializable snapshot of a planning run, for plotting or inspection elsewhere.
use crate::error::Result;
use crate::geometry::{Point, World};
use crate::planning::rrt::{Outcome, Plan};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub parent: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub success: bool,
    pub outcome: Outcome,
    pub seed: u64,
    pub attempts: u64,
    pub obstacle: Vec<Point>,
    pub nodes: Vec<NodeRecord>,

    /// Node indices from goal to start, empty on failure.
    pub path: Vec<usize>,
}

impl PlanReport {
    pub fn new(plan: &Plan, world: &World, seed: u64) -> Self {
        let nodes = plan
            .tree
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| NodeRecord {
                index,
                x: node.value().x,
                y: node.value().y,
                parent: node.parent(),
            })
            .collect();

        PlanReport {
            success: plan.success(),
            outcome: plan.outcome,
            seed,
            attempts: plan.attempts,
            obstacle: world.obstacle.vertices().to_vec(),
            nodes,
            path: plan.path.clone().unwrap_or_default(),
        }
    }

    /// Writes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// If serialization or the write fails.
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RrtParams;
    use crate::planning::rrt::rrt;

    #[test]
    fn test_report_mirrors_plan() {
        let world = World::default();
        let params = RrtParams::new(1, 1.0, 0).with_seed(2);
        let plan = rrt(&Point::new(0.0, 0.0), &Point::new(0.0, 3.0), &world, &params).unwrap();
        let report = PlanReport::new(&plan, &world, params.seed);

        assert!(report.success);
        assert_eq!(report.nodes.len(), 3);
        assert_eq!(report.nodes[0].parent, None);
        assert_eq!(report.nodes[1].parent, Some(0));
        assert_eq!(report.nodes[2].parent, Some(1));
        assert_eq!(report.path, vec![2, 1, 0]);
        assert_eq!(report.obstacle.len(), 6);
    }

    #[test]
    fn test_report_json() {
        let world = World::default();
        let params = RrtParams::new(0, 1.0, 0).with_seed(8);
        let plan = rrt(&Point::new(0.0, 0.0), &Point::new(12.0, 12.0), &world, &params).unwrap();

        let mut buf = Vec::new();
        PlanReport::new(&plan, &world, 8).write_json(&mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["outcome"], "budget_exhausted");
        assert_eq!(value["seed"], 8);
        assert_eq!(value["nodes"].as_array().unwrap().len(), 1);
        assert!(value["path"].as_array().unwrap().is_empty());
    }
}
