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

use plotly::common::{Fill, Line, Marker, Mode};
use plotly::{Layout, Plot, Scatter};
use rrtplanning::config::{seed_from_clock, RrtParams};
use rrtplanning::geometry::{Point, World};
use rrtplanning::input::validate_endpoint;
use rrtplanning::planning::rrt::{rrt, Plan};
use std::env;

/// Visualize the tree, and the path if one was found
fn visualize_rrt(world: &World, plan: &Plan, start: &Point, goal: &Point) {
    let mut plot = Plot::new();

    // Plot the obstacle, closing the ring
    let vertices = world.obstacle.vertices();
    let (mut x, mut y): (Vec<_>, Vec<_>) = vertices.iter().map(|p| (p.x, p.y)).unzip();
    x.push(vertices[0].x);
    y.push(vertices[0].y);
    let trace = Scatter::new(x, y)
        .fill(Fill::ToSelf)
        .fill_color("black")
        .line(Line::new().color("black"))
        .opacity(1.0);
    plot.add_trace(trace);

    // Plot tree
    for node in plan.tree.nodes() {
        if let Some(parent) = node.parent().and_then(|i| plan.tree.value(i)) {
            let p = node.value();
            let trace = Scatter::new(vec![p.x, parent.x], vec![p.y, parent.y])
                .mode(Mode::Lines)
                .line(Line::new().color("red"));
            plot.add_trace(trace);
        }
    }

    // Plot path
    let (path_x, path_y): (Vec<_>, Vec<_>) =
        plan.path_points().iter().map(|p| (p.x, p.y)).unzip();
    let path_trace = Scatter::new(path_x, path_y)
        .mode(Mode::LinesMarkers)
        .line(Line::new().color("blue").width(4.0));
    plot.add_trace(path_trace);

    // Plot start and end
    let start_trace = Scatter::new(vec![start.x], vec![start.y])
        .mode(Mode::Markers)
        .marker(Marker::new().color("green").size(16));
    let end_trace = Scatter::new(vec![goal.x], vec![goal.y])
        .mode(Mode::Markers)
        .marker(Marker::new().color("yellow").size(16));
    plot.add_trace(start_trace);
    plot.add_trace(end_trace);

    let title = if plan.success() {
        "RRT Path Finding Result"
    } else {
        "RRT Path Not Found"
    };
    let layout = Layout::new()
        .title(title.into())
        .show_legend(false)
        .width(750)
        .height(750)
        .x_axis(plotly::layout::Axis::new().title("X".into()))
        .y_axis(plotly::layout::Axis::new().title("Y".into()));

    plot.set_layout(layout);
    plot.show();
}

pub fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 8 {
        eprintln!("Usage: program start_x start_y goal_x goal_y budget step goal_rate");
        return;
    }

    let start_x: f64 = args[1].parse().expect("Invalid start_x");
    let start_y: f64 = args[2].parse().expect("Invalid start_y");
    let goal_x: f64 = args[3].parse().expect("Invalid goal_x");
    let goal_y: f64 = args[4].parse().expect("Invalid goal_y");
    let budget: usize = args[5].parse().expect("Invalid budget");
    let step: f64 = args[6].parse().expect("Invalid step");
    let goal_rate: usize = args[7].parse().expect("Invalid goal_rate");

    let world = World::default();
    let start = Point::new(start_x, start_y);
    let goal = Point::new(goal_x, goal_y);
    for p in [&start, &goal] {
        if let Err(e) = validate_endpoint(&world, p) {
            eprintln!("{e}");
            return;
        }
    }

    let seed = seed_from_clock();
    println!("Start pose: {start}");
    println!("Goal pose: {goal}");
    println!("Seed: {seed}");

    let params = RrtParams::new(budget, step, goal_rate).with_seed(seed);
    match rrt(&start, &goal, &world, &params) {
        Ok(plan) => {
            if plan.success() {
                println!("Path found!");
            } else {
                println!("Sorry, path not found ({:?})", plan.outcome);
            }
            visualize_rrt(&world, &plan, &start, &goal);
        }
        Err(e) => {
            println!("RRT failed: {}", e);
        }
    }
}
