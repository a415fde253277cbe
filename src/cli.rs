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

//! Command-line front end: collects and validates a request, runs the planner, and
//! hands the tree and path off as JSON.
use crate::config::{seed_from_clock, RrtParams, WorldConfig};
use crate::error::{PlanningError, Result};
use crate::geometry::Point;
use crate::input::{validate_budget, validate_endpoint};
use crate::planning::rrt::rrt;
use crate::report::PlanReport;
use clap::{ArgAction, Parser};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "rrt",
    about = "Find a path around a polygonal obstacle with a rapidly-exploring random tree",
    version,
    allow_negative_numbers = true
)]
pub struct Cli {
    /// Start x coordinate
    pub start_x: f64,

    /// Start y coordinate
    pub start_y: f64,

    /// Goal x coordinate
    pub goal_x: f64,

    /// Goal y coordinate
    pub goal_y: f64,

    /// Maximum number of nodes added to the tree (0-499)
    #[arg(short = 'n', long, default_value_t = 200)]
    pub budget: usize,

    /// Step size, preferably between 0.1 and 2
    #[arg(short, long, default_value_t = 1.0)]
    pub step: f64,

    /// Sample the goal every this many nodes; 0 grows an unbiased tree
    #[arg(short, long, default_value_t = 0)]
    pub goal_rate: usize,

    /// Random seed, defaults to the system clock
    #[arg(long)]
    pub seed: Option<u64>,

    /// Ignore tree nodes this far or farther from a sample
    #[arg(long)]
    pub nearest_bound: Option<f64>,

    /// Give up after this many loop passes, collision retries included
    #[arg(long)]
    pub max_attempts: Option<u64>,

    /// Give up after this many seconds
    #[arg(long)]
    pub timeout: Option<f64>,

    /// TOML file describing the search region and obstacle
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Log more, repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Builds planner parameters from the arguments, drawing a seed if none was given.
    ///
    /// # Errors
    ///
    /// If the budget is out of range or the timeout is not a valid duration.
    pub fn params(&self) -> Result<RrtParams> {
        validate_budget(self.budget)?;

        let mut params = RrtParams::new(self.budget, self.step, self.goal_rate)
            .with_seed(self.seed.unwrap_or_else(seed_from_clock));
        if let Some(bound) = self.nearest_bound {
            params = params.with_nearest_bound(bound);
        }
        if let Some(attempts) = self.max_attempts {
            params = params.with_max_attempts(attempts);
        }
        if let Some(secs) = self.timeout {
            let limit = Duration::try_from_secs_f64(secs)
                .map_err(|e| PlanningError::invalid(format!("timeout {secs}: {e}")))?;
            params = params.with_max_duration(limit);
        }
        params.validate()?;
        Ok(params)
    }
}

/// Installs a stderr subscriber. `RUST_LOG` wins over the verbosity count.
pub fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parses the process arguments, sets up logging, and runs.
///
/// # Errors
///
/// See [`run`].
pub fn run_from_env() -> Result<bool> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(&cli)
}

/// Runs one request and returns whether a path was found.
///
/// # Errors
///
/// If the world or parameters are invalid, an endpoint is not free, or the
/// report can't be written.
pub fn run(cli: &Cli) -> Result<bool> {
    let world = match &cli.config {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    }
    .build()?;

    let start = Point::new(cli.start_x, cli.start_y);
    let goal = Point::new(cli.goal_x, cli.goal_y);
    validate_endpoint(&world, &start)?;
    validate_endpoint(&world, &goal)?;

    let params = cli.params()?;
    let plan = rrt(&start, &goal, &world, &params)?;
    info!(outcome = ?plan.outcome, nodes = plan.tree.size(), "done");

    let report = PlanReport::new(&plan, &world, params.seed);
    match &cli.output {
        Some(path) => report.write_json(BufWriter::new(File::create(path)?))?,
        None => report.write_json(std::io::stdout().lock())?,
    }

    if plan.success() {
        eprintln!("Path found with {} waypoints", plan.path_points().len());
    } else {
        eprintln!("Path not found ({:?})", plan.outcome);
    }
    Ok(plan.success())
}
