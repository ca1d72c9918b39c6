use std::path::PathBuf;

use clap::Subcommand;
use serde::Deserialize;
use vigor_core::habit::{BehaviorContext, HabitConstraints};
use vigor_core::{TaskContext, UserContext};

use super::{engine, print_json, read_json, CliResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Break a target behavior into a tiny-habit chain
    Plan {
        /// Behavior to build, e.g. "write every day"
        target: String,
        /// Minutes per day available
        #[arg(long, default_value_t = 10)]
        minutes: u32,
        /// Existing routine to anchor on (repeatable)
        #[arg(long = "anchor")]
        anchors: Vec<String>,
        /// Expected share of days followed through (0-1)
        #[arg(long, default_value_t = 0.7)]
        consistency: f64,
        /// Personal celebration phrase
        #[arg(long)]
        celebration: Option<String>,
    },
    /// Score motivation, ability and trigger for a task
    Mat {
        /// JSON file with `user`, `task` and optional `context` (`-` for stdin)
        #[arg(long)]
        context: PathBuf,
    },
}

#[derive(Deserialize)]
struct MatInput {
    #[serde(default)]
    user: UserContext,
    task: TaskContext,
    #[serde(default)]
    context: BehaviorContext,
}

pub fn run(action: HabitAction) -> CliResult {
    let engine = engine(None)?;
    match action {
        HabitAction::Plan {
            target,
            minutes,
            anchors,
            consistency,
            celebration,
        } => {
            let constraints = HabitConstraints {
                available_minutes: minutes,
                existing_habits: anchors,
                consistency,
                preferred_celebration: celebration,
            };
            let plan = engine.create_tiny_habits(&target, &constraints)?;
            print_json(&plan)
        }
        HabitAction::Mat { context } => {
            let input: MatInput = read_json(&context)?;
            let assessment = engine.assess_mat(&input.user, &input.task, &input.context)?;
            print_json(&assessment)
        }
    }
}
