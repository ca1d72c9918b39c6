use clap::Subcommand;
use serde::Serialize;
use vigor_core::flow::DifficultyAdjustment;
use vigor_core::{FlowContext, FlowMetrics, PerformanceData};

use super::{engine, print_json, CliResult};

#[derive(Subcommand)]
pub enum FlowAction {
    /// Classify a challenge/skill balance
    Assess {
        /// Skill level (0-10, above zero)
        #[arg(long)]
        skill: f64,
        /// Task difficulty (0-10)
        #[arg(long)]
        difficulty: f64,
        /// Share of recent tasks completed (0-1)
        #[arg(long)]
        success_rate: Option<f64>,
        /// Current energy (0-1)
        #[arg(long)]
        energy: Option<f64>,
        /// Minutes in the current session
        #[arg(long)]
        session_minutes: Option<f64>,
        /// Recent completion rate (0-1); adds a difficulty suggestion
        #[arg(long, requires = "frustration")]
        completion_rate: Option<f64>,
        /// Recent frustration (0-1)
        #[arg(long, requires = "completion_rate")]
        frustration: Option<f64>,
    },
}

#[derive(Serialize)]
struct FlowReport {
    metrics: FlowMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    adjustment: Option<DifficultyAdjustment>,
}

pub fn run(action: FlowAction) -> CliResult {
    match action {
        FlowAction::Assess {
            skill,
            difficulty,
            success_rate,
            energy,
            session_minutes,
            completion_rate,
            frustration,
        } => {
            let engine = engine(None)?;
            let defaults = FlowContext::default();
            let context = FlowContext {
                recent_success_rate: success_rate.unwrap_or(defaults.recent_success_rate),
                energy: energy.unwrap_or(defaults.energy),
                session_minutes: session_minutes.unwrap_or(defaults.session_minutes),
            };
            let metrics = engine.assess_flow_state(skill, difficulty, Some(&context))?;

            let adjustment = match (completion_rate, frustration) {
                (Some(completion_rate), Some(frustration)) => Some(
                    engine.suggest_difficulty_adjustment(
                        &metrics,
                        &PerformanceData {
                            completion_rate,
                            frustration,
                        },
                    )?,
                ),
                _ => None,
            };

            print_json(&FlowReport {
                metrics,
                adjustment,
            })
        }
    }
}
