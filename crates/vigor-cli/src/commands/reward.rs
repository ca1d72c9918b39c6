use std::path::PathBuf;

use clap::Args;
use vigor_core::{RewardOptions, UserContext};

use super::{engine, print_json, read_json, CliResult};

#[derive(Args)]
pub struct RewardArgs {
    /// Base XP of the completed task
    #[arg(long)]
    base_xp: f64,
    /// JSON file with the user context (`-` for stdin)
    #[arg(long)]
    context: Option<PathBuf>,
    /// Bias the bonus draw toward re-engagement
    #[arg(long)]
    adaptive: bool,
    /// Fixed random seed for reproducible draws
    #[arg(long)]
    seed: Option<u64>,
}

pub fn run(args: RewardArgs) -> CliResult {
    let user: UserContext = match &args.context {
        Some(path) => read_json(path)?,
        None => UserContext::default(),
    };
    let mut engine = engine(args.seed)?;
    let options = RewardOptions {
        adaptive_adjustment: args.adaptive,
        suppress_bonus: false,
    };
    let result = engine.calculate_variable_reward(args.base_xp, &user, &options)?;
    print_json(&result)
}
