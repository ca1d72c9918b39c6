use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "vigor", version, about = "Vigor engagement and wellness engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Size a reward for a completed task
    Reward(commands::reward::RewardArgs),
    /// Flow state assessment
    Flow {
        #[command(subcommand)]
        action: commands::flow::FlowAction,
    },
    /// Streak tracking, risk and recovery
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Habit planning and MAT scoring
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Usage logging and wellness checks
    Wellness {
        #[command(subcommand)]
        action: commands::wellness::WellnessAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("VIGOR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
    tracing_subscriber::registry().with(filter).with(layer).init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Reward(args) => commands::reward::run(args),
        Commands::Flow { action } => commands::flow::run(action),
        Commands::Streak { action } => commands::streak::run(action),
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Wellness { action } => commands::wellness::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
