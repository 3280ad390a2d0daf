use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "quiverstats",
    version,
    about = "Archery target scoring and practice session CLI"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding quiverstats.toml and the score store
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score one pointer event on the target face
    Score(ScoreCommand),
    /// Print the ring layout of the configured target
    Rings(RingsCommand),
    #[command(subcommand)]
    Quiver(QuiverCommand),
    #[command(subcommand)]
    Arrow(ArrowCommand),
    /// List quivers and their arrows
    List(ListCommand),
    /// Show confirmed scores for one arrow, or `scores rm <score-id>`
    Scores(ScoresCommand),
    /// Replay a practice script against the score store
    Practice(PracticeCommand),
}

#[derive(Args)]
pub struct ScoreCommand {
    #[arg(allow_negative_numbers = true)]
    pub client_x: f64,
    #[arg(allow_negative_numbers = true)]
    pub client_y: f64,
    #[arg(long)]
    pub left: Option<f64>,
    #[arg(long)]
    pub top: Option<f64>,
    #[arg(long)]
    pub width: Option<f64>,
    #[arg(long)]
    pub height: Option<f64>,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct RingsCommand {
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Subcommand)]
pub enum QuiverCommand {
    /// Create a quiver
    Add { name: String },
    Rename { quiver_id: String, name: String },
    /// Delete a quiver with its arrows and their scores
    Rm { quiver_id: String },
}

#[derive(Subcommand)]
pub enum ArrowCommand {
    /// Add an arrow to a quiver
    Add { quiver_id: String, name: String },
    Rename { arrow_id: String, name: String },
    /// Delete an arrow with its scores
    Rm { arrow_id: String },
}

#[derive(Args)]
pub struct ListCommand {
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct ScoresCommand {
    #[arg(required = true)]
    pub arrow_id: Option<String>,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    #[command(subcommand)]
    pub action: Option<ScoresAction>,
}

#[derive(Subcommand)]
pub enum ScoresAction {
    /// Delete one confirmed score
    Rm { score_id: u64 },
}

#[derive(Args)]
pub struct PracticeCommand {
    pub script: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Confirm into an in-memory copy of the store instead of the store file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
