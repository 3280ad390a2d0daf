mod cli;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use quiverstats::error::QuiverError;
use quiverstats::practice;
use quiverstats::report::{self, OutputFormat};
use quiverstats::scoring;
use quiverstats::session::{ConfirmStatus, SessionScoreBuffer};
use quiverstats::store::{JsonFileStore, MemoryStore, ScoreStore};
use quiverstats::types::config::QuiverConfig;
use quiverstats::types::geometry::RawPointerEvent;
use quiverstats::{config, logging};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const ALL_FAILED: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn output_format(format: &cli::ReportFormat) -> OutputFormat {
    match format {
        cli::ReportFormat::Json => OutputFormat::Json,
        cli::ReportFormat::Md => OutputFormat::Md,
    }
}

fn run() -> Result<i32, QuiverError> {
    let cli = cli::Cli::parse();
    if !cli.root.exists() {
        return Err(QuiverError::PathNotFound(cli.root.display().to_string()));
    }

    let loaded = config::load_config(&cli.root)?;
    let cfg = loaded.unwrap_or_else(QuiverConfig::default);
    logging::init_logging(cli.verbose, cli.quiet, cfg.log_level());
    let geometry = cfg.geometry()?;
    let store_path = cli.root.join(cfg.store_path());

    match cli.command {
        cli::Commands::Score(cmd) => {
            let canonical = geometry.canonical_surface();
            let mut surface = canonical;
            surface.left = cmd.left.unwrap_or(canonical.left);
            surface.top = cmd.top.unwrap_or(canonical.top);
            surface.width = cmd.width.unwrap_or(canonical.width);
            surface.height = cmd.height.unwrap_or(canonical.height);

            let event = RawPointerEvent {
                client_x: cmd.client_x,
                client_y: cmd.client_y,
                surface,
            };
            let shot = scoring::score_from_event(&event, &geometry)?;
            let rendered = report::render_shot(&shot, &geometry, output_format(&cmd.format))?;
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Rings(cmd) => {
            let layout = scoring::ring_layout(&geometry);
            let rendered = report::render_rings(&layout, &geometry, output_format(&cmd.format))?;
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Quiver(action) => {
            let mut store = JsonFileStore::open(&store_path)?;
            match action {
                cli::QuiverCommand::Add { name } => {
                    let quiver = store.add_container(&name)?;
                    println!("quiver {} added: {}", quiver.id, quiver.name);
                }
                cli::QuiverCommand::Rename { quiver_id, name } => {
                    let quiver = store.rename_container(&quiver_id, &name)?;
                    println!("quiver {} renamed: {}", quiver.id, quiver.name);
                }
                cli::QuiverCommand::Rm { quiver_id } => {
                    let quiver = store.remove_container(&quiver_id)?;
                    println!("quiver {} removed: {}", quiver.id, quiver.name);
                }
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Arrow(action) => {
            let mut store = JsonFileStore::open(&store_path)?;
            match action {
                cli::ArrowCommand::Add { quiver_id, name } => {
                    let arrow = store.add_item(&quiver_id, &name)?;
                    println!(
                        "arrow {} added to quiver {}: {}",
                        arrow.id, arrow.container_id, arrow.name
                    );
                }
                cli::ArrowCommand::Rename { arrow_id, name } => {
                    let arrow = store.rename_item(&arrow_id, &name)?;
                    println!("arrow {} renamed: {}", arrow.id, arrow.name);
                }
                cli::ArrowCommand::Rm { arrow_id } => {
                    let arrow = store.remove_item(&arrow_id)?;
                    println!(
                        "arrow {} removed from quiver {}: {}",
                        arrow.id, arrow.container_id, arrow.name
                    );
                }
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::List(cmd) => {
            let store = JsonFileStore::open(&store_path)?;
            let inventory = store.document().inventory();
            let rendered = report::render_inventory(&inventory, output_format(&cmd.format))?;
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Scores(cmd) => match (cmd.action, cmd.arrow_id) {
            (Some(cli::ScoresAction::Rm { score_id }), _) => {
                let mut store = JsonFileStore::open(&store_path)?;
                let score = store.remove_score(score_id)?;
                println!("score {} removed from arrow {}", score.id, score.item_id);
                Ok(exit_code::SUCCESS)
            }
            (None, Some(arrow_id)) => {
                let store = JsonFileStore::open(&store_path)?;
                let scores = store.scores_for(&arrow_id)?;
                let rendered =
                    report::render_scores(&arrow_id, &scores, output_format(&cmd.format))?;
                println!("{rendered}");
                Ok(exit_code::SUCCESS)
            }
            (None, None) => cli::Cli::command()
                .error(ErrorKind::MissingRequiredArgument, "an arrow id is required")
                .exit(),
        },
        cli::Commands::Practice(cmd) => {
            let script = practice::load_script(&cmd.script)?;
            let buffer = SessionScoreBuffer::new(cfg.failed_submissions());
            let mut store = JsonFileStore::open(&store_path)?;

            let practice_report = if cmd.dry_run {
                let mut scratch = MemoryStore::from_document(store.document().clone());
                practice::run_script(&script, &geometry, &buffer, &mut scratch)
            } else {
                practice::run_script(&script, &geometry, &buffer, &mut store)
            };

            let rendered = report::render_practice(&practice_report, output_format(&cmd.format))?;
            println!("{rendered}");

            if practice_report.left_pending > 0 {
                eprintln!(
                    "warning: {} shot(s) were never confirmed",
                    practice_report.left_pending
                );
            }

            if practice_report.any_confirm_with(ConfirmStatus::AllFailed) {
                Ok(exit_code::ALL_FAILED)
            } else if practice_report.skipped() > 0
                || practice_report.any_confirm_with(ConfirmStatus::Mixed)
            {
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
