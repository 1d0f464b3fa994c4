use std::path::PathBuf;

use clap::Subcommand;
use nakmuay_core::timer::format_minutes;
use nakmuay_core::Config;
use serde_json::json;

use super::{open_trainer, print_json, CmdResult};

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Print the training log as JSON
    Show,
    /// Erase the training log
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Export progress, timer settings and preferences
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Import a previously exported bundle
    Import {
        /// Bundle file
        path: PathBuf,
    },
}

pub async fn run(action: ProgressAction, config: &Config) -> CmdResult {
    let trainer = open_trainer(config)?;

    match action {
        ProgressAction::Show => {
            let progress = trainer.progress().await;
            print_json(&json!({
                "progress": progress,
                "totalTime": format_minutes(progress.total_duration()),
                "message": trainer.motivational_message().await,
            }))?;
        }
        ProgressAction::Reset { yes } => {
            if !yes {
                return Err("refusing to erase progress without --yes".into());
            }
            trainer.reset_progress().await?;
            println!("progress reset");
        }
        ProgressAction::Export { output } => {
            let data = trainer.export_data().await?;
            match output {
                Some(path) => {
                    std::fs::write(&path, data)?;
                    println!("exported to {}", path.display());
                }
                None => println!("{data}"),
            }
        }
        ProgressAction::Import { path } => {
            let data = std::fs::read_to_string(&path)?;
            trainer.import_data(&data).await?;
            println!("imported {}", path.display());
        }
    }
    Ok(())
}
