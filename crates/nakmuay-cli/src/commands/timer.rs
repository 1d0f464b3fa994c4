use clap::Subcommand;
use nakmuay_core::{Config, TimerConfigPatch};
use tokio::sync::broadcast::error::RecvError;

use super::{open_trainer, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a session to completion, printing one JSON event per line
    Run {
        /// Rounds for this run only
        #[arg(long)]
        rounds: Option<u32>,
        /// Round length in seconds for this run only
        #[arg(long)]
        round_secs: Option<u32>,
        /// Rest length in seconds for this run only
        #[arg(long)]
        rest_secs: Option<u32>,
        /// Keep the bell quiet for this run
        #[arg(long)]
        no_bell: bool,
    },
    /// Saved timer settings
    Config {
        #[command(subcommand)]
        action: TimerConfigAction,
    },
}

#[derive(Subcommand)]
pub enum TimerConfigAction {
    /// Print the saved settings as JSON
    Show,
    /// Update saved settings
    Set {
        #[arg(long)]
        rounds: Option<u32>,
        #[arg(long)]
        round_secs: Option<u32>,
        #[arg(long)]
        rest_secs: Option<u32>,
        #[arg(long)]
        bell: Option<bool>,
    },
}

pub async fn run(action: TimerAction, config: &Config) -> CmdResult {
    let trainer = open_trainer(config)?;

    match action {
        TimerAction::Run {
            rounds,
            round_secs,
            rest_secs,
            no_bell,
        } => {
            let patch = TimerConfigPatch {
                rounds,
                round_duration: round_secs,
                rest_duration: rest_secs,
                bell_enabled: no_bell.then_some(false),
            };
            let session_config = trainer.timer_config().await.merged(&patch)?;

            let mut events = trainer.subscribe();
            if trainer.start_session_with(session_config).await.is_none() {
                return Err("session could not be started".into());
            }
            loop {
                match events.recv().await {
                    Ok(event) => {
                        println!("{}", serde_json::to_string(&event)?);
                        if event.completed_record().is_some() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "timer events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            if let Some(e) = trainer.take_last_error().await {
                return Err(format!("session finished but was not saved: {e}").into());
            }
            eprintln!("{}", trainer.motivational_message().await);
        }
        TimerAction::Config { action } => match action {
            TimerConfigAction::Show => {
                print_json(&trainer.timer_config().await)?;
            }
            TimerConfigAction::Set {
                rounds,
                round_secs,
                rest_secs,
                bell,
            } => {
                let updated = trainer
                    .update_timer_config(TimerConfigPatch {
                        rounds,
                        round_duration: round_secs,
                        rest_duration: rest_secs,
                        bell_enabled: bell,
                    })
                    .await?;
                print_json(&updated)?;
            }
        },
    }
    Ok(())
}
