use clap::Subcommand;
use nakmuay_core::{BellKind, Config};
use tracing_subscriber::EnvFilter;

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the whole config, or one value by dotted key
    Show {
        /// Dotted key such as "audio.bell" or "logging.filter"
        key: Option<String>,
    },
    /// Change one value and write the file
    Set {
        /// Dotted key such as "audio.bell" or "storage.database"
        key: String,
        /// New value; audio.bell takes "log" or "silent"
        value: String,
    },
    /// Print where the config file lives
    Path,
    /// Overwrite the config file with defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CmdResult {
    match action {
        ConfigAction::Show { key: None } => print_json(&Config::load()?),
        ConfigAction::Show { key: Some(key) } => {
            let value = Config::load()?
                .get(&key)
                .ok_or_else(|| format!("no config value at '{key}'"))?;
            println!("{value}");
            Ok(())
        }
        ConfigAction::Set { key, value } => set(&key, &value),
        ConfigAction::Path => {
            println!("{}", Config::file_path()?.display());
            Ok(())
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            tracing::info!("config reset");
            println!("{}", Config::file_path()?.display());
            Ok(())
        }
    }
}

/// Check values whose type alone does not catch mistakes, then save.
fn set(key: &str, value: &str) -> CmdResult {
    match key {
        "audio.bell" => {
            value.parse::<BellKind>()?;
        }
        "logging.filter" => {
            EnvFilter::try_new(value).map_err(|e| format!("bad log filter '{value}': {e}"))?;
        }
        _ => {}
    }

    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;
    println!("{key} = {}", config.get(key).unwrap_or_default());
    Ok(())
}
