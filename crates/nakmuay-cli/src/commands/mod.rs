pub mod combo;
pub mod config;
pub mod progress;
pub mod stats;
pub mod timer;

use std::error::Error;
use std::sync::Arc;

use nakmuay_core::{Bell, BellKind, Config, Database, LogBell, SilentBell, Trainer};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn Error>>;

/// Open the database named by `config` and load the trainer from it.
pub fn open_trainer(config: &Config) -> Result<Trainer<Database>, Box<dyn Error>> {
    let db = Database::open_at(config.database_path()?)?;
    let bell: Arc<dyn Bell> = match config.audio.bell {
        BellKind::Log => Arc::new(LogBell),
        BellKind::Silent => Arc::new(SilentBell),
    };
    Ok(Trainer::load(db, bell)?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
