use clap::Subcommand;
use nakmuay_core::{Catalog, Category, Config, CoreError, Difficulty, TechniqueFilter};
use serde_json::json;

use super::{open_trainer, print_json, CmdResult};

#[derive(Subcommand)]
pub enum ComboAction {
    /// List techniques, optionally filtered
    List {
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        difficulty: Option<Difficulty>,
        /// Text to match in names and instructions
        #[arg(long)]
        query: Option<String>,
    },
    /// Show one technique
    Show { id: String },
    /// Search names, instructions, categories and tips
    Search { query: String },
    /// Log practice of a technique
    Complete { id: String },
    /// Suggested follow-ups for a technique
    Next { id: String },
    /// Picks for your experience level
    Recommended,
    /// Categories and difficulty levels in the library
    Categories,
}

pub async fn run(action: ComboAction, config: &Config) -> CmdResult {
    let catalog = Catalog::bundled()?;

    match action {
        ComboAction::List {
            category,
            difficulty,
            query,
        } => {
            let criteria = TechniqueFilter {
                category,
                difficulty,
                query,
            };
            print_json(&catalog.filter(&criteria))?;
        }
        ComboAction::Show { id } => {
            let technique = catalog
                .get(&id)
                .ok_or_else(|| CoreError::not_found("technique", &id))?;
            print_json(technique)?;
        }
        ComboAction::Search { query } => print_json(&catalog.search(&query))?,
        ComboAction::Complete { id } => {
            let trainer = open_trainer(config)?;
            let record = trainer.complete_technique(&id).await?;
            print_json(&record)?;
        }
        ComboAction::Next { id } => {
            if catalog.get(&id).is_none() {
                return Err(CoreError::not_found("technique", &id).into());
            }
            print_json(&catalog.next_combos(&id))?;
        }
        ComboAction::Recommended => {
            let trainer = open_trainer(config)?;
            let preferences = trainer.preferences().await;
            let progress = trainer.progress().await;
            print_json(&trainer.catalog().recommended(&preferences, &progress))?;
        }
        ComboAction::Categories => {
            print_json(&json!({
                "categories": catalog.categories(),
                "difficulties": catalog.difficulty_levels(),
            }))?;
        }
    }
    Ok(())
}
