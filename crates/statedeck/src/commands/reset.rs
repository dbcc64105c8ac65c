use std::path::{Path, PathBuf};

use colored::Colorize;
use inquire::Confirm;

use crate::engine::store::{CURRENT_SLIDE_KEY, FileStore, KeyValueStore, SLIDE_STATES_KEY};

pub fn run(file: &Path, yes: bool, state_file: Option<PathBuf>, quiet: bool) -> anyhow::Result<()> {
    let path = FileStore::resolve_path(file, state_file)?;
    if !path.exists() {
        if !quiet {
            println!("No saved position for {}", file.display());
        }
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new(&format!(
            "Forget the saved position for {}?",
            file.display()
        ))
        .with_default(false)
        .prompt()?;
        if !confirmed {
            println!("{}", "Cancelled.".yellow());
            return Ok(());
        }
    }

    clear(&mut FileStore::open(&path))?;
    if !quiet {
        println!("{} {}", "Cleared".green(), path.display());
    }
    Ok(())
}

fn clear(store: &mut impl KeyValueStore) -> anyhow::Result<()> {
    store.remove(CURRENT_SLIDE_KEY)?;
    store.remove(SLIDE_STATES_KEY)?;
    Ok(())
}
