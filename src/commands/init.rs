use std::io::BufRead;
use std::path::Path;

use url::Url;

use crate::client::DEFAULT_BASE_URL;
use crate::commands::prompt::Prompter;
use crate::config::Config;
use crate::error::{AdminError, Result};
use crate::pagination::{check_rows_per_page, DEFAULT_ROWS_PER_PAGE};

pub fn run<R: BufRead>(prompter: &mut Prompter<R>) -> Result<()> {
    write_config(prompter, &Config::config_path()?)
}

fn write_config<R: BufRead>(prompter: &mut Prompter<R>, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        let question = format!(
            "Config file already exists at {}. Overwrite?",
            config_path.display()
        );
        if !prompter.confirm(&question)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("useradmin configuration");
    println!("=======================\n");

    let base_url = prompter.with_default("User service URL", DEFAULT_BASE_URL)?;
    Url::parse(&base_url).map_err(|e| AdminError::InvalidUrl(format!("{base_url}: {e}")))?;

    let rows = prompter.with_default(
        "Rows per page (5, 10 or 15)",
        &DEFAULT_ROWS_PER_PAGE.to_string(),
    )?;
    let rows_per_page = rows
        .parse::<u32>()
        .map_err(|_| AdminError::InvalidPageSize(0))?;
    check_rows_per_page(rows_per_page)?;

    let config = Config {
        base_url: (base_url != DEFAULT_BASE_URL).then_some(base_url),
        rows_per_page: Some(rows_per_page),
    };
    config.save_to(config_path)?;

    println!("\nConfig saved to {}", config_path.display());
    println!("Run 'useradmin login' to get started.");

    Ok(())
}
