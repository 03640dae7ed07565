use std::path::Path;

use roster_core::StoreConfig;

use crate::commands::common::{format_status_lines, status_report};
use crate::error::CliError;

pub fn run_status(as_json: bool, config: &StoreConfig, data_dir: &Path) -> Result<(), CliError> {
    let report = status_report(config, data_dir)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in format_status_lines(&report) {
            println!("{line}");
        }
    }
    Ok(())
}
