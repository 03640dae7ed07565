use std::path::Path;

use roster_core::StoreConfig;

use crate::commands::common::open_view;
use crate::error::CliError;

pub async fn run_list(
    as_json: bool,
    as_html: bool,
    config: &StoreConfig,
    data_dir: &Path,
) -> Result<(), CliError> {
    let (view, persistence) = open_view(config, data_dir).await?;
    tracing::debug!("Loaded submissions via {}", persistence.label());

    if as_json {
        println!("{}", serde_json::to_string_pretty(view.records())?);
    } else if as_html {
        print!("{}", view.render_html());
    } else {
        for line in view.render_lines() {
            println!("{line}");
        }
    }

    Ok(())
}
