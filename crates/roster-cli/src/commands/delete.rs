use std::path::Path;

use roster_core::{RowRef, StoreConfig};

use crate::commands::common::open_view;
use crate::error::CliError;

pub async fn run_delete(row: usize, config: &StoreConfig, data_dir: &Path) -> Result<(), CliError> {
    let row_ref = RowRef::from_display(row).ok_or(CliError::InvalidRow(row))?;

    let (mut view, _) = open_view(config, data_dir).await?;
    let mutation = view.remove_record(row_ref).await?;
    tracing::debug!("Deletion {}", mutation.persistence);

    println!("{}", mutation.announcement);
    Ok(())
}
