use std::path::Path;

use chrono::Local;
use roster_core::{RegistrationForm, StoreConfig};

use crate::commands::common::open_view;
use crate::error::CliError;

pub async fn run_add(
    form: RegistrationForm,
    config: &StoreConfig,
    data_dir: &Path,
) -> Result<(), CliError> {
    let record = form.into_record(&Local::now())?;

    let (mut view, _) = open_view(config, data_dir).await?;
    let mutation = view.add_record(record).await?;
    tracing::debug!("Registration {}", mutation.persistence);

    println!("{}", mutation.announcement);
    Ok(())
}
