//! Show command implementation.
use log::*;
use std::path::Path;
use tokio::fs;

use crate::{
    cli::RangeArgs,
    command::common::{self, PreparedRelease},
    config::Config,
    error::Result,
    forge::manager::ForgeManager,
};

/// Composes the release without publishing it and prints it, or writes it
/// to `out_file`.
pub async fn execute(
    primary: &ForgeManager,
    dependency: &ForgeManager,
    range: &RangeArgs,
    config: &Config,
    out_file: Option<String>,
    json: bool,
) -> Result<()> {
    let prepared =
        common::prepare_release(primary, dependency, range, config).await?;

    let content = format_release(&prepared, json)?;

    if let Some(out_file) = out_file {
        let file_path = Path::new(&out_file);

        if let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await?;
        }

        info!("writing release {} to: {}", prepared.tag, file_path.display());
        fs::write(file_path, &content).await?;
    } else {
        println!("{content}");
    }

    Ok(())
}

fn format_release(prepared: &PreparedRelease, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(prepared)?);
    }

    Ok(format!(
        "{}\n\n{}",
        prepared.rendered.title, prepared.rendered.body
    ))
}
