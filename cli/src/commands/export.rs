use crate::commands::cli::ExportArgs;
use crate::project;
use folio_core::api::{AppConfig, CliError};

pub async fn run(args: ExportArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let mut opened = project::open(&args.project, cfg).await?;
    let metadata = opened.manager.export_metadata();

    match args.out {
        Some(out) => {
            metadata.save_to_file(&out)?;
            tracing::info!(path = %out.display(), "metadata written");
        }
        None => println!("{}", metadata.to_json_pretty()?),
    }
    Ok(0)
}
