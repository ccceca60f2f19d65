use clap::Parser;
use log::*;
use std::path::Path;

use release_herald::{
    HeraldError, Result,
    chat::{Notifier, matrix::MatrixClient},
    cli::{self, Args, Command},
    command,
    config::Config,
    forge::{github::Github, manager::ForgeManager},
};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("release_herald")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

/// Matrix client for the configured room. Announcements are skipped when no
/// room is configured.
fn create_notifier(
    config: &Config,
    matrix_token: &str,
    dry_run: bool,
) -> Result<Option<Box<dyn Notifier>>> {
    let Some(room_id) = &config.chat.room_id else {
        return Ok(None);
    };

    let token = cli::token_or_env(matrix_token, "MATRIX_ACCESS_TOKEN")
        .ok_or_else(|| {
            HeraldError::invalid_args(
                "must set matrix token when chat.room_id is configured",
            )
        })?;

    let client =
        MatrixClient::new(&config.chat.homeserver, room_id, token, dry_run)?;

    Ok(Some(Box::new(client)))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = Args::parse();

    initialize_logger(cli_args.debug)?;

    let config = Config::load(Path::new(&cli_args.config)).await?;

    let primary =
        ForgeManager::new(Box::new(Github::new(cli_args.primary_remote()?)?));
    let dependency = ForgeManager::new(Box::new(Github::new(
        cli_args.dependency_remote()?,
    )?));

    match cli_args.command {
        Command::Release {
            range,
            matrix_token,
        } => {
            let notifier =
                create_notifier(&config, &matrix_token, cli_args.dry_run)?;
            let url = command::release::execute(
                &primary,
                &dependency,
                notifier.as_deref(),
                &range,
                &config,
            )
            .await?;
            info!("release published: {url}");
            Ok(())
        }
        Command::Show {
            range,
            out_file,
            json,
        } => {
            command::show::execute(
                &primary,
                &dependency,
                &range,
                &config,
                out_file,
                json,
            )
            .await
        }
    }
}
