use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use send_sen::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;

    info!(
        app = %settings.app.name,
        version = send_sen::pkg_version(),
        "Starting"
    );

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling in-flight send");
            on_signal.cancel();
        }
    });

    execute_command(&cli, &settings, &cancel).await?;

    Ok(())
}
