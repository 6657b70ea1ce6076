use artifact_core::Config;
use clap::Parser;
use std::io;

use artifact_server::logging::init_logging;
use artifact_server::run_server;

#[derive(Parser, Debug, Clone)]
#[command(name = "artifact-server")]
#[command(about = "Artifact Studio HTTP API")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Server port (defaults to the configured port)
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Snapshot directory
    #[arg(long, env = "ARTIFACT_STUDIO_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.debug);

    let mut config = Config::load();
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    log::info!("Starting Artifact Studio server on port {}", config.port);
    if cli.debug {
        log::debug!("Configuration: {:?}", config);
    }

    run_server(config).await
}
