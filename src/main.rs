//! attrition-serve HTTP server
//!
//! ```bash
//! attrition-serve --config service.json
//! attrition-serve --registry ./registry --model-alias Staging --port 9000 -v
//! ```

use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use attrition_serve::api::{self, ApiServerState};
use attrition_serve::config::StorageBackend;
use attrition_serve::{model, storage, Config, Result};

#[derive(Parser)]
#[command(
    name = "attrition-serve",
    about = "Serve HR attrition predictions from a registered model",
    version
)]
struct Cli {
    /// Path to a JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind.
    #[arg(short, long)]
    port: Option<u16>,

    /// Model registry root directory.
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Deployment alias to serve (e.g. "Production").
    #[arg(long)]
    model_alias: Option<String>,

    /// Prediction log database path.
    #[arg(long)]
    log_path: Option<PathBuf>,

    /// Keep the prediction log in memory only.
    #[arg(long)]
    memory_log: bool,

    /// Enable verbose logging (repeat for more: -v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Load the file configuration, then apply command-line overrides
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(registry) = self.registry {
            config.registry.path = registry;
        }
        if let Some(alias) = self.model_alias {
            config.registry.model_alias = alias;
        }
        if let Some(path) = self.log_path {
            config.storage.path = path;
        }
        if self.memory_log {
            config.storage.backend = StorageBackend::Memory;
        }
        config.validate()?;
        Ok(config)
    }
}

#[actix_rt::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    attrition_serve::init_logging(level)?;

    let config = cli.into_config()?;

    // The server must not come up without a model.
    let handle = match model::resolve_from_config(&config.registry) {
        Ok(handle) => Arc::new(handle),
        Err(e) => {
            log::error!("Model could not be loaded, refusing to start: {}", e);
            return Err(e);
        }
    };
    let store = storage::open_store(&config.storage)?;
    let timeout = Duration::from_secs(config.server.timeout_secs);
    let state = ApiServerState::new(handle, store).with_request_timeout(timeout);

    let host = config.server.host.clone();
    let port = config.server.port;
    let workers = config.server.workers;
    let payload_limit = config.server.max_payload_bytes;

    log::info!("Server will listen on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(api::json_config(payload_limit))
            .app_data(web::Data::new(state.clone()))
            .configure(api::configure_routes)
    })
    .workers(workers)
    .client_request_timeout(timeout)
    .bind((host.as_str(), port))?
    .run()
    .await?;

    log::info!("Server stopped.");

    Ok(())
}
