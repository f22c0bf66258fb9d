use astrator_server::db;
use astrator_server::server::config::{DEV_SECRET_KEY, ServerConfig};
use astrator_server::server::shutdown::shutdown_signal;
use astrator_server::version::VERSION;
use astrator_server::web::{self, templates};

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

fn init_logging(config: &ServerConfig) {
    // Log to a file: JSON format, daily rotation. Debug runs log to stdout only.
    let file_layer = (!config.debug).then(|| {
        let file_appender = rolling::daily(&config.log_dir, &config.log_file);
        fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .json()
    });

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_file(true)
        .with_line_number(true);

    // RUST_LOG wins over the configured level.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},sea_orm=warn,sqlx::query=warn",
            config.log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Manually check for --version before full parsing to keep the original simple output.
    if std::env::args().any(|arg| arg == "--version") {
        println!("Server version: {VERSION}");
        return Ok(());
    }

    let args = Args::parse();

    // Logging depends on configuration, so config errors go to stderr.
    let server_config = match ServerConfig::load(args.config.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to load server configuration: {e}");
            return Err(e.into());
        }
    };

    init_logging(&server_config);
    info!(version = VERSION, "Design service startup");

    if server_config.secret_key == DEV_SECRET_KEY {
        warn!("SECRET_KEY is not set; the development default is in use.");
    }
    info!(
        cache_type = %server_config.cache_type,
        upload_folder = %server_config.upload_folder,
        max_content_length = server_config.max_content_length,
        debug = server_config.debug,
        "Configuration loaded."
    );

    if let Err(e) = templates::registry() {
        error!(error = %e, "Failed to load page templates.");
        return Err(e.to_string().into());
    }

    let store = match db::connect_store(&server_config).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "Failed to open the design store.");
            return Err(e.into());
        }
    };

    let app = web::create_axum_router(store, server_config.clone());

    let listener = tokio::net::TcpListener::bind(server_config.listen_addr).await?;
    info!(addr = %server_config.listen_addr, "HTTP server listening.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}
