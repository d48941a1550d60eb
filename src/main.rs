use clap::{Parser, Subcommand};
use clinica::config::{Config, DEFAULT_CONFIG_FILE};
use clinica::lookup::{DrugLookup, build_client};
use clinica::server::{ClinicaState, clinica_router};
use mimalloc::MiMalloc;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Parser)]
#[command(name = "clinica", version, about = "Patient records and drug lookup for doctors")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Import a patient roster file for one doctor.
    Import {
        file: PathBuf,
        #[arg(long, default_value_t = 1)]
        doctor_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        config = %cli.config.display(),
        database_url = %cfg.basic.database_url,
        loglevel = %cfg.basic.loglevel,
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
        pubchem_url = %cfg.lookup.pubchem_url,
        wikipedia_url = %cfg.lookup.wikipedia_url,
        proxy = %cfg.lookup.proxy.as_ref().map_or("<none>", |u| u.as_str()),
    );

    let db = clinica::db::spawn(&cfg.basic.database_url).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Import { file, doctor_id } => {
            let imported = clinica::import::import_roster_file(&db, doctor_id, &file).await?;
            info!(imported, doctor_id, file = %file.display(), "import finished");
            Ok(())
        }
        Command::Serve => {
            if cfg.basic.insecure_cookie {
                warn!("session cookies are sent without the Secure attribute");
            }
            let client = build_client(&cfg.lookup)?;
            let lookup = DrugLookup::new(db.clone(), &cfg.lookup, client);
            let state = ClinicaState::new(db, lookup, &cfg.basic);
            let pruner = state.spawn_login_limiter_pruner();
            let app = clinica_router(state);

            let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
            let listener = TcpListener::bind(addr).await?;
            info!("HTTP server listening on {}", addr);
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            pruner.abort();
            info!("Server has shut down gracefully.");
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
