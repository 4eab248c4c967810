use clap::Parser;
use color_eyre::eyre::Result;
use tokio::net::TcpListener;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use userbase::{
    ConfiguredIdentityProvider, HashMapUserStore, StoreConnection, UserService, UserStore,
    adapters::config::{ServiceSettings, StoreBackend},
    configure_mongodb, configure_postgresql, shutdown_signal,
};

/// User registration REST backend
#[derive(Parser, Debug)]
#[command(name = "userbase", version, about)]
struct Cli {
    /// Apply PostgreSQL migrations (or create MongoDB indexes) and exit
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let cli = Cli::parse();
    let settings = ServiceSettings::load()?;

    tracing::info!(backend = ?settings.database.backend, "Starting userbase");

    match settings.database.backend {
        StoreBackend::Postgres => {
            let store = configure_postgresql(&settings.database.postgres).await?;
            run(store, &settings, cli.migrate).await
        }
        StoreBackend::Mongo => {
            let store = configure_mongodb(&settings.database.mongo).await?;
            run(store, &settings, cli.migrate).await
        }
        StoreBackend::Memory => run(HashMapUserStore::new(), &settings, cli.migrate).await,
    }
}

async fn run<U>(store: U, settings: &ServiceSettings, migrate_only: bool) -> Result<()>
where
    U: UserStore + StoreConnection + Clone + 'static,
{
    if migrate_only {
        tracing::info!("Schema is up to date");
        store.close().await;
        return Ok(());
    }

    let identity_provider = ConfiguredIdentityProvider::from_settings(&settings.identity)?;

    let service = UserService::new(
        store.clone(),
        identity_provider,
        settings.health.timeout(),
    )
    .with_request_timeout(settings.server.request_timeout());

    let listener = TcpListener::bind(&settings.server.address).await?;

    let served = service
        .run_standalone(
            listener,
            Some(settings.server.allowed_origins.clone()),
            shutdown_signal(),
        )
        .await;

    store.close().await;
    served?;

    Ok(())
}

pub fn init_tracing() -> Result<()> {
    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
