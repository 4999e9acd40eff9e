use mimalloc::MiMalloc;
use modelbook::schema::{SCHEMA_VERSION, Table, TableDef, render_schema, validate_catalog};
use modelbook::utils::logging::with_pretty_json_debug;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &modelbook::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
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
        database_url = %cfg.database.url,
        loglevel = %cfg.basic.loglevel,
        wal = cfg.database.wal,
        max_connections = cfg.database.max_connections,
        migrate_on_start = cfg.database.migrate_on_start,
    );

    validate_catalog()?;
    let catalog: Vec<&TableDef> = Table::ALL.iter().map(|t| t.def()).collect();
    with_pretty_json_debug(&catalog, |json| debug!("table catalog:\n{json}"));
    debug!("schema:\n{}", render_schema());

    let handle = modelbook::db::spawn_with(cfg.database.clone()).await?;

    let applied = handle.applied_versions().await?;
    let current = applied.last().copied().unwrap_or_default();
    if current == SCHEMA_VERSION {
        handle.verify_schema().await?;
        info!(version = current, tables = Table::ALL.len(), "schema up to date");
    } else {
        warn!(
            version = current,
            expected = SCHEMA_VERSION,
            "schema behind; enable database.migrate_on_start to apply pending migrations"
        );
    }

    handle.shutdown().await?;
    Ok(())
}
