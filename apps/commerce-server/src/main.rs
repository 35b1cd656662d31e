use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use api_ingress::{ApiIngress, ApiIngressConfig};
use modkit::RestfulModule;
use order_changes::{config::OrderChangesConfig, OrderChanges};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const MEMORY_DSN: &str = "sqlite::memory:";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Adds `mode=rwc` so the file is created on first start.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case(MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:") {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create database directory {}", dir.display()))?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    out.push('?');
    match query {
        Some(q) if q.contains("mode=") => out.push_str(q),
        Some(q) => {
            out.push_str(q);
            out.push_str("&mode=rwc");
        }
        None => out.push_str("mode=rwc"),
    }
    Ok(out)
}

/// Only SQLite is wired in; anything else is a configuration error.
fn check_dsn(cfg: &DatabaseConfig) -> Result<()> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    if raw.eq_ignore_ascii_case(MEMORY_DSN) {
        return Ok(());
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;
    match url.scheme() {
        "sqlite" => Ok(()),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// Commerce Server - order change audit records over HTTP
#[derive(Parser)]
#[command(name = "commerce-server")]
#[command(about = "Commerce Server - order change audit records over HTTP")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration and database connectivity
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Commerce Server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args).await,
    }
}

/// Resolve the DSN to connect to, honoring `--mock`.
fn resolve_dsn(config: &AppConfig, args: &CliArgs) -> Result<Option<(String, DatabaseConfig)>> {
    if args.mock {
        let db_config = DatabaseConfig {
            url: MEMORY_DSN.to_string(),
            max_conns: Some(1),
            acquire_timeout_secs: config.database.as_ref().and_then(|d| d.acquire_timeout_secs),
        };
        return Ok(Some((MEMORY_DSN.to_string(), db_config)));
    }

    let Some(db_config) = config.database.clone() else {
        return Ok(None);
    };
    check_dsn(&db_config)?;

    let base_dir = PathBuf::from(&config.server.home_dir);
    let dsn = absolutize_sqlite_dsn(db_config.url.trim(), &base_dir, true)?;
    Ok(Some((dsn, db_config)))
}

async fn connect(dsn: &str, db_config: &DatabaseConfig) -> Result<DatabaseConnection> {
    // An in-memory database lives and dies with its single connection.
    let max_conns = if dsn == MEMORY_DSN {
        1
    } else {
        db_config.max_conns.unwrap_or(10)
    };

    let mut opts = ConnectOptions::new(dsn.to_owned());
    opts.max_connections(max_conns)
        .acquire_timeout(Duration::from_secs(
            db_config.acquire_timeout_secs.unwrap_or(5),
        ))
        .sqlx_logging(false);

    tracing::info!("Connecting to database: {}", dsn);
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to database {dsn}"))?;
    Ok(db)
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    let (dsn, db_config) = resolve_dsn(&config, &args)?
        .ok_or_else(|| anyhow!("No database configuration found; order_changes needs one"))?;
    let db = connect(&dsn, &db_config).await?;
    OrderChanges::migrate(&db).await?;

    let order_changes_cfg: OrderChangesConfig = config.module_config("order_changes")?;
    let ingress_cfg: ApiIngressConfig = config.module_config("api_ingress")?;

    let modules: Vec<Arc<dyn RestfulModule>> =
        vec![Arc::new(OrderChanges::new(db.clone(), order_changes_cfg))];
    let ingress = ApiIngress::new(ingress_cfg, modules);

    let addr = ingress.bind_addr(&config.server.host, config.server.port)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    ingress
        .serve(listener, async {
            if let Err(e) = runtime::wait_for_shutdown().await {
                tracing::error!("Shutdown signal handler failed: {}", e);
            }
        })
        .await?;

    db.close().await?;
    tracing::info!("Commerce Server stopped");
    Ok(())
}

async fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    let _: OrderChangesConfig = config.module_config("order_changes")?;
    let ingress_cfg: ApiIngressConfig = config.module_config("api_ingress")?;
    let ingress = ApiIngress::new(ingress_cfg, Vec::new());
    ingress.bind_addr(&config.server.host, config.server.port)?;

    match resolve_dsn(&config, &args)? {
        Some((dsn, db_config)) => {
            let db = connect(&dsn, &db_config).await?;
            db.ping().await.context("Database ping failed")?;
            db.close().await?;
        }
        None => tracing::warn!("No database configuration found"),
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_dsn_is_kept() {
        let base = Path::new("/srv/commerce");
        assert_eq!(absolutize_sqlite_dsn("sqlite::memory:", base, false).unwrap(), MEMORY_DSN);
        assert_eq!(absolutize_sqlite_dsn("sqlite://:memory:", base, false).unwrap(), MEMORY_DSN);
    }

    #[test]
    fn relative_dsn_is_resolved_against_home_dir() {
        let tmp = tempdir().unwrap();
        let dsn = absolutize_sqlite_dsn("sqlite://database/commerce.db", tmp.path(), true).unwrap();

        let expected = tmp
            .path()
            .join("database/commerce.db")
            .to_string_lossy()
            .replace('\\', "/");
        assert_eq!(dsn, format!("sqlite://{expected}?mode=rwc"));
        assert!(tmp.path().join("database").is_dir());
    }

    #[test]
    fn existing_query_is_preserved() {
        let tmp = tempdir().unwrap();
        let dsn = absolutize_sqlite_dsn("sqlite://a.db?mode=ro", tmp.path(), false).unwrap();
        assert!(dsn.ends_with("a.db?mode=ro"));

        let dsn = absolutize_sqlite_dsn("sqlite://a.db?cache=shared", tmp.path(), false).unwrap();
        assert!(dsn.ends_with("a.db?cache=shared&mode=rwc"));
    }

    #[test]
    fn bad_dsns_are_rejected() {
        let base = Path::new("/srv/commerce");
        assert!(absolutize_sqlite_dsn("postgres://localhost/db", base, false).is_err());
        assert!(absolutize_sqlite_dsn("sqlite://", base, false).is_err());

        let cfg = |url: &str| DatabaseConfig {
            url: url.to_string(),
            max_conns: None,
            acquire_timeout_secs: None,
        };
        assert!(check_dsn(&cfg("")).is_err());
        assert!(check_dsn(&cfg("mysql://localhost/db")).is_err());
        assert!(check_dsn(&cfg("sqlite://database/commerce.db")).is_ok());
        assert!(check_dsn(&cfg("sqlite::memory:")).is_ok());
    }
}
