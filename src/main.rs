mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use fb_core::config::Config;

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = Config::load_or_default(config_path);

    // CLI flags win over the config file.
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting fundboard server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    fb_server::start(config).await?;
    Ok(())
}

fn open_pool(config: &Config) -> Result<fb_db::pool::DbPool> {
    let db_path = &config.server.db_path;
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    Ok(fb_db::pool::init_pool(db_path, config.server.pool_size)?)
}

fn seed(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let pool = open_pool(&config)?;
    let conn = fb_db::pool::get_conn(&pool)?;
    let counts = fb_db::seed::seed_demo_data(&conn)?;
    println!("Seeded {}", config.server.db_path.display());
    println!("{}", serde_json::to_string_pretty(&counts)?);
    Ok(())
}

fn migrate(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let pool = open_pool(&config)?;
    let conn = fb_db::pool::get_conn(&pool)?;
    let version = fb_db::migrations::current_version(&conn)?;
    println!(
        "Database {} is at schema version {version}",
        config.server.db_path.display()
    );
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {}", p.display());
            Config::load(p).with_context(|| format!("loading {}", p.display()))?
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("✓ Configuration is valid");
    } else {
        for warning in &warnings {
            println!("⚠ {warning}");
        }
    }
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Database: {}", config.server.db_path.display());
    println!(
        "  Rate limit: {} ({} req/min)",
        if config.rate_limit.enabled { "on" } else { "off" },
        config.rate_limit.requests_per_minute
    );
    println!("  Seed on startup: {}", config.seed.on_startup);
    Ok(())
}

fn hash_password(password: &str, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let hash = bcrypt::hash(password, config.auth.bcrypt_cost)?;
    println!("{hash}");
    Ok(())
}

fn set_password(email: &str, password: &str, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let pool = open_pool(&config)?;
    let conn = fb_db::pool::get_conn(&pool)?;
    let user = fb_db::queries::users::get_user_by_email(&conn, email)?
        .with_context(|| format!("no account registered for {email}"))?;
    let hash = bcrypt::hash(password, config.auth.bcrypt_cost)?;
    fb_db::queries::users::update_password(&conn, &user.id, &hash)?;
    println!("Password updated for {}", user.email);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise use defaults based on the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "fundboard=trace,fb_server=trace,fb_db=debug,fb_core=debug,tower_http=debug".to_string()
        } else {
            "fundboard=debug,fb_server=debug,fb_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Seed => seed(cli.config.as_deref()),
        Commands::Migrate => migrate(cli.config.as_deref()),
        Commands::Validate => validate_config(cli.config.as_deref()),
        Commands::HashPassword { password } => hash_password(&password, cli.config.as_deref()),
        Commands::SetPassword { email, password } => {
            set_password(&email, &password, cli.config.as_deref())
        }
        Commands::Version => {
            println!("fundboard {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
