use anyhow::Context;

use financial_data_mining::{app, utils};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cfg = match utils::config::ServerConfig::from_env() {
        Ok(cfg) => {
            utils::logging::init_logging(&cfg.log);
            cfg
        }
        Err(e) => {
            utils::logging::init_logging(&utils::config::LogConfig::from_env());
            tracing::error!("Invalid configuration: {:#}", e);
            return Err(e);
        }
    };
    let db_pool = app::create_pool(&cfg.database_url, cfg.db_pool_size)
        .context("Failed to create DB pool")?;
    if cfg.run_migrations {
        app::run_migrations(&db_pool)?;
    }
    tokio::fs::create_dir_all(&cfg.media_root)
        .await
        .with_context(|| format!("Failed to create media root {}", cfg.media_root.display()))?;

    let addr = cfg.addr;
    let app = app::build_app_with_pool(db_pool, cfg);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind failed")?;
    tracing::info!("Axum listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
