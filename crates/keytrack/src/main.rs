use std::sync::Arc;

use anyhow::Context;

use keytrack_core::{catalog::KeyCatalog, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    keytrack_core::logging::init("keytrack")?;

    let cfg = Arc::new(Config::load()?);

    // No catalog, no service.
    let catalog = KeyCatalog::load(&cfg.catalog_path)
        .with_context(|| format!("loading key catalog {}", cfg.catalog_path.display()))?;

    keytrack_telegram::router::run_polling(cfg, catalog)
        .await
        .context("telegram bot failed")?;

    Ok(())
}
