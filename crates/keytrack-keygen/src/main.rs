//! One-off generator for the key catalog.
//!
//! Writes `KEYGEN_COUNT` unique keys drawn from `[KEYGEN_MIN, KEYGEN_MAX)` to
//! `KEY_CATALOG_PATH` as a JSON array, replacing any existing catalog.

use anyhow::Context;

use keytrack_core::{config::KeygenConfig, keygen};

fn main() -> anyhow::Result<()> {
    keytrack_core::logging::init("keytrack-keygen")?;

    let cfg = KeygenConfig::load()?;
    let keys = keygen::run(&cfg).with_context(|| {
        format!(
            "generating {} keys in [{}, {}) into {}",
            cfg.count,
            cfg.min,
            cfg.max,
            cfg.output.display()
        )
    })?;

    tracing::info!(
        "{} random numbers generated and saved to '{}'.",
        keys.len(),
        cfg.output.display()
    );
    Ok(())
}
