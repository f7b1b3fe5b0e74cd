//! Key catalog generation.

use std::{fs, path::Path};

use rand::{seq::index, Rng};

use crate::{config::KeygenConfig, domain::Key, errors::Error, Result};

/// Sample `count` distinct keys uniformly from `[min, max)`.
///
/// Fails when the range cannot supply `count` distinct values.
pub fn generate_keys<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    min: Key,
    max: Key,
) -> Result<Vec<Key>> {
    let span = max.checked_sub(min).ok_or_else(|| {
        Error::Generation(format!("empty range: min {min} is greater than max {max}"))
    })?;
    let span = usize::try_from(span)
        .map_err(|_| Error::Generation(format!("range [{min}, {max}) is too wide")))?;

    if span < count {
        return Err(Error::Generation(format!(
            "range [{min}, {max}) holds {span} values, cannot draw {count} unique keys"
        )));
    }

    Ok(index::sample(rng, span, count)
        .into_iter()
        .map(|offset| min + offset as Key)
        .collect())
}

/// Write keys as a flat JSON array, replacing any existing file.
pub fn write_catalog(path: &Path, keys: &[Key]) -> Result<()> {
    let json = serde_json::to_string(keys)?;
    fs::write(path, json)?;
    Ok(())
}

/// Generate a catalog per `cfg` and persist it. Returns the generated keys.
pub fn run(cfg: &KeygenConfig) -> Result<Vec<Key>> {
    let keys = generate_keys(&mut rand::thread_rng(), cfg.count, cfg.min, cfg.max)?;
    write_catalog(&cfg.output, &keys)?;
    Ok(keys)
}
