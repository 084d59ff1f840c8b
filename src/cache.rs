use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use tracing::debug;

/// Writes `data` as pretty JSON, flushing before returning.
pub fn save_to_file<T: Serialize>(data: &T, path: &str) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data).with_context(|| format!("writing {}", path))?;
    writer.flush().with_context(|| format!("flushing {}", path))?;
    debug!(path, "saved json document");
    Ok(())
}

pub fn load_from_file<T: DeserializeOwned>(path: &str) -> Result<T> {
    let file = File::open(path).with_context(|| format!("opening {}", path))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {}", path))
}
