use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::Context;
use serde::Serialize;
use statview_table::DataTable;

/// Loads a table from the host's JSON shape.
pub(crate) fn load_table(path: &Path) -> anyhow::Result<DataTable> {
    let file = File::open(path)
        .with_context(|| format!("failed to open table file {}", path.display()))?;
    let table = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse table file {}", path.display()))?;
    Ok(table)
}

/// Writes chart data as pretty-printed JSON.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("failed to write output file {}", path.display()))?;
    Ok(())
}
