use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;

/// Pretty print a value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("serializing output")?;
    writeln!(stdout).context("writing output")?;
    Ok(())
}
