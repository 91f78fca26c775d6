//! Program output
//!
//! Writes emitted programs to disk. The program is fully rendered before the
//! destination file is created, so a failed emission never leaves a partial
//! file behind.

use crate::error::WarmupResult;
use cncwarmup_camtools::ProgramText;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Write a program to `path`, creating missing parent directories.
///
/// The text is written exactly as rendered, without a trailing newline.
pub fn write_program(program: &ProgramText, path: &Path) -> WarmupResult<()> {
    let text = program.to_string();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;

    info!(
        path = %path.display(),
        bytes = text.len(),
        "Wrote warmup program"
    );
    Ok(())
}
