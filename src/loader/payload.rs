//! # Embedded Payload Extraction
//!
//! The native module ships embedded in the host bundle as a byte blob and
//! is written verbatim to `<install_dir>/Plugins/<file_name>` before being
//! loaded. An existing copy at that path is overwritten; extraction fails
//! if the destination cannot be opened for writing, which typically means
//! another instance of the host still has the module mapped.

use crate::config::PLUGINS_SUBDIR;
use crate::error::Result;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// An embedded native payload: the file name it is extracted under and the
/// bytes bundled with the host plugin (typically via `include_bytes!`).
#[derive(Debug, Clone, Copy)]
pub struct PayloadSource<'a> {
    pub file_name: &'a str,
    pub bytes: &'a [u8],
}

/// Write the payload to `<install_dir>/Plugins/<file_name>`, creating the
/// plugins directory if needed and overwriting any prior copy.
pub fn extract(source: &PayloadSource<'_>, install_dir: &Path) -> Result<PathBuf> {
    if source.bytes.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "embedded payload is empty",
        )
        .into());
    }

    let plugins_dir = install_dir.join(PLUGINS_SUBDIR);
    fs::create_dir_all(&plugins_dir)?;

    let destination = plugins_dir.join(source.file_name);
    let mut file = fs::File::create(&destination)?;
    file.write_all(source.bytes)?;
    file.sync_all()?;

    debug!(path = %destination.display(), bytes = source.bytes.len(), "extracted native payload");
    Ok(destination)
}
