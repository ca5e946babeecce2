//! Output management module
//!
//! Writes accepted candidates, one per line, re-encoded into the run's
//! encoding through a buffered writer.

use crate::encoding::TextEncoding;
use crate::error::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Default buffer size for file writing (1MB)
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];

/// Line writer that encodes each line before it reaches the sink
pub struct OutputWriter<W: Write> {
    writer: BufWriter<W>,
    encoding: TextEncoding,
    scratch: Vec<u8>,
    lines_written: u64,
    bytes_written: u64,
}

impl OutputWriter<File> {
    /// Create (or truncate) the file at `path`
    pub fn create(path: &Path, encoding: TextEncoding, buffer_size: usize) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| Error::resource("cannot create output file", path, e))?;

        Ok(Self::with_capacity(buffer_size, file, encoding))
    }
}

impl<W: Write> OutputWriter<W> {
    pub fn new(inner: W, encoding: TextEncoding) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, inner, encoding)
    }

    pub fn with_capacity(buffer_size: usize, inner: W, encoding: TextEncoding) -> Self {
        Self {
            writer: BufWriter::with_capacity(buffer_size, inner),
            encoding,
            scratch: Vec::with_capacity(256),
            lines_written: 0,
            bytes_written: 0,
        }
    }

    /// Write a line followed by `\n`
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.scratch.clear();

        // UTF-16 output carries a BOM, emitted lazily so empty results stay empty
        if self.encoding == TextEncoding::Utf16 && self.lines_written == 0 {
            self.scratch.extend_from_slice(&UTF16LE_BOM);
        }
        encode_into(self.encoding, line, &mut self.scratch);
        encode_into(self.encoding, "\n", &mut self.scratch);

        self.writer.write_all(&self.scratch)?;
        self.lines_written += 1;
        self.bytes_written += self.scratch.len() as u64;
        Ok(())
    }

    /// Flush the buffer to the sink
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush and hand back the underlying sink
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::Unexpected(e.into_error()))
    }
}

fn encode_into(encoding: TextEncoding, text: &str, out: &mut Vec<u8>) {
    match encoding {
        TextEncoding::Latin1 => out.extend_from_slice(&encoding_rs::mem::encode_latin1_lossy(text)),
        TextEncoding::Windows1252 => {
            let (bytes, _, unmappable) = encoding_rs::WINDOWS_1252.encode(text);
            if unmappable {
                log::warn!("Unmappable characters in {:?} replaced for WINDOWS-1252 output", text);
            }
            out.extend_from_slice(&bytes);
        }
        TextEncoding::Utf8 => out.extend_from_slice(text.as_bytes()),
        TextEncoding::Utf16 => out.extend(text.encode_utf16().flat_map(u16::to_le_bytes)),
    }
}

/// Create the parent directory of `path` if it is missing.
///
/// Returns the directory when one had to be created.
pub fn ensure_parent_dir(path: &Path) -> Result<Option<&Path>> {
    let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(None);
    };

    if dir.exists() {
        return Ok(None);
    }

    std::fs::create_dir_all(dir)
        .map_err(|e| Error::resource("cannot create output directory", dir, e))?;
    log::info!("Created missing directory: {}", dir.display());
    Ok(Some(dir))
}
