//! Starter archive assembly.
//!
//! Entries are always written in the same order:
//!
//! 1. `<name>.json` - the payload as canonical JSON
//! 2. `<name>.html` - the fetched remote document, when there is one
//! 3. `/data/` - empty directory marker
//! 4. `/tools/` - empty directory marker
//!
//! Every entry carries the same fixed timestamp and options so identical
//! input produces byte-identical output.

use std::io::{Cursor, Read, Seek, Write};

use zip::result::ZipResult;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use crate::error::StarterError;
use crate::fetch::{fetch_into, FetchOutcome, Fetcher};
use crate::jcs::canonical_json_bytes;
use crate::name::ArchiveName;
use crate::payload::Payload;

/// Content type sent with a finished archive.
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip, application/octet-stream";

/// Placeholder directories added to every archive.
const PLACEHOLDER_DIRS: [&str; 2] = ["/data/", "/tools/"];

/// A finalized starter archive held in memory.
#[derive(Debug, Clone)]
pub struct Archive {
    name: ArchiveName,
    bytes: Vec<u8>,
    fetch: FetchOutcome,
}

impl Archive {
    pub fn name(&self) -> &ArchiveName {
        &self.name
    }

    /// Suggested download filename, `<name>.zip`.
    pub fn filename(&self) -> String {
        self.name.zip_filename()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn fetch_outcome(&self) -> FetchOutcome {
        self.fetch
    }
}

/// A single entry as read back from an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub name: String,
    pub size: u64,
    pub is_dir: bool,
}

fn file_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644)
}

fn dir_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o755)
}

/// Builds the starter archive for `name` from `payload`.
///
/// The remote document (if any) is retrieved through `fetcher`. Any error
/// discards the partially written archive.
pub fn assemble(
    name: &ArchiveName,
    payload: &Payload,
    fetcher: &dyn Fetcher,
) -> Result<Archive, StarterError> {
    let json = canonical_json_bytes(payload).map_err(StarterError::Serialization)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file(name.json_entry(), file_options())?;
    zip.write_all(&json)
        .map_err(|e| StarterError::Finalization(e.into()))?;

    let fetch = fetch_into(name, payload, fetcher, &mut zip, file_options())?;
    if let FetchOutcome::Embedded { bytes } = fetch {
        tracing::debug!(archive = %name, bytes, "embedded remote document");
    }

    for dir in PLACEHOLDER_DIRS {
        zip.add_directory(dir, dir_options())?;
    }

    let bytes = zip.finish()?.into_inner();
    tracing::debug!(archive = %name, size = bytes.len(), "archive finalized");

    Ok(Archive {
        name: name.clone(),
        bytes,
        fetch,
    })
}

/// Lists the entries of a ZIP archive in stored order.
pub fn read_entries<R: Read + Seek>(reader: R) -> ZipResult<Vec<EntrySummary>> {
    let mut archive = ZipArchive::new(reader)?;
    (0..archive.len())
        .map(|i| {
            let entry = archive.by_index(i)?;
            Ok(EntrySummary {
                name: entry.name().to_string(),
                size: entry.size(),
                is_dir: entry.is_dir(),
            })
        })
        .collect()
}
