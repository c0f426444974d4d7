// zip-starter core - builds "starter" archives from submitted JSON documents

pub mod archive;
pub mod error;
pub mod fetch;
pub mod jcs;
pub mod name;
pub mod payload;

pub use archive::{assemble, read_entries, Archive, EntrySummary, ARCHIVE_CONTENT_TYPE};
pub use error::{ErrorKind, StarterError};
pub use fetch::{fetch_into, FetchConfig, FetchOutcome, Fetcher, HttpFetcher};
pub use jcs::canonical_json_bytes;
pub use name::{resolve_name, ArchiveName};
pub use payload::Payload;
