//! Archive ingestion.
//!
//! Everything needed to turn an archive location into threadable records:
//!
//! - `source`: read a local file or fetch a URL
//! - `mbox`: gzip decompression, mbox splitting and parallel decoding
//! - `parser`: RFC 5322 message decoding into [`Record`]s
//!
//! Pre-decoded records can also be supplied as a JSON array, see
//! [`parse_records_json`].

pub mod mbox;
pub mod parser;
pub mod source;

use crate::error::{ConvertError, RecordError};
use crate::models::{RawRecord, Record};

pub use mbox::{gunzip, parse_mbox};
pub use parser::parse_message;
pub use source::load_source;

/// Decode a JSON array of records.
///
/// Malformed JSON fails the whole input; a well-formed entry that lacks
/// required fields is rejected on its own.
pub fn parse_records_json(content: &[u8]) -> Result<Vec<Result<Record, RecordError>>, ConvertError> {
    let raw: Vec<RawRecord> = serde_json::from_slice(content)?;
    log::debug!("JSON input contains {} records", raw.len());

    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(position, record)| Record::from_raw(record, position))
        .collect())
}
