//! Thread reconstruction module
//!
//! Turns a flat set of decoded messages into ordered, navigable threads.
//!
//! ## Threading Strategy
//!
//! 1. **Chains**: link every message under its `In-Reply-To` target, with
//!    placeholders for targets missing from the archive
//! 2. **Roots**: order the top-level nodes, placeholders first
//! 3. **Orphan Merging**: fuse placeholder fragments whose replies'
//!    `References` headers vote for a common missing ancestor
//! 4. **Paging**: flatten each thread depth-first and link every message to
//!    its chronological neighbours across all threads
//!
//! Everything runs synchronously over an in-memory record set; each call
//! owns its forest and discards it once the threads are built.
//!
//! ## Module Structure
//!
//! - `node`: forest arena for real messages and placeholders
//! - `chains`: reply chain building and default ordering
//! - `cycle_detection`: loop breaking for ill-formed reply chains
//! - `roots`: top-level classification and ordering
//! - `multiset`: reference vote counting
//! - `merge`: out-of-range fragment merging
//! - `traversal`: depth-first flattening
//! - `paging`: previous/next linking

pub mod chains;
pub mod cycle_detection;
pub mod merge;
pub mod multiset;
pub mod node;
pub mod paging;
pub mod roots;
pub mod traversal;

use crate::error::RecordError;
use crate::models::{Record, Thread};

pub use chains::{build_chains, date_then_subject};
pub use merge::normalize_threads;
pub use paging::{paging_info, simple_from, tie_threads};
pub use roots::top_level_chains;

/// Outcome of threading a partially valid record stream
#[derive(Debug, Default)]
pub struct Reconstruction {
    pub threads: Vec<Thread>,
    /// Records that could not be threaded, in input order
    pub rejected: Vec<RecordError>,
}

/// Reconstruct threads from a record set.
///
/// Output order: merged out-of-range threads first, then in-range threads
/// by date and subject. Messages within a thread are depth-first, and
/// `previous`/`next` form one chain across the whole result.
pub fn reconstruct_threads(records: Vec<Record>) -> Vec<Thread> {
    if records.is_empty() {
        return Vec::new();
    }

    let record_count = records.len();
    let mut forest = build_chains(records, date_then_subject);
    let roots = top_level_chains(&forest, date_then_subject);
    let roots = normalize_threads(&mut forest, roots);
    let threads = tie_threads(forest, &roots);

    log::info!(
        "threading complete: {} threads from {} records",
        threads.len(),
        record_count
    );

    threads
}

/// Reconstruct threads from ingestion results.
///
/// Rejected records are logged and returned alongside the threads; they
/// never abort the run.
pub fn reconstruct<I>(results: I) -> Reconstruction
where
    I: IntoIterator<Item = Result<Record, RecordError>>,
{
    let mut records = Vec::new();
    let mut rejected = Vec::new();

    for result in results {
        match result {
            Ok(record) => records.push(record),
            Err(err) => {
                log::warn!("skipping record: {}", err);
                rejected.push(err);
            }
        }
    }

    Reconstruction {
        threads: reconstruct_threads(records),
        rejected,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{Record, message_id_hash, sender_hash};

    pub fn record(message_id: &str, in_reply_to: Option<&str>, date_utc: i64) -> Record {
        let from = format!("{message_id} at example.com");
        Record {
            message_id: message_id.to_string(),
            message_id_hash: message_id_hash(message_id),
            in_reply_to: in_reply_to.map(str::to_string),
            references: Vec::new(),
            subject: format!("subject {message_id}"),
            date: None,
            date_utc,
            from_hash: sender_hash(&from),
            from,
            payload: String::new(),
        }
    }

    pub fn with_subject(mut record: Record, subject: &str) -> Record {
        record.subject = subject.to_string();
        record
    }

    pub fn with_references(mut record: Record, references: &[&str]) -> Record {
        record.references = references.iter().map(|id| id.to_string()).collect();
        record
    }

    pub fn with_from(mut record: Record, from: &str) -> Record {
        record.from = from.to_string();
        record
    }
}
