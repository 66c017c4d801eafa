//! Previous/next linking across the whole archive
//!
//! Threads are flattened in their final order and every real message is
//! linked to its neighbours in the concatenated sequence, so navigation
//! crosses thread boundaries.

use regex::Regex;
use std::sync::OnceLock;

use super::node::{Forest, NodeId};
use super::traversal::collect_thread_members;
use crate::models::{LinkedMessage, PagingInfo, Record, Thread};

/// Lazy-initialized regex for the display name in a From header
static NAME_REGEX: OnceLock<Regex> = OnceLock::new();

/// Pattern matches the first parenthesised group without nested
/// parentheses, as in `alice at example.com (Alice Liddell)`.
fn get_name_regex() -> &'static Regex {
    NAME_REGEX.get_or_init(|| Regex::new(r"\(([^()]+)\)").expect("Invalid display name regex"))
}

/// Return the name in parentheses if there is one, otherwise the whole value
pub fn simple_from(from: &str) -> &str {
    get_name_regex()
        .captures(from)
        .and_then(|captures| captures.get(1))
        .map_or(from, |name| name.as_str())
}

/// Project a record to the data expected by paging controls
pub fn paging_info(record: &Record) -> PagingInfo {
    PagingInfo {
        message_id: record.message_id.clone(),
        message_id_hash: record.message_id_hash.clone(),
        from: simple_from(&record.from).to_string(),
        subject: record.subject.clone(),
    }
}

/// Flatten `roots` in order and link every message to its neighbours.
///
/// The first message overall has no `previous` and the last has no `next`.
pub fn tie_threads(forest: Forest, roots: &[NodeId]) -> Vec<Thread> {
    let flattened: Vec<_> = roots
        .iter()
        .map(|&root| (forest.thread_info(root), collect_thread_members(&forest, root)))
        .collect();

    let pages: Vec<PagingInfo> = flattened
        .iter()
        .flat_map(|(_, members)| members.iter())
        .map(|&index| paging_info(forest.record(index)))
        .collect();

    let mut records: Vec<Option<Record>> = forest.into_records().into_iter().map(Some).collect();
    let mut position = 0usize;
    let mut threads = Vec::with_capacity(flattened.len());

    for (info, members) in flattened {
        let mut messages = Vec::with_capacity(members.len());
        for index in members {
            let previous = position.checked_sub(1).map(|p| pages[p].clone());
            let next = pages.get(position + 1).cloned();
            position += 1;

            // Each record hangs off exactly one node
            let Some(record) = records[index].take() else {
                continue;
            };
            messages.push(LinkedMessage {
                record,
                previous,
                next,
            });
        }
        threads.push(Thread { info, messages });
    }

    log::debug!("linked {} messages across {} threads", position, threads.len());

    threads
}
