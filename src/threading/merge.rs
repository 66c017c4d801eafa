//! Orphan merging
//!
//! Several placeholder roots can be fragments of one conversation whose
//! ancestor is missing from the archive. Their replies' `References` headers
//! still name that ancestor, so fragments are fused when their replies cite
//! the same id at the same depth.
//!
//! ## Algorithm
//!
//! 1. Build the evidence sequence of every placeholder root, drop the
//!    nearest level (it is the placeholder's own id) and pad all sequences
//!    to one length
//! 2. Take the first placeholder off the pool and intersect its nearest
//!    level with the nearest level of every other pool member
//! 3. No overlap: the placeholder is settled
//! 4. Overlap: the id with most combined votes names a new placeholder that
//!    adopts all the matched fragments' replies; its evidence is the sum of
//!    theirs, climbed one generation. Settled placeholders return to the
//!    pool and the pass restarts
//!
//! Only the nearest remaining level is ever compared: fragments whose
//! shared ancestor sits at different depths are left apart.

use std::iter;

use super::multiset::{Evidence, Multiset};
use super::node::{Forest, Node, NodeId};
use crate::models::ThreadInfo;

/// A placeholder root still eligible for merging
#[derive(Debug)]
struct Orphan {
    evidence: Evidence,
    node: NodeId,
}

/// Merge out-of-range fragments and return the final thread order.
///
/// `threads` must be ordered the way [`top_level_chains`] returns them.
/// Settled placeholders come first, in the order they settled, followed by
/// the in-range roots in their original order.
///
/// [`top_level_chains`]: super::roots::top_level_chains
pub fn normalize_threads(forest: &mut Forest, threads: Vec<NodeId>) -> Vec<NodeId> {
    let mut threads = threads.into_iter().peekable();

    let mut candidates = Vec::new();
    while let Some(&id) = threads.peek() {
        if !forest.node(id).is_placeholder() {
            break;
        }
        threads.next();
        candidates.push(Orphan {
            evidence: reply_evidence(forest, id),
            node: id,
        });
    }

    // The nearest level of every reply is the placeholder itself
    let depth = candidates
        .iter()
        .map(|orphan| orphan.evidence.len())
        .max()
        .unwrap_or(0)
        .saturating_sub(1);
    let mut pool: Vec<Orphan> = candidates
        .into_iter()
        .map(|orphan| Orphan {
            evidence: orphan.evidence.climb().pad(depth),
            node: orphan.node,
        })
        .collect();

    let mut settled: Vec<Orphan> = Vec::new();
    let mut merges = 0usize;

    while !pool.is_empty() {
        let orphan = pool.remove(0);

        let mut votes = Multiset::default();
        let mut matched = Vec::new();
        for (index, other) in pool.iter().enumerate() {
            let common = orphan
                .evidence
                .level(0)
                .intersection(other.evidence.level(0));
            if !common.is_empty() {
                votes.absorb(&common);
                matched.push(index);
            }
        }

        let Some((ancestor, count)) = votes.most_common() else {
            settled.push(orphan);
            continue;
        };
        let ancestor = ancestor.to_string();
        log::trace!(
            "fusing {} fragment(s) under {} ({} votes)",
            matched.len() + 1,
            ancestor,
            count
        );

        // Remove from the back so earlier indices stay valid
        let mut partners: Vec<Orphan> = matched
            .into_iter()
            .rev()
            .map(|index| pool.remove(index))
            .collect();
        partners.reverse();

        let fused = fuse(forest, orphan, partners, ancestor);
        merges += 1;

        // A fusion may unlock further matches, so retry everything
        let mut retry = std::mem::take(&mut settled);
        retry.push(fused);
        retry.append(&mut pool);
        pool = retry;
    }

    log::debug!(
        "orphan merging: {} fusions, {} out-of-range threads remain",
        merges,
        settled.len()
    );

    settled
        .into_iter()
        .map(|orphan| orphan.node)
        .chain(threads)
        .collect()
}

fn reply_evidence(forest: &Forest, id: NodeId) -> Evidence {
    Evidence::from_replies(
        forest
            .node(id)
            .children
            .iter()
            .filter_map(|&child| forest.message(child)),
    )
}

/// Create a placeholder adopting the replies of `orphan` and `partners`.
///
/// The absorbed placeholders are left empty and unreachable.
fn fuse(forest: &mut Forest, orphan: Orphan, partners: Vec<Orphan>, ancestor: String) -> Orphan {
    let subject = forest.thread_info(orphan.node).subject;

    let mut replies = std::mem::take(&mut forest.node_mut(orphan.node).children);
    for partner in &partners {
        replies.append(&mut forest.node_mut(partner.node).children);
    }

    let evidence = Evidence::combine(
        iter::once(orphan.evidence)
            .chain(partners.into_iter().map(|partner| partner.evidence))
            .map(Evidence::climb),
    );

    let node = forest.push(Node {
        message: None,
        parent: None,
        children: Vec::with_capacity(replies.len()),
        synthetic: Some(ThreadInfo {
            message_id: ancestor,
            subject,
        }),
    });
    for reply in replies {
        forest.attach(node, reply);
    }

    Orphan { evidence, node }
}
