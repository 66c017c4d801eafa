//! Chain building: from a flat record set to a parent-indexed forest
//!
//! 1. **Create Nodes**: one node per distinct Message-ID
//! 2. **Link Replies**: attach each record under its `In-Reply-To` target,
//!    creating a placeholder when the target is not in the record set
//! 3. **Break Loops**: detach one member of every reply loop
//! 4. **Order Replies**: sort every child list with the supplied ordering
//! 5. **Name Placeholders**: give each placeholder its first reply's subject

use std::cmp::Ordering;

use super::cycle_detection::find_cycle_breaks;
use super::node::{Forest, Node, NodeId};
use crate::models::Record;

/// Default ordering for replies and threads: date, then subject
pub fn date_then_subject(a: &Record, b: &Record) -> Ordering {
    a.date_utc
        .cmp(&b.date_utc)
        .then_with(|| a.subject.cmp(&b.subject))
}

/// Build the reply forest for `records`.
///
/// A record whose Message-ID was already seen replaces the earlier record in
/// the index; the node keeps its original position.
///
/// A link that makes a node its own ancestor (including a message that
/// replies to itself) is dropped and logged, leaving the record as a
/// top-level message.
pub fn build_chains<F>(records: Vec<Record>, order: F) -> Forest
where
    F: Fn(&Record, &Record) -> Ordering,
{
    let mut forest = Forest::new(records);

    // Step 1: Create nodes for all real messages
    let mut real_nodes = Vec::with_capacity(forest.records().len());
    for position in 0..forest.records().len() {
        let message_id = forest.record(position).message_id.clone();
        match forest.lookup(&message_id) {
            Some(existing) => {
                log::debug!("duplicate message id {}, keeping the later record", message_id);
                forest.node_mut(existing).message = Some(position);
            }
            None => real_nodes.push(forest.insert(message_id, Node::with_message(position))),
        }
    }

    // Step 2: Link replies, creating placeholders for missing parents
    for child in real_nodes {
        let Some(reply_to) = forest.message(child).and_then(|r| r.in_reply_to.clone()) else {
            continue;
        };

        let parent = match forest.lookup(&reply_to) {
            Some(parent) => parent,
            None => forest.insert(reply_to.clone(), Node::placeholder(reply_to)),
        };
        forest.attach(parent, child);
    }

    // Step 3: Cut reply loops so every record stays reachable
    for child in find_cycle_breaks(&forest) {
        log::warn!(
            "not linking {} under its In-Reply-To: the reply chain loops back on itself",
            forest.thread_info(child).message_id
        );
        forest.detach(child);
    }

    // Step 4: Order replies
    let ids: Vec<NodeId> = forest.ids().collect();
    for &id in &ids {
        sort_children(&mut forest, id, &order);
    }

    // Step 5: Placeholders are named after their first reply
    for id in ids {
        let node = forest.node(id);
        if !node.is_placeholder() {
            continue;
        }
        let subject = node
            .children
            .first()
            .and_then(|&first| forest.message(first))
            .map(|record| record.subject.clone())
            .unwrap_or_default();
        if let Some(synthetic) = forest.node_mut(id).synthetic.as_mut() {
            synthetic.subject = subject;
        }
    }

    log::debug!(
        "built {} nodes from {} records",
        forest.len(),
        forest.records().len()
    );

    forest
}

/// Stable sort of one node's replies; equal keys keep insertion order.
fn sort_children<F>(forest: &mut Forest, id: NodeId, order: &F)
where
    F: Fn(&Record, &Record) -> Ordering,
{
    let mut children = std::mem::take(&mut forest.node_mut(id).children);
    children.sort_by(|&a, &b| match (forest.message(a), forest.message(b)) {
        (Some(a), Some(b)) => order(a, b),
        // Only real records are ever linked as replies
        _ => Ordering::Equal,
    });
    forest.node_mut(id).children = children;
}
