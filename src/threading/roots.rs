//! Root classification and ordering
//!
//! Placeholders come first, ordered by their earliest reply: they stand for
//! conversations that started before the archive window. Real roots follow,
//! ordered by their own headers.

use std::cmp::Ordering;

use super::node::{Forest, NodeId};
use crate::models::Record;

/// Return every top-level node in thread order.
///
/// A node is top-level when it has no parent: placeholders never do, and a
/// real message only lacks one when it has no `In-Reply-To` (or it was
/// detached to break a reply loop).
pub fn top_level_chains<F>(forest: &Forest, order: F) -> Vec<NodeId>
where
    F: Fn(&Record, &Record) -> Ordering,
{
    let (mut out_of_range, mut in_range): (Vec<NodeId>, Vec<NodeId>) = forest
        .ids()
        .filter(|&id| forest.node(id).parent.is_none())
        .partition(|&id| forest.node(id).is_placeholder());

    // Placeholders always host at least one reply, and replies are sorted
    out_of_range.sort_by(|&a, &b| compare(first_reply(forest, a), first_reply(forest, b), &order));
    in_range.sort_by(|&a, &b| compare(forest.message(a), forest.message(b), &order));

    log::debug!(
        "found {} top-level threads ({} out of range)",
        out_of_range.len() + in_range.len(),
        out_of_range.len()
    );

    out_of_range.extend(in_range);
    out_of_range
}

fn first_reply(forest: &Forest, id: NodeId) -> Option<&Record> {
    forest
        .node(id)
        .children
        .first()
        .and_then(|&child| forest.message(child))
}

fn compare<F>(a: Option<&Record>, b: Option<&Record>, order: &F) -> Ordering
where
    F: Fn(&Record, &Record) -> Ordering,
{
    match (a, b) {
        (Some(a), Some(b)) => order(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threading::chains::{build_chains, date_then_subject};
    use crate::threading::test_support::record;

    fn names(forest: &Forest, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| forest.thread_info(id).message_id)
            .collect()
    }

    #[test]
    fn test_placeholders_precede_real_roots() {
        let forest = build_chains(
            vec![
                record("root-late", None, 50),
                record("root-early", None, 5),
                record("orphan-b", Some("ghost-b"), 30),
                record("orphan-a", Some("ghost-a"), 40),
                record("orphan-a2", Some("ghost-a"), 10),
                record("reply", Some("root-early"), 6),
            ],
            date_then_subject,
        );

        let roots = top_level_chains(&forest, date_then_subject);

        // ghost-a's first reply (10) predates ghost-b's (30)
        assert_eq!(
            names(&forest, &roots),
            vec!["ghost-a", "ghost-b", "root-early", "root-late"]
        );
    }

    #[test]
    fn test_custom_ordering_is_honoured() {
        let forest = build_chains(
            vec![record("a", None, 1), record("b", None, 2)],
            date_then_subject,
        );

        let newest_first = |a: &Record, b: &Record| b.date_utc.cmp(&a.date_utc);
        let roots = top_level_chains(&forest, newest_first);

        assert_eq!(names(&forest, &roots), vec!["b", "a"]);
    }

    #[test]
    fn test_empty_forest() {
        let forest = build_chains(vec![], date_then_subject);
        assert!(top_level_chains(&forest, date_then_subject).is_empty());
    }
}
