//! Tree traversal for flattening threads
//!
//! Thread depth is controlled by whoever wrote the archive, so traversal
//! uses an explicit stack instead of recursion.

use super::node::{Forest, NodeId};

/// Collect the records of a thread in depth-first order
///
/// A node is visited before its replies, and replies are visited in their
/// stored order before the node's next sibling. Placeholders are skipped
/// but their replies are still visited.
///
/// ## Returns
///
/// Indices into the forest's records.
pub fn collect_thread_members(forest: &Forest, root: NodeId) -> Vec<usize> {
    let mut members = Vec::new();
    let mut traversal_stack = vec![root];

    while let Some(current) = traversal_stack.pop() {
        let node = forest.node(current);
        if let Some(record) = node.message {
            members.push(record);
        }

        // Reverse so the first reply is popped first
        traversal_stack.extend(node.children.iter().rev().copied());
    }

    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threading::chains::{build_chains, date_then_subject};
    use crate::threading::test_support::record;

    fn flattened(forest: &Forest, root: &str) -> Vec<String> {
        collect_thread_members(forest, forest.lookup(root).unwrap())
            .into_iter()
            .map(|index| forest.record(index).message_id.clone())
            .collect()
    }

    #[test]
    fn test_collect_simple_thread() {
        // A → B → C (all real)
        let forest = build_chains(
            vec![
                record("A", None, 1),
                record("B", Some("A"), 2),
                record("C", Some("B"), 3),
            ],
            date_then_subject,
        );

        assert_eq!(flattened(&forest, "A"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_replies_before_siblings() {
        //   A
        //   ├─ B
        //   │  └─ D
        //   └─ C
        let forest = build_chains(
            vec![
                record("A", None, 1),
                record("C", Some("A"), 3),
                record("D", Some("B"), 4),
                record("B", Some("A"), 2),
            ],
            date_then_subject,
        );

        assert_eq!(flattened(&forest, "A"), vec!["A", "B", "D", "C"]);
    }

    #[test]
    fn test_collect_with_placeholder() {
        // ghost (placeholder) → B (real) → C (real)
        let forest = build_chains(
            vec![record("B", Some("ghost"), 2), record("C", Some("B"), 3)],
            date_then_subject,
        );

        assert_eq!(flattened(&forest, "ghost"), vec!["B", "C"]);
    }

    #[test]
    fn test_deep_thread_does_not_recurse() {
        let mut records = vec![record("m0", None, 0)];
        for i in 1..50_000 {
            let parent = format!("m{}", i - 1);
            records.push(record(&format!("m{i}"), Some(&parent), i as i64));
        }
        let forest = build_chains(records, date_then_subject);

        let members = collect_thread_members(&forest, forest.lookup("m0").unwrap());
        assert_eq!(members.len(), 50_000);
        assert_eq!(forest.record(members[49_999]).message_id, "m49999");
    }
}
