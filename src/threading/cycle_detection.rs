//! Cycle detection for reply chains
//!
//! Every node has at most one parent, so a loop can only form among real
//! messages whose `In-Reply-To` headers point at each other (or at
//! themselves). Members of a loop are unreachable from any top-level node
//! and would silently vanish from the output, so each loop is cut once.

use super::node::{Forest, NodeId};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    /// On the ancestor walk that started at this index
    Walking(usize),
    Done,
}

/// Find one node per parent loop whose parent link must be dropped
///
/// Walks up the ancestry chain from every node, remembering which walk
/// touched each node. Reaching a node already on the current walk means the
/// walk entered a loop. The loop member created last is chosen, which is
/// the link that closed the loop when links are made in creation order.
/// Each node is walked over at most once.
///
/// ## Example
///
/// ```text
/// Links:  A → B → C → A
///
/// Result: [C] (dropping C's parent leaves C → A → B)
/// ```
pub fn find_cycle_breaks(forest: &Forest) -> Vec<NodeId> {
    let mut marks = vec![Mark::Unvisited; forest.len()];
    let mut breaks = Vec::new();

    for (walk, start) in forest.ids().enumerate() {
        let mut path = Vec::new();
        let mut current = Some(start);

        while let Some(id) = current {
            match marks[id.index()] {
                Mark::Done => break,
                Mark::Walking(owner) if owner == walk => {
                    // The loop is the tail of the path starting at `id`
                    let position = path.iter().position(|&node| node == id).unwrap_or(0);
                    if let Some(&last) = path[position..].iter().max() {
                        breaks.push(last);
                    }
                    break;
                }
                _ => {
                    marks[id.index()] = Mark::Walking(walk);
                    path.push(id);
                    current = forest.node(id).parent;
                }
            }
        }

        for id in path {
            marks[id.index()] = Mark::Done;
        }
    }

    breaks
}
