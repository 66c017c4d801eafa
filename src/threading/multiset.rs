//! Vote counting for orphan merging
//!
//! A [`Multiset`] counts how many replies mention a message id; an
//! [`Evidence`] sequence holds one multiset per ancestor depth, nearest
//! ancestor first.

use std::collections::BTreeMap;

use crate::models::Record;

static EMPTY: Multiset = Multiset(BTreeMap::new());

/// Message id → occurrence count. Counts are always positive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Multiset(BTreeMap<String, usize>);

impl Multiset {
    pub fn add(&mut self, id: &str, count: usize) {
        if count > 0 {
            *self.0.entry(id.to_string()).or_insert(0) += count;
        }
    }

    pub fn count(&self, id: &str) -> usize {
        self.0.get(id).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Multiset intersection: the minimum count of every shared id
    pub fn intersection(&self, other: &Multiset) -> Multiset {
        let mut common = Multiset::default();
        for (id, &count) in &self.0 {
            common.add(id, count.min(other.count(id)));
        }
        common
    }

    /// Multiset sum
    pub fn absorb(&mut self, other: &Multiset) {
        for (id, &count) in &other.0 {
            self.add(id, count);
        }
    }

    /// The id with the most votes; ties go to the smallest id.
    pub fn most_common(&self) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        for (id, &count) in &self.0 {
            match best {
                Some((_, leader)) if leader >= count => {}
                _ => best = Some((id.as_str(), count)),
            }
        }
        best
    }
}

/// Per-depth reference votes, nearest ancestor first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evidence(Vec<Multiset>);

impl Evidence {
    /// Count the `References` of every reply.
    ///
    /// Depth 0 holds the last reference of each reply, depth 1 the one
    /// before it, and so on. Replies with shorter chains simply stop
    /// contributing.
    pub fn from_replies<'a>(replies: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut levels: Vec<Multiset> = Vec::new();
        for reply in replies {
            for (depth, id) in reply.references.iter().rev().enumerate() {
                if depth == levels.len() {
                    levels.push(Multiset::default());
                }
                levels[depth].add(id, 1);
            }
        }
        Evidence(levels)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Votes at `depth`; beyond the end of the sequence this is empty.
    pub fn level(&self, depth: usize) -> &Multiset {
        self.0.get(depth).unwrap_or(&EMPTY)
    }

    /// Drop the nearest level, moving every vote one generation closer.
    pub fn climb(mut self) -> Self {
        if !self.0.is_empty() {
            self.0.remove(0);
        }
        self
    }

    /// Extend with empty levels up to `len`
    pub fn pad(mut self, len: usize) -> Self {
        if self.0.len() < len {
            self.0.resize(len, Multiset::default());
        }
        self
    }

    /// Level-wise sum of several sequences, padded to the longest.
    pub fn combine(parts: impl IntoIterator<Item = Evidence>) -> Self {
        let mut total = Evidence::default();
        for part in parts {
            let len = total.len().max(part.len());
            total = total.pad(len);
            for (level, votes) in total.0.iter_mut().zip(&part.0) {
                level.absorb(votes);
            }
        }
        total
    }
}
