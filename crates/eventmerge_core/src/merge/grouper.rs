//! Connected-component clustering of overlapping events.
//!
//! # Responsibility
//! - Partition events into maximal clusters of the overlap graph.
//! - Attach the synthesized replacement draft to every multi-member cluster.
//!
//! # Invariants
//! - Clustering is transitive: if A overlaps B and B overlaps C, then A, B
//!   and C share one group even when A and C are disjoint.
//! - Members are in start-time order (stable for equal starts); groups are
//!   ordered by their earliest member.
//! - Singleton clusters are never emitted.

use crate::merge::overlap::overlaps;
use crate::merge::synthesize::merge_group;
use crate::model::event::{Event, EventDraft};
use std::collections::HashMap;

/// One cluster of two or more mutually connected events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapGroup {
    /// Cluster members in start-time order.
    pub members: Vec<Event>,
    /// Replacement event for the members; unsaved.
    pub synthesized: EventDraft,
}

impl OverlapGroup {
    fn from_members(members: Vec<Event>) -> Self {
        let synthesized = merge_group(&members);
        Self {
            members,
            synthesized,
        }
    }
}

/// Groups events into connected overlap clusters with two or more members.
///
/// Overlap edges are found by scanning the start-sorted events: for event
/// `i`, later events are checked until one starts at or after `i` ends.
/// Components are tracked with union-find, so the cost is
/// `O(n log n + E * α(n))` where `E` is the number of overlapping pairs.
pub fn group_overlapping(events: &[Event]) -> Vec<OverlapGroup> {
    if events.len() < 2 {
        return Vec::new();
    }

    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|event| event.start_time);

    let mut sets = DisjointSet::new(sorted.len());
    for (i, current) in sorted.iter().enumerate() {
        for (offset, candidate) in sorted[i + 1..].iter().enumerate() {
            if candidate.start_time >= current.end_time {
                break;
            }
            if overlaps(current, candidate) {
                sets.union(i, i + 1 + offset);
            }
        }
    }

    let mut slot_by_root: HashMap<usize, usize> = HashMap::new();
    let mut clusters: Vec<Vec<Event>> = Vec::new();
    for (i, event) in sorted.iter().enumerate() {
        let root = sets.find(i);
        let slot = *slot_by_root.entry(root).or_insert_with(|| {
            clusters.push(Vec::new());
            clusters.len() - 1
        });
        clusters[slot].push((*event).clone());
    }

    clusters
        .into_iter()
        .filter(|members| members.len() > 1)
        .map(OverlapGroup::from_members)
        .collect()
}

struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return;
        }
        match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Less => self.parent[root_a] = root_b,
            std::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            std::cmp::Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
    }
}
