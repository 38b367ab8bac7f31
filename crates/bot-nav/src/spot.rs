//! Hiding-spot search.
//!
//! Expands outward from the searcher's area in order of travel distance
//! (Dijkstra over edge lengths) and picks the closest precomputed spot that
//! none of the given threat areas can see.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bot_core::{NodeId, Vec3};

use crate::graph::{HidingSpot, NavGraph, SpotFlags};

/// Parameters for [`find_hiding_spot`].
#[derive(Clone, Debug)]
pub struct SpotQuery<'a> {
    /// Area the search starts from.
    pub start: NodeId,
    /// Searcher position, used for the in-area leg of the distance.
    pub origin: Vec3,
    /// Maximum travel distance to a spot.
    pub max_range: f32,
    /// Areas the spot must be hidden from.
    pub threats: &'a [NodeId],
    /// Flags a spot must carry.
    pub require: SpotFlags,
    /// Positions to stay away from (e.g. spots claimed by teammates).
    pub avoid: &'a [Vec3],
    pub avoid_radius: f32,
}

impl<'a> SpotQuery<'a> {
    pub fn new(start: NodeId, origin: Vec3, max_range: f32) -> Self {
        Self {
            start,
            origin,
            max_range,
            threats: &[],
            require: SpotFlags::empty(),
            avoid: &[],
            avoid_radius: 0.0,
        }
    }

    pub fn hidden_from(mut self, threats: &'a [NodeId]) -> Self {
        self.threats = threats;
        self
    }

    pub fn requiring(mut self, flags: SpotFlags) -> Self {
        self.require = flags;
        self
    }

    pub fn avoiding(mut self, positions: &'a [Vec3], radius: f32) -> Self {
        self.avoid = positions;
        self.avoid_radius = radius;
        self
    }
}

#[derive(Copy, Clone)]
struct Frontier {
    dist: f32,
    node: NodeId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other.dist.total_cmp(&self.dist).then_with(|| other.node.cmp(&self.node))
    }
}

/// Closest acceptable hiding spot within `query.max_range` travel distance,
/// or `None` if there is none.
pub fn find_hiding_spot(graph: &NavGraph, query: &SpotQuery<'_>) -> Option<HidingSpot> {
    if !graph.contains(query.start) {
        return None;
    }

    let acceptable = |spot: &HidingSpot| {
        spot.flags.contains(query.require)
            && !spot.flags.contains(SpotFlags::EXPOSED)
            && query.threats.iter().all(|&t| !graph.is_visible(spot.node, t))
            && query
                .avoid
                .iter()
                .all(|p| p.distance(spot.pos) > query.avoid_radius)
    };

    let mut dist = vec![f32::INFINITY; graph.node_count()];
    dist[query.start.index()] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(Frontier { dist: 0.0, node: query.start });

    let mut best: Option<(f32, HidingSpot)> = None;

    while let Some(Frontier { dist: d, node }) = heap.pop() {
        if d > dist[node.index()] {
            continue;
        }
        // Everything left is farther than the best spot found so far.
        if best.as_ref().is_some_and(|(b, _)| d > *b) {
            break;
        }

        let entry = if node == query.start { query.origin } else { graph.node_center(node) };
        for spot in graph.spots_in(node) {
            let total = d + entry.distance(spot.pos);
            if total <= query.max_range
                && acceptable(spot)
                && best.as_ref().is_none_or(|(b, _)| total < *b)
            {
                best = Some((total, *spot));
            }
        }

        for edge in graph.out_edges(node) {
            let next = graph.edge_to[edge.index()];
            let nd = d + graph.edge_length[edge.index()];
            if nd <= query.max_range && nd < dist[next.index()] {
                dist[next.index()] = nd;
                heap.push(Frontier { dist: nd, node: next });
            }
        }
    }

    best.map(|(_, spot)| spot)
}
