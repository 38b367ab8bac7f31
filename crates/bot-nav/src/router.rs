//! Routing trait and default A* implementation.
//!
//! # Pluggability
//!
//! Path following calls routing via the [`Router`] trait, so hosts can swap
//! in custom implementations (hierarchical search, precomputed tables)
//! without touching the bots.  The default [`AStarRouter`] searches the CSR
//! area graph directly.
//!
//! # Cost model
//!
//! Costs are world units.  Every edge costs its travel length; crouch areas,
//! jumps and ladders add fixed penalties.  `RouteMode::Safest` additionally
//! scales each step by the destination area's danger.  Penalties are never
//! negative, so the straight-line distance heuristic stays admissible.
//!
//! # Partial routes
//!
//! When the goal cannot be reached (disconnected, or the expansion budget is
//! exhausted) the router returns a route to the explored area closest to the
//! goal with `reached_goal = false`.  Only when no progress at all is
//! possible does it return an error.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bot_core::{EdgeId, NodeId};

use crate::graph::{EdgeKind, NavGraph, NodeFlags};
use crate::{NavError, NavResult};

// ── RouteMode ─────────────────────────────────────────────────────────────────

/// Which cost function the search uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RouteMode {
    /// Shortest travel distance.
    #[default]
    Fastest,
    /// Avoid areas with a high danger rating, accepting detours.
    Safest,
}

// ── RouterConfig ──────────────────────────────────────────────────────────────

/// Tuning for [`AStarRouter`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouterConfig {
    /// Maximum node expansions per search before falling back.
    pub max_expansions: usize,
    /// Extra cost for entering a crouch-only area.
    pub crouch_penalty: f32,
    /// Extra cost for a jump edge.
    pub jump_penalty: f32,
    /// Extra cost for a ladder edge, on top of its climb length.
    pub ladder_penalty: f32,
    /// `RouteMode::Safest` multiplies a step by `1 + danger_weight * danger`.
    pub danger_weight: f32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_expansions: 4_096,
            crouch_penalty: 4.0,
            jump_penalty:   2.0,
            ladder_penalty: 6.0,
            danger_weight:  5.0,
        }
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Areas visited in order, including both endpoints.
    pub nodes: Vec<NodeId>,
    /// Edges traversed in order; `edges.len() == nodes.len() - 1`.
    pub edges: Vec<EdgeId>,
    /// Total search cost.
    pub cost: f32,
    /// `false` when the route ends at the closest reachable area instead of
    /// the requested goal.
    pub reached_goal: bool,
}

impl Route {
    /// `true` if the route starts and ends in the same area.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn last_node(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so they can be shared across Rayon
/// worker threads during the parallel bot update.
pub trait Router: Send + Sync {
    /// Compute a route from `from` to `to`.
    ///
    /// `from == to` yields a trivial route rather than an error.
    fn route(
        &self,
        graph: &NavGraph,
        from: NodeId,
        to: NodeId,
        mode: RouteMode,
    ) -> NavResult<Route>;
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// A* over the area graph with a straight-line heuristic.
#[derive(Clone, Debug, Default)]
pub struct AStarRouter {
    pub config: RouterConfig,
}

impl AStarRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    /// Cost of traversing `edge` under `mode`.
    #[inline]
    pub fn edge_cost(&self, graph: &NavGraph, edge: EdgeId, mode: RouteMode) -> f32 {
        let cfg = &self.config;
        let to = graph.edge_to[edge.index()];
        let mut cost = graph.edge_length[edge.index()];
        match graph.edge_kind[edge.index()] {
            EdgeKind::Walk | EdgeKind::Drop => {}
            EdgeKind::Jump => cost += cfg.jump_penalty,
            EdgeKind::Ladder(_) => cost += cfg.ladder_penalty,
        }
        if graph.flags(to).contains(NodeFlags::CROUCH) {
            cost += cfg.crouch_penalty;
        }
        if mode == RouteMode::Safest {
            cost *= 1.0 + cfg.danger_weight * graph.danger(to).max(0.0);
        }
        cost
    }
}

impl Router for AStarRouter {
    fn route(
        &self,
        graph: &NavGraph,
        from: NodeId,
        to: NodeId,
        mode: RouteMode,
    ) -> NavResult<Route> {
        astar(self, graph, from, to, mode)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

/// Open-set entry.  Ordered so that `BinaryHeap` (a max-heap) pops the
/// lowest estimate first; `NodeId` breaks ties deterministically.
#[derive(Copy, Clone, Debug)]
struct Open {
    estimate: f32,
    cost:     f32,
    node:     NodeId,
}

impl PartialEq for Open {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Open {}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.node.cmp(&self.node))
    }
}

fn astar(
    router: &AStarRouter,
    graph: &NavGraph,
    from: NodeId,
    to: NodeId,
    mode: RouteMode,
) -> NavResult<Route> {
    if !graph.contains(from) {
        return Err(NavError::NodeNotFound(from));
    }
    if !graph.contains(to) {
        return Err(NavError::NodeNotFound(to));
    }
    if from == to {
        return Ok(Route { nodes: vec![from], edges: vec![], cost: 0.0, reached_goal: true });
    }

    let goal_pos = graph.node_center(to);
    let heuristic = |n: NodeId| graph.node_center(n).distance(goal_pos);

    let n = graph.node_count();
    // best[v] = best known cost to reach v.
    let mut best      = vec![f32::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];
    let mut closed    = vec![false; n];

    best[from.index()] = 0.0;
    let mut closest = (heuristic(from), from);

    let mut heap = BinaryHeap::new();
    heap.push(Open { estimate: closest.0, cost: 0.0, node: from });

    let mut expanded = 0usize;
    while let Some(Open { cost, node, .. }) = heap.pop() {
        if node == to {
            return Ok(reconstruct(graph, &prev_edge, to, cost, true));
        }
        // Skip stale heap entries.
        if closed[node.index()] || cost > best[node.index()] {
            continue;
        }
        closed[node.index()] = true;

        let h = heuristic(node);
        if h < closest.0 {
            closest = (h, node);
        }

        expanded += 1;
        if expanded > router.config.max_expansions {
            tracing::debug!(%from, %to, expanded, "route search budget exhausted");
            return fallback(graph, &prev_edge, &best, from, closest.1)
                .ok_or(NavError::SearchBudgetExceeded { from, to, expanded });
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            if closed[neighbor.index()] {
                continue;
            }
            let new_cost = cost + router.edge_cost(graph, edge, mode);
            if new_cost < best[neighbor.index()] {
                best[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Open { estimate: new_cost + heuristic(neighbor), cost: new_cost, node: neighbor });
            }
        }
    }

    tracing::trace!(%from, %to, "goal unreachable, using closest area");
    fallback(graph, &prev_edge, &best, from, closest.1).ok_or(NavError::NoRoute { from, to })
}

/// Partial route to the closest explored area, unless that is the start.
fn fallback(
    graph: &NavGraph,
    prev_edge: &[EdgeId],
    best: &[f32],
    from: NodeId,
    closest: NodeId,
) -> Option<Route> {
    if closest == from {
        return None;
    }
    Some(reconstruct(graph, prev_edge, closest, best[closest.index()], false))
}

fn reconstruct(
    graph: &NavGraph,
    prev_edge: &[EdgeId],
    to: NodeId,
    cost: f32,
    reached_goal: bool,
) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(cur);
    nodes.extend(edges.iter().map(|e| graph.edge_to[e.index()]));

    Route { nodes, edges, cost, reached_goal }
}
