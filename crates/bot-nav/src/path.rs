//! Followable paths built from routes.
//!
//! A [`Path`] turns a [`Route`] (a list of areas and edges) into concrete
//! world positions a body can steer toward.  Waypoints sit on the portal
//! between consecutive areas; edge kinds that need special handling leave a
//! marker on the waypoint that ends them:
//!
//! | Edge kind | Waypoints emitted                                             |
//! |-----------|---------------------------------------------------------------|
//! | walk      | portal point, in the destination area                         |
//! | jump      | portal point at the destination floor, marked `Jump`           |
//! | drop      | ledge point in the source area, then a landing point marked `Drop` |
//! | ladder    | approach point in front of the ladder, then the exit point marked `Ladder` |
//!
//! Consecutive waypoints are always either in the same area or joined by an
//! edge whose kind matches the marker; [`Path::is_connected`] checks this.

use bot_core::geo::closest_point_on_segment;
use bot_core::{LinkId, NodeId, Vec3};

use crate::graph::{EdgeKind, NavGraph};
use crate::router::Route;
use crate::{NavError, NavResult};

/// Distance in front of a ladder face where the approach waypoint sits.
const LADDER_STANDOFF: f32 = 0.6;

/// How far past a ledge the landing waypoint is placed.
const DROP_LANDING_OFFSET: f32 = 0.5;

/// Direction of a ladder traversal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LadderMode {
    Ascend,
    Descend,
}

/// How the segment ending at a waypoint is traversed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Traversal {
    #[default]
    Walk,
    Drop,
    Jump,
    Ladder { link: LinkId, mode: LadderMode },
}

impl Traversal {
    pub fn ladder(&self) -> Option<(LinkId, LadderMode)> {
        match *self {
            Traversal::Ladder { link, mode } => Some((link, mode)),
            _ => None,
        }
    }

    fn matches(&self, kind: EdgeKind) -> bool {
        match (*self, kind) {
            (Traversal::Walk, EdgeKind::Walk) => true,
            (Traversal::Drop, EdgeKind::Drop) => true,
            (Traversal::Jump, EdgeKind::Jump) => true,
            (Traversal::Ladder { link, .. }, EdgeKind::Ladder(l)) => link == l,
            _ => false,
        }
    }
}

/// One step of a path.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    /// The area the waypoint lies in.
    pub node: NodeId,
    pub pos: Vec3,
    /// How the segment from the previous waypoint to this one is traversed.
    pub how: Traversal,
}

/// An ordered list of waypoints with a monotone cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    waypoints: Vec<Waypoint>,
    cursor:    usize,
    goal:      Vec3,
    complete:  bool,
}

impl Path {
    /// Build a path along `route`, starting at `start` and ending at `goal`.
    ///
    /// When the route did not reach the goal area, the path ends at the
    /// center of its last area and [`is_complete`](Self::is_complete)
    /// reports `false`.
    pub fn build(graph: &NavGraph, route: &Route, start: Vec3, goal: Vec3) -> NavResult<Path> {
        let first = *route.nodes.first().ok_or(NavError::EmptyRoute)?;
        let last = *route.nodes.last().ok_or(NavError::EmptyRoute)?;

        let mut waypoints = vec![Waypoint { node: first, pos: start, how: Traversal::Walk }];

        for &edge in &route.edges {
            let from = graph.edge_from[edge.index()];
            let to   = graph.edge_to[edge.index()];
            let prev = waypoints[waypoints.len() - 1].pos;

            match graph.edge_kind[edge.index()] {
                kind @ (EdgeKind::Walk | EdgeKind::Jump) => {
                    let (p0, p1) = graph.edge_portal[edge.index()];
                    let mut pos = closest_point_on_segment(p0, p1, prev);
                    pos.z = graph.node_z[to.index()];
                    let how = if kind == EdgeKind::Jump { Traversal::Jump } else { Traversal::Walk };
                    waypoints.push(Waypoint { node: to, pos, how });
                }
                EdgeKind::Drop => {
                    let (p0, p1) = graph.edge_portal[edge.index()];
                    let ledge = closest_point_on_segment(p0, p1, prev);
                    let out = (graph.node_center(to) - graph.node_center(from))
                        .with_z(0.0)
                        .normalize_or_zero();
                    let landing = graph.clamp_into(to, ledge + out * DROP_LANDING_OFFSET);
                    waypoints.push(Waypoint { node: from, pos: graph.clamp_into(from, ledge), how: Traversal::Walk });
                    waypoints.push(Waypoint { node: to, pos: landing, how: Traversal::Drop });
                }
                EdgeKind::Ladder(link) => {
                    let ladder = graph.ladder(link).ok_or(NavError::NoRoute { from, to })?;
                    let (mode, entry, exit) = if from == ladder.bottom_node {
                        (LadderMode::Ascend, ladder.bottom, ladder.top)
                    } else {
                        (LadderMode::Descend, ladder.top, ladder.bottom)
                    };
                    // Descending climbers approach from the ladder's back side
                    // at the top, i.e. the opposite of the face normal.
                    let standoff = match mode {
                        LadderMode::Ascend  => ladder.normal * LADDER_STANDOFF,
                        LadderMode::Descend => -ladder.normal * LADDER_STANDOFF,
                    };
                    let approach = graph.clamp_into(from, entry + standoff);
                    let exit = graph.clamp_into(to, exit);
                    waypoints.push(Waypoint { node: from, pos: approach, how: Traversal::Walk });
                    waypoints.push(Waypoint { node: to, pos: exit, how: Traversal::Ladder { link, mode } });
                }
            }
        }

        let end = if route.reached_goal {
            graph.clamp_into(last, goal)
        } else {
            graph.node_center(last)
        };
        waypoints.push(Waypoint { node: last, pos: end, how: Traversal::Walk });

        Ok(Path { waypoints, cursor: 0, goal, complete: route.reached_goal })
    }

    /// Wrap an already-built waypoint list.  The last waypoint is treated
    /// as the goal being reached.
    pub fn from_waypoints(waypoints: Vec<Waypoint>, goal: Vec3) -> Path {
        Path { waypoints, cursor: 0, goal, complete: true }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Requested goal (which may lie outside the graph).
    pub fn goal(&self) -> Vec3 {
        self.goal
    }

    /// `true` if the path ends at the requested goal rather than the closest
    /// reachable area.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Index of the waypoint currently being approached.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.cursor)
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn last(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    /// End position of the path.
    pub fn endpoint(&self) -> Option<Vec3> {
        self.waypoints.last().map(|w| w.pos)
    }

    /// Move the cursor to the next waypoint.  Never moves backward and never
    /// passes the end.
    pub fn advance(&mut self) {
        if self.cursor < self.waypoints.len() {
            self.cursor += 1;
        }
    }

    /// Move the cursor forward to `index` if it is ahead.
    pub fn advance_to(&mut self, index: usize) {
        self.cursor = self.cursor.max(index.min(self.waypoints.len()));
    }

    /// `true` once every waypoint has been reached.
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.waypoints.len()
    }

    /// `true` if any waypoint not yet reached lies in `node`.
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.waypoints[self.cursor.min(self.waypoints.len())..]
            .iter()
            .any(|w| w.node == node)
    }

    /// Travel distance from `pos` through the remaining waypoints.
    pub fn remaining_length(&self, pos: Vec3) -> f32 {
        let mut total = 0.0;
        let mut prev = pos;
        for w in self.waypoints.iter().skip(self.cursor) {
            total += prev.distance(w.pos);
            prev = w.pos;
        }
        total
    }

    /// Check that every consecutive pair of waypoints is in the same area or
    /// joined by an edge whose kind matches the later waypoint's marker.
    pub fn is_connected(&self, graph: &NavGraph) -> bool {
        self.waypoints.windows(2).all(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            if let Some((link, mode)) = b.how.ladder() {
                let Some(ladder) = graph.ladder(link) else { return false };
                let direction_ok = match mode {
                    LadderMode::Ascend  => a.node == ladder.bottom_node && b.node == ladder.top_node,
                    LadderMode::Descend => a.node == ladder.top_node && b.node == ladder.bottom_node,
                };
                return direction_ok && graph.find_edge(a.node, b.node, |k| b.how.matches(k)).is_some();
            }
            if a.node == b.node {
                return true;
            }
            graph.find_edge(a.node, b.node, |k| b.how.matches(k)).is_some()
        })
    }
}
