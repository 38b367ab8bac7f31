//! Navigation graph representation and builder.
//!
//! # Data layout
//!
//! Each node is an axis-aligned walkable **area**: a rectangle in the ground
//! plane (`node_min` .. `node_max`) at floor height `node_z`.  Outgoing edges
//! use **Compressed Sparse Row (CSR)** format; given a `NodeId n` its
//! outgoing edges occupy the contiguous slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Each edge carries its traversal kind (walk, drop, jump, ladder), a cost
//! length, and the **portal** segment shared by the two areas, which path
//! construction uses to place waypoints on area boundaries.
//!
//! Precomputed node-to-node visibility is stored the same way
//! (`node_vis_start` / `node_vis`, sorted per node for binary search).
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) holds each area's flat 3-D box.  It answers both
//! "which area am I standing in" (envelope intersection below a point) and
//! "which area is nearest" (point distance to box).

use bitflags::bitflags;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use bot_core::{EdgeId, LinkId, NodeId, Vec2, Vec3};

/// Highest ledge an agent can walk up without jumping.
pub const STEP_HEIGHT: f32 = 0.45;

/// Highest ledge an agent can reach with a jump.
pub const JUMP_HEIGHT: f32 = 1.1;

/// How far below a position `find_node` looks for a floor.
const FLOOR_SEARCH_DEPTH: f32 = 100.0;

bitflags! {
    /// Per-area movement attributes.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct NodeFlags: u8 {
        /// Low ceiling: agents must crouch to pass.
        const CROUCH  = 0b0000_0001;
        /// Agents must jump to enter.
        const JUMP    = 0b0000_0010;
        /// Never jump here (e.g. under a low beam).
        const NO_JUMP = 0b0000_0100;
        /// Narrow area: disable look-ahead smoothing and feelers.
        const PRECISE = 0b0000_1000;
    }
}

bitflags! {
    /// Hiding-spot attributes.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SpotFlags: u8 {
        const IN_COVER    = 0b0000_0001;
        const GOOD_SNIPER = 0b0000_0010;
        const EXPOSED     = 0b0000_0100;
    }
}

/// How an edge is traversed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeKind {
    /// Level (within step height) walking.
    Walk,
    /// Walking off a ledge to a lower area.
    Drop,
    /// Jumping up to a higher area.
    Jump,
    /// Climbing a ladder.
    Ladder(LinkId),
}

/// A vertical-traversal link between two areas.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LadderLink {
    /// Foot of the ladder, on the bottom area's floor.
    pub bottom: Vec3,
    /// Top of the ladder, on the top area's floor.
    pub top: Vec3,
    pub bottom_node: NodeId,
    pub top_node: NodeId,
    /// Horizontal unit vector pointing out of the ladder face, toward a
    /// climber standing in front of it.
    pub normal: Vec3,
    pub width: f32,
}

impl LadderLink {
    /// Vertical extent of the ladder.
    #[inline]
    pub fn length(&self) -> f32 {
        (self.top.z - self.bottom.z).abs()
    }

    /// Yaw a climber faces while on the ladder (into the ladder face).
    #[inline]
    pub fn climb_yaw(&self) -> f32 {
        (-self.normal.y).atan2(-self.normal.x).to_degrees()
    }
}

/// A precomputed concealment position.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HidingSpot {
    pub pos: Vec3,
    pub node: NodeId,
    pub flags: SpotFlags,
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree: an area's flat box with its `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    min: [f32; 3],
    max: [f32; 3],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance from the point to the area box.
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let mut d2 = 0.0;
        for axis in 0..3 {
            let c = point[axis].clamp(self.min[axis], self.max[axis]);
            let d = point[axis] - c;
            d2 += d * d;
        }
        d2
    }
}

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// Navigation graph: area nodes, CSR edges, ladders, hiding spots, and a
/// spatial index.
///
/// All fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`NavGraphBuilder`].
pub struct NavGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Ground-plane lower corner of each area.  Indexed by `NodeId`.
    pub node_min: Vec<Vec2>,
    /// Ground-plane upper corner of each area.
    pub node_max: Vec<Vec2>,
    /// Floor height of each area.
    pub node_z: Vec<f32>,
    pub node_flags: Vec<NodeFlags>,
    /// Static danger estimate (e.g. historical deaths), used by
    /// `RouteMode::Safest`.
    pub node_danger: Vec<f32>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,
    pub edge_kind: Vec<EdgeKind>,
    /// Travel length in world units (center → portal → center).
    pub edge_length: Vec<f32>,
    /// Portal segment on the shared boundary, at the source floor height.
    pub edge_portal: Vec<(Vec3, Vec3)>,

    // ── Links, spots, visibility ──────────────────────────────────────────
    pub ladders: Vec<LadderLink>,
    pub spots: Vec<HidingSpot>,
    pub node_vis_start: Vec<u32>,
    pub node_vis: Vec<NodeId>,

    spatial_idx: RTree<NodeEntry>,
}

impl NavGraph {
    /// Construct an empty graph.  Every query against it fails softly.
    pub fn empty() -> Self {
        NavGraphBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_z.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_z.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Iterator over the areas directly reachable from `node`.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.out_edges(node).map(|e| self.edge_to[e.index()])
    }

    /// First edge `from → to` satisfying `pred`, if any.
    pub fn find_edge(&self, from: NodeId, to: NodeId, pred: impl Fn(EdgeKind) -> bool) -> Option<EdgeId> {
        if !self.contains(from) {
            return None;
        }
        self.out_edges(from)
            .find(|e| self.edge_to[e.index()] == to && pred(self.edge_kind[e.index()]))
    }

    /// Any edge `from → to`.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.find_edge(from, to, |_| true)
    }

    #[inline]
    pub fn ladder(&self, link: LinkId) -> Option<&LadderLink> {
        self.ladders.get(link.index())
    }

    // ── Area geometry ─────────────────────────────────────────────────────

    /// Center of an area, on its floor.
    #[inline]
    pub fn node_center(&self, node: NodeId) -> Vec3 {
        let c = (self.node_min[node.index()] + self.node_max[node.index()]) * 0.5;
        Vec3::new(c.x, c.y, self.node_z[node.index()])
    }

    /// `true` if `pos` lies over the area's footprint (height ignored).
    #[inline]
    pub fn covers_xy(&self, node: NodeId, pos: Vec3) -> bool {
        let (min, max) = (self.node_min[node.index()], self.node_max[node.index()]);
        pos.x >= min.x && pos.x <= max.x && pos.y >= min.y && pos.y <= max.y
    }

    /// Project `pos` onto the area: clamp into its footprint, snap to floor.
    pub fn clamp_into(&self, node: NodeId, pos: Vec3) -> Vec3 {
        let (min, max) = (self.node_min[node.index()], self.node_max[node.index()]);
        Vec3::new(
            pos.x.clamp(min.x, max.x),
            pos.y.clamp(min.y, max.y),
            self.node_z[node.index()],
        )
    }

    #[inline]
    pub fn flags(&self, node: NodeId) -> NodeFlags {
        self.node_flags[node.index()]
    }

    #[inline]
    pub fn danger(&self, node: NodeId) -> f32 {
        self.node_danger[node.index()]
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The area `pos` is standing in: the highest floor under `pos` that is
    /// no more than a step above it.  `None` if `pos` is over no area.
    pub fn find_node(&self, pos: Vec3) -> Option<NodeId> {
        let probe = AABB::from_corners(
            [pos.x, pos.y, pos.z - FLOOR_SEARCH_DEPTH],
            [pos.x, pos.y, pos.z + STEP_HEIGHT],
        );
        self.spatial_idx
            .locate_in_envelope_intersecting(&probe)
            .max_by(|a, b| a.min[2].total_cmp(&b.min[2]).then(b.id.cmp(&a.id)))
            .map(|e| e.id)
    }

    /// The area whose box is closest to `pos`.  `None` only for an empty graph.
    pub fn nearest_node(&self, pos: Vec3) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y, pos.z])
            .map(|e| e.id)
    }

    /// `find_node`, falling back to the nearest area.
    pub fn node_at_or_nearest(&self, pos: Vec3) -> Option<NodeId> {
        self.find_node(pos).or_else(|| self.nearest_node(pos))
    }

    /// Floor height under `pos`, if it is over an area.
    pub fn ground_height(&self, pos: Vec3) -> Option<f32> {
        self.find_node(pos).map(|n| self.node_z[n.index()])
    }

    // ── Visibility ────────────────────────────────────────────────────────

    /// Precomputed potential visibility between two areas.  An area always
    /// sees itself.
    pub fn is_visible(&self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return true;
        }
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        let start = self.node_vis_start[a.index()] as usize;
        let end   = self.node_vis_start[a.index() + 1] as usize;
        self.node_vis[start..end].binary_search(&b).is_ok()
    }

    /// Hiding spots located in `node`.
    pub fn spots_in(&self, node: NodeId) -> impl Iterator<Item = &HidingSpot> + '_ {
        self.spots.iter().filter(move |s| s.node == node)
    }
}

// ── NavGraphBuilder ───────────────────────────────────────────────────────────

/// Construct a [`NavGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use bot_core::{Vec2, Vec3};
/// use bot_nav::{NavGraphBuilder, NodeFlags};
///
/// let mut b = NavGraphBuilder::new();
/// let a = b.add_node(Vec2::new(0.0, 0.0), Vec2::new(4.0, 4.0), 0.0, NodeFlags::empty());
/// let c = b.add_node(Vec2::new(4.0, 0.0), Vec2::new(8.0, 4.0), 0.0, NodeFlags::empty());
/// b.connect_both(a, c);
/// let nav = b.build();
/// assert_eq!(nav.node_count(), 2);
/// assert_eq!(nav.edge_count(), 2);
/// assert_eq!(nav.find_node(Vec3::new(6.0, 1.0, 0.0)), Some(c));
/// ```
pub struct NavGraphBuilder {
    nodes:     Vec<RawNode>,
    raw_edges: Vec<RawEdge>,
    ladders:   Vec<LadderLink>,
    spots:     Vec<HidingSpot>,
    vis:       Vec<(NodeId, NodeId)>,
}

struct RawNode {
    min:    Vec2,
    max:    Vec2,
    z:      f32,
    flags:  NodeFlags,
    danger: f32,
}

struct RawEdge {
    from: NodeId,
    to:   NodeId,
    kind: EdgeKind,
}

impl NavGraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes:     Vec::new(),
            raw_edges: Vec::new(),
            ladders:   Vec::new(),
            spots:     Vec::new(),
            vis:       Vec::new(),
        }
    }

    /// Add a walkable area and return its `NodeId` (sequential from 0).
    ///
    /// Corners are normalized, so they may be given in any order.
    pub fn add_node(&mut self, a: Vec2, b: Vec2, z: f32, flags: NodeFlags) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(RawNode { min: a.min(b), max: a.max(b), z, flags, danger: 0.0 });
        id
    }

    pub fn set_danger(&mut self, node: NodeId, danger: f32) {
        self.nodes[node.index()].danger = danger;
    }

    /// Add a **directed** edge with an explicit traversal kind.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, kind: EdgeKind) {
        self.raw_edges.push(RawEdge { from, to, kind });
    }

    /// Add the edge `from → to`, inferring its kind from the floor heights.
    ///
    /// Returns `false` (and adds nothing) when `to` is too high to reach.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> bool {
        let rise = self.nodes[to.index()].z - self.nodes[from.index()].z;
        let kind = if rise.abs() <= STEP_HEIGHT {
            EdgeKind::Walk
        } else if rise < 0.0 {
            EdgeKind::Drop
        } else if rise <= JUMP_HEIGHT && !self.nodes[to.index()].flags.contains(NodeFlags::NO_JUMP) {
            EdgeKind::Jump
        } else {
            return false;
        };
        self.add_directed_edge(from, to, kind);
        true
    }

    /// Convenience: connect in both directions where physically possible.
    pub fn connect_both(&mut self, a: NodeId, b: NodeId) {
        self.connect(a, b);
        self.connect(b, a);
    }

    /// Add a ladder between two areas; inserts ladder edges both ways.
    pub fn add_ladder(
        &mut self,
        bottom_node: NodeId,
        top_node:    NodeId,
        bottom:      Vec3,
        top:         Vec3,
        normal:      Vec3,
        width:       f32,
    ) -> LinkId {
        let id = LinkId(self.ladders.len() as u32);
        let normal = Vec3::new(normal.x, normal.y, 0.0).normalize_or_zero();
        self.ladders.push(LadderLink { bottom, top, bottom_node, top_node, normal, width });
        self.add_directed_edge(bottom_node, top_node, EdgeKind::Ladder(id));
        self.add_directed_edge(top_node, bottom_node, EdgeKind::Ladder(id));
        id
    }

    /// Register a hiding spot inside `node`.  The position is snapped onto
    /// the area floor.
    pub fn add_hiding_spot(&mut self, node: NodeId, pos: Vec3, flags: SpotFlags) {
        let n = &self.nodes[node.index()];
        let pos = Vec3::new(pos.x.clamp(n.min.x, n.max.x), pos.y.clamp(n.min.y, n.max.y), n.z);
        self.spots.push(HidingSpot { pos, node, flags });
    }

    /// Mark two areas as potentially visible from one another.
    pub fn set_visible(&mut self, a: NodeId, b: NodeId) {
        self.vis.push((a, b));
        self.vis.push((b, a));
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`NavGraph`].
    pub fn build(self) -> NavGraph {
        let node_count = self.nodes.len();

        let node_min:    Vec<Vec2>      = self.nodes.iter().map(|n| n.min).collect();
        let node_max:    Vec<Vec2>      = self.nodes.iter().map(|n| n.max).collect();
        let node_z:      Vec<f32>       = self.nodes.iter().map(|n| n.z).collect();
        let node_flags:  Vec<NodeFlags> = self.nodes.iter().map(|n| n.flags).collect();
        let node_danger: Vec<f32>       = self.nodes.iter().map(|n| n.danger).collect();

        // Stable sort keeps insertion order among a node's edges, which keeps
        // routing tie-breaks deterministic.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let mut edge_portal = Vec::with_capacity(raw.len());
        let mut edge_length = Vec::with_capacity(raw.len());
        for e in &raw {
            let (portal, length) = match e.kind {
                EdgeKind::Ladder(link) => {
                    let l = &self.ladders[link.index()];
                    let (entry, exit) = if e.from == l.bottom_node { (l.bottom, l.top) } else { (l.top, l.bottom) };
                    let from_c = center_of(&self.nodes[e.from.index()]);
                    let to_c = center_of(&self.nodes[e.to.index()]);
                    let len = from_c.distance(entry) + l.length() + exit.distance(to_c);
                    ((entry, entry), len)
                }
                _ => {
                    let a = &self.nodes[e.from.index()];
                    let b = &self.nodes[e.to.index()];
                    let (p0, p1) = portal_between(a, b);
                    let mid = (p0 + p1) * 0.5;
                    let len = center_of(a).distance(mid) + mid.distance(center_of(b));
                    ((p0, p1), len)
                }
            };
            edge_portal.push(portal);
            edge_length.push(length);
        }

        let edge_from: Vec<NodeId>   = raw.iter().map(|e| e.from).collect();
        let edge_to:   Vec<NodeId>   = raw.iter().map(|e| e.to).collect();
        let edge_kind: Vec<EdgeKind> = raw.iter().map(|e| e.kind).collect();

        let node_out_start = csr_offsets(node_count, raw.iter().map(|e| e.from));

        let mut vis = self.vis;
        vis.sort_unstable();
        vis.dedup();
        let node_vis_start = csr_offsets(node_count, vis.iter().map(|&(a, _)| a));
        let node_vis: Vec<NodeId> = vis.into_iter().map(|(_, b)| b).collect();

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| NodeEntry {
                min: [n.min.x, n.min.y, n.z],
                max: [n.max.x, n.max.y, n.z],
                id:  NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        NavGraph {
            node_min,
            node_max,
            node_z,
            node_flags,
            node_danger,
            node_out_start,
            edge_from,
            edge_to,
            edge_kind,
            edge_length,
            edge_portal,
            ladders: self.ladders,
            spots: self.spots,
            node_vis_start,
            node_vis,
            spatial_idx,
        }
    }
}

impl Default for NavGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ── Build helpers ─────────────────────────────────────────────────────────────

/// CSR row pointer for `keys` (already sorted by node).
fn csr_offsets(node_count: usize, keys: impl Iterator<Item = NodeId>) -> Vec<u32> {
    let mut start = vec![0u32; node_count + 1];
    for k in keys {
        start[k.index() + 1] += 1;
    }
    for i in 1..=node_count {
        start[i] += start[i - 1];
    }
    start
}

fn center_of(n: &RawNode) -> Vec3 {
    let c = (n.min + n.max) * 0.5;
    Vec3::new(c.x, c.y, n.z)
}

/// Portal segment between two areas, at `a`'s floor height.
///
/// Per axis, overlapping extents give a span and disjoint extents collapse to
/// the middle of the gap.  If both axes overlap the longer span is kept; if
/// neither does the portal degenerates to the point between the corners.
fn portal_between(a: &RawNode, b: &RawNode) -> (Vec3, Vec3) {
    let x = axis_interval(a.min.x, a.max.x, b.min.x, b.max.x);
    let y = axis_interval(a.min.y, a.max.y, b.min.y, b.max.y);
    let (x, y) = match (x.1 - x.0 > 0.0, y.1 - y.0 > 0.0) {
        (true, true) if x.1 - x.0 >= y.1 - y.0 => (x, mid(y)),
        (true, true) => (mid(x), y),
        _ => (x, y),
    };
    (Vec3::new(x.0, y.0, a.z), Vec3::new(x.1, y.1, a.z))
}

fn axis_interval(a_lo: f32, a_hi: f32, b_lo: f32, b_hi: f32) -> (f32, f32) {
    let lo = a_lo.max(b_lo);
    let hi = a_hi.min(b_hi);
    if lo <= hi { (lo, hi) } else { let m = (lo + hi) * 0.5; (m, m) }
}

fn mid(i: (f32, f32)) -> (f32, f32) {
    let m = (i.0 + i.1) * 0.5;
    (m, m)
}
