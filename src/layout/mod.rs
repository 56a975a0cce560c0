// Mind map layouter.
//
// Goals:
// - Deterministic: no randomness, no dependence on hash iteration order
// - Pure: reads a snapshot, returns positions, never touches its input
// - Root is the one fixed point: it stays exactly on the anchor
// - Rank = depth: every level sits `level_spacing` further along the flow axis
// - Children of a node form one group, stacked symmetrically around the node
// - Groups sharing a rank keep at least one `node_spacing` between them
//
// Submodules:
// - children: parent -> ordered children index built from the edge list
// - rank_index: reserved spans per rank, used for collision checks
// - placement: depth-first placement and conflict resolution
//
// Work happens in (rank, cross) coordinates; `Direction` maps them to (x, y).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tree::{DEFAULT_ANCHOR, Edge, Node, Point, ROOT_ID};

mod children;
mod placement;
mod rank_index;

use children::ChildIndex;
use placement::Placement;

/// Flow direction of parent -> child edges.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "LR")]
    LeftToRight,
    #[serde(rename = "TB")]
    TopToBottom,
}

impl Direction {
    /// Parse the short names used by hosts ("LR", "TB").
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "LR" => Some(Direction::LeftToRight),
            "TB" => Some(Direction::TopToBottom),
            _ => None,
        }
    }

    pub fn handles(self) -> Handles {
        match self {
            Direction::LeftToRight => Handles { target: Side::Left, source: Side::Right },
            Direction::TopToBottom => Handles { target: Side::Top, source: Side::Bottom },
        }
    }

    /// (x, y) -> (rank, cross)
    fn to_axes(self, p: Point) -> (f64, f64) {
        match self {
            Direction::LeftToRight => (p.x, p.y),
            Direction::TopToBottom => (p.y, p.x),
        }
    }

    /// (rank, cross) -> (x, y)
    fn to_point(self, rank: f64, cross: f64) -> Point {
        match self {
            Direction::LeftToRight => Point { x: rank, y: cross },
            Direction::TopToBottom => Point { x: cross, y: rank },
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// Which side of a node incoming edges attach to, and which side outgoing
/// edges leave from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handles {
    pub target: Side,
    pub source: Side,
}

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Distance between consecutive ranks along the flow axis.
    pub level_spacing: f64,
    /// Slot size of one node across the flow axis, and the minimum gap
    /// between two groups on the same rank.
    pub node_spacing: f64,
    /// Ranks closer than this are treated as the same rank.
    pub rank_tolerance: f64,
    /// Anchor used when the root has no known position.
    pub default_anchor: Point,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            level_spacing: 400.0,
            node_spacing: 150.0,
            rank_tolerance: 10.0,
            default_anchor: DEFAULT_ANCHOR,
        }
    }
}

impl LayoutConfig {
    /// Span reserved across the flow axis by a node with `child_count` children.
    /// A node without children still reserves one slot.
    pub fn group_height(&self, child_count: usize) -> f64 {
        child_count.max(1) as f64 * self.node_spacing
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    /// Position of every input node, keyed by id.
    pub positions: HashMap<String, Point>,
    pub handles: Handles,
}

/// Lay out a rooted tree.
///
/// The root (id `"root"`) is pinned to `anchor`; every other node is placed
/// relative to it. Edges are only read, never changed.
///
/// # Panics
///
/// If the input is not a tree rooted at `"root"`: a missing root, an edge to
/// an unknown node, a cycle, or a node the root cannot reach. The tree store
/// never produces such input.
pub fn layout_tree(
    nodes: &[Node],
    edges: &[Edge],
    anchor: Point,
    direction: Direction,
    cfg: &LayoutConfig,
) -> LayoutResult {
    assert!(
        nodes.iter().any(Node::is_root),
        "layout input has no '{ROOT_ID}' node"
    );
    let index = ChildIndex::from_edges(nodes, edges);
    let (rank, cross) = direction.to_axes(anchor);

    let mut placement = Placement::new(cfg, &index);
    placement.place_root(rank, cross);

    let placed = placement.finish();
    assert_eq!(
        placed.len(),
        nodes.len(),
        "layout input has nodes the root cannot reach"
    );

    let positions = placed
        .into_iter()
        .map(|(id, (rank, cross))| (id.to_string(), direction.to_point(rank, cross)))
        .collect();

    LayoutResult { positions, handles: direction.handles() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeStore;
    use proptest::prelude::*;

    fn run(store: &TreeStore, direction: Direction) -> LayoutResult {
        layout_tree(
            store.nodes(),
            store.edges(),
            store.root_position(),
            direction,
            &LayoutConfig::default(),
        )
    }

    /// Build a store from a list of parent picks: entry `k` attaches node `k+1`
    /// under an already existing node.
    fn build(picks: &[usize]) -> TreeStore {
        let mut store = TreeStore::new();
        let mut ids = vec![ROOT_ID.to_string()];
        for &p in picks {
            let parent = ids[p % ids.len()].clone();
            ids.push(store.add_child(&parent, "n").unwrap());
        }
        store
    }

    /// (rank, center, half height) of every group of siblings.
    fn groups(store: &TreeStore, result: &LayoutResult, cfg: &LayoutConfig) -> Vec<(f64, f64, f64)> {
        store
            .nodes()
            .iter()
            .filter_map(|n| {
                let kids = store.children(&n.id);
                let first = result.positions.get(kids.first()?)?;
                let last = result.positions.get(kids.last()?)?;
                let center = (first.y + last.y) / 2.0;
                Some((first.x, center, cfg.group_height(kids.len()) / 2.0))
            })
            .collect()
    }

    #[test]
    fn test_two_children_symmetric_about_root() {
        let mut store = TreeStore::new();
        let a = store.add_child(ROOT_ID, "A").unwrap();
        let b = store.add_child(ROOT_ID, "B").unwrap();
        let result = run(&store, Direction::LeftToRight);

        assert_eq!(result.positions[ROOT_ID], Point::new(250.0, 200.0));
        assert_eq!(result.positions[&a], Point::new(650.0, 125.0));
        assert_eq!(result.positions[&b], Point::new(650.0, 275.0));

        store.delete_subtree(&a).unwrap();
        let result = run(&store, Direction::LeftToRight);
        assert_eq!(result.positions[&b], Point::new(650.0, 200.0));
        assert_eq!(result.positions.len(), 2);
    }

    #[test]
    fn test_top_to_bottom_transposes() {
        let mut store = TreeStore::new();
        let a = store.add_child(ROOT_ID, "A").unwrap();
        let b = store.add_child(ROOT_ID, "B").unwrap();
        let result = run(&store, Direction::TopToBottom);

        assert_eq!(result.positions[&a], Point::new(175.0, 600.0));
        assert_eq!(result.positions[&b], Point::new(325.0, 600.0));
        assert_eq!(result.handles, Handles { target: Side::Top, source: Side::Bottom });
    }

    #[test]
    fn test_handles_follow_direction() {
        assert_eq!(
            Direction::LeftToRight.handles(),
            Handles { target: Side::Left, source: Side::Right }
        );
        assert_eq!(Direction::from_name("TB"), Some(Direction::TopToBottom));
        assert_eq!(Direction::from_name("diagonal"), None);
    }

    #[test]
    fn test_cousin_group_moves_below() {
        // root -> A, B; A -> A1, A2; B -> B1
        let mut store = TreeStore::new();
        let a = store.add_child(ROOT_ID, "A").unwrap();
        let b = store.add_child(ROOT_ID, "B").unwrap();
        let a1 = store.add_child(&a, "A1").unwrap();
        let a2 = store.add_child(&a, "A2").unwrap();
        let b1 = store.add_child(&b, "B1").unwrap();
        let result = run(&store, Direction::LeftToRight);

        assert_eq!(result.positions[&a1], Point::new(1050.0, 50.0));
        assert_eq!(result.positions[&a2], Point::new(1050.0, 200.0));
        // B's group [200, 350] would touch A's [-25, 275]; below wins (500 vs -250).
        assert_eq!(result.positions[&b1], Point::new(1050.0, 500.0));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let store = build(&[0, 0, 1, 1, 2]);
        let before = store.clone();
        let _ = run(&store, Direction::LeftToRight);
        assert_eq!(before.nodes(), store.nodes());
        assert_eq!(before.edges(), store.edges());
    }

    #[test]
    #[should_panic]
    fn test_unknown_edge_endpoint_panics() {
        let store = TreeStore::new();
        let edges = vec![Edge::between(ROOT_ID, "ghost")];
        layout_tree(
            store.nodes(),
            &edges,
            store.root_position(),
            Direction::LeftToRight,
            &LayoutConfig::default(),
        );
    }

    #[test]
    fn test_group_height_reserves_one_slot_for_leaves() {
        let cfg = LayoutConfig::default();
        assert_eq!(cfg.group_height(0), 150.0);
        assert_eq!(cfg.group_height(1), 150.0);
        assert_eq!(cfg.group_height(3), 450.0);
    }

    proptest! {
        #[test]
        fn layout_properties_hold(picks in proptest::collection::vec(any::<usize>(), 0..40)) {
            let cfg = LayoutConfig::default();
            let mut store = build(&picks);
            let result = run(&store, Direction::LeftToRight);

            // Every node placed, root on the anchor.
            prop_assert_eq!(result.positions.len(), store.len());
            prop_assert_eq!(result.positions[ROOT_ID], store.root_position());

            // Ranks follow depth.
            for e in store.edges() {
                let p = result.positions[&e.source];
                let c = result.positions[&e.target];
                prop_assert_eq!(c.x, p.x + cfg.level_spacing);
            }

            // Groups on the same rank keep a full spacing unit apart.
            let gs = groups(&store, &result, &cfg);
            for (i, a) in gs.iter().enumerate() {
                for b in &gs[i + 1..] {
                    if (a.0 - b.0).abs() > cfg.rank_tolerance {
                        continue;
                    }
                    let gap = (a.1 - b.1).abs() - a.2 - b.2;
                    prop_assert!(gap >= cfg.node_spacing - 1e-6, "gap {} between {:?} and {:?}", gap, a, b);
                }
            }

            // Distinct nodes never share a slot.
            let ps: Vec<Point> = store.nodes().iter().map(|n| result.positions[&n.id]).collect();
            for (i, a) in ps.iter().enumerate() {
                for b in &ps[i + 1..] {
                    if a.x == b.x {
                        prop_assert!((a.y - b.y).abs() >= cfg.node_spacing - 1e-6);
                    }
                }
            }

            // Fixed point: committing the result and laying out again moves nothing.
            store.apply_positions(&result.positions);
            let again = run(&store, Direction::LeftToRight);
            prop_assert_eq!(again, result);
        }
    }
}
