// Depth-first placement with collision resolution.
//
// Pre-order from the root. For every node with children:
// 1. The children form one group, centered on the node's reference coordinate
// 2. The group is checked against groups already placed on the same rank
// 3. On conflict it moves above the topmost or below the bottommost group,
//    whichever is closer to where it wanted to be (ties go to the top)
// 4. Children are stacked inside the group, one slot each
// 5. A child displaced by more than one slot becomes the reference for its own
//    children; otherwise its preferred coordinate stays the reference

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::LayoutConfig;
use super::children::ChildIndex;
use super::rank_index::{RankIndex, Span};
use crate::tree::ROOT_ID;

/// Working context of one layout pass. Created fresh per call.
pub struct Placement<'a, 'c> {
    cfg: &'c LayoutConfig,
    children: &'c ChildIndex<'a>,
    ranks: RankIndex,
    /// Node id -> (rank, cross).
    placed: HashMap<&'a str, (f64, f64)>,
    visited: HashSet<&'a str>,
}

impl<'a, 'c> Placement<'a, 'c> {
    pub fn new(cfg: &'c LayoutConfig, children: &'c ChildIndex<'a>) -> Self {
        Self {
            cfg,
            children,
            ranks: RankIndex::new(cfg.rank_tolerance),
            placed: HashMap::new(),
            visited: HashSet::new(),
        }
    }

    /// Pin the root and place everything below it.
    pub fn place_root(&mut self, rank: f64, cross: f64) {
        self.placed.insert(ROOT_ID, (rank, cross));
        self.visited.insert(ROOT_ID);
        self.place_children(ROOT_ID, rank, cross);
    }

    pub fn finish(self) -> HashMap<&'a str, (f64, f64)> {
        self.placed
    }

    /// Depth-first over an explicit work stack of (parent, rank, reference)
    /// frames, so tree depth is bounded by heap rather than call stack.
    /// Frames are pushed in reverse child order, which resolves groups in the
    /// same pre-order a recursive walk would.
    fn place_children(&mut self, root: &'a str, rank: f64, reference: f64) {
        let children = self.children;
        let spacing = self.cfg.node_spacing;
        let mut stack = vec![(root, rank, reference)];

        while let Some((parent, rank, reference)) = stack.pop() {
            let kids = children.of(parent);
            if kids.is_empty() {
                continue;
            }

            let child_rank = rank + self.cfg.level_spacing;
            let height = self.cfg.group_height(kids.len());
            let center = self.resolve(child_rank, reference, height);
            self.ranks.insert(child_rank, Span::new(center, height));

            let first_offset = -((kids.len() - 1) as f64) * spacing / 2.0;
            let base = stack.len();
            for (i, &kid) in kids.iter().enumerate() {
                assert!(self.visited.insert(kid), "layout input has a cycle through '{kid}'");

                let offset = first_offset + i as f64 * spacing;
                let preferred = reference + offset;
                let resolved = center + offset;
                self.placed.insert(kid, (child_rank, resolved));

                let next_reference = if (resolved - preferred).abs() > spacing {
                    resolved
                } else {
                    preferred
                };
                stack.push((kid, child_rank, next_reference));
            }
            stack[base..].reverse();
        }
    }

    /// Center for a group of `height` at `rank` that wants to sit at `preferred`.
    fn resolve(&self, rank: f64, preferred: f64, height: f64) -> f64 {
        let spacing = self.cfg.node_spacing;
        let span = Span::new(preferred, height);
        if !self.ranks.collides(rank, &span, spacing) {
            return preferred;
        }
        let Some((top, bottom)) = self.ranks.extent(rank) else {
            return preferred;
        };

        let above = top - spacing - span.half;
        let below = bottom + spacing + span.half;
        let chosen = if (below - preferred).abs() < (above - preferred).abs() {
            below
        } else {
            above
        };
        debug!(rank, preferred, chosen, "group moved to avoid overlap");
        chosen
    }
}
