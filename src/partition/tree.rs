use std::collections::HashMap;

use crate::foundation::core::{Rect, Role, rect};
use crate::foundation::error::{TessellaError, TessellaResult};
use crate::foundation::math::{self, PHI};

/// Stable identifier for a node inside one [`PartitionTree`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u64);

/// Recursive subdivision strategy.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SplitStrategy {
    /// Four equal quadrants.
    Quad,
    /// Binary split of the longer axis at the golden ratio point.
    Golden,
    /// N-way split of the dominant axis in normalized Fibonacci proportions.
    Fibonacci {
        /// Number of segments (first `segments` Fibonacci numbers).
        segments: usize,
    },
    /// N-way split of the dominant axis using caller-supplied weights.
    Custom,
}

#[derive(Clone, Debug)]
/// One node of the partition tree.
///
/// Ownership is a strict tree: children live inside their parent. The
/// invariant maintained by every split is that the children exactly tile the
/// parent rectangle, to within one rounding increment (the last child along
/// the split axis absorbs the rounding remainder).
pub struct PartitionNode {
    /// Tree-unique identifier.
    pub id: NodeId,
    /// The rectangle this node covers.
    pub rect: Rect,
    /// Depth from the root (root is 0).
    pub depth: u16,
    /// Strategy that produced this node's children, if it has been split.
    pub strategy: Option<SplitStrategy>,
    /// Optional role classification used by the scale resolver.
    pub role: Option<Role>,
    /// Relative content weight used for rebalance checks; always >= 0.
    /// Splits seed every child at the neutral 1.0.
    pub weight: f64,
    /// Child nodes tiling this node's rectangle.
    pub children: Vec<PartitionNode>,
}

impl PartitionNode {
    fn new(id: NodeId, rect: Rect, depth: u16, weight: f64) -> Self {
        Self {
            id,
            rect,
            depth,
            strategy: None,
            role: None,
            weight: weight.max(0.0),
            children: Vec::new(),
        }
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Recursive spatial partition of a root rectangle.
///
/// Node lookup is O(1) through a non-owning path index; the nodes themselves
/// are owned strictly by their parents.
#[derive(Clone, Debug)]
pub struct PartitionTree {
    root: PartitionNode,
    next_id: u64,
    round_increment: f64,
    index: HashMap<NodeId, Vec<usize>>,
}

impl PartitionTree {
    /// Create a tree covering `root_rect`, rounding splits to whole pixels.
    pub fn new(root_rect: Rect) -> Self {
        Self::with_increment(root_rect, 1.0)
    }

    /// Create a tree with an explicit rounding increment (e.g. `1.0 / dpr`).
    pub fn with_increment(root_rect: Rect, round_increment: f64) -> Self {
        let increment = if round_increment.is_finite() && round_increment > 0.0 {
            round_increment
        } else {
            1.0
        };
        let root = PartitionNode::new(NodeId(0), root_rect, 0, 1.0);
        let mut tree = Self {
            root,
            next_id: 1,
            round_increment: increment,
            index: HashMap::new(),
        };
        tree.reindex();
        tree
    }

    /// The root node.
    pub fn root(&self) -> &PartitionNode {
        &self.root
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&PartitionNode> {
        let path = self.index.get(&id)?;
        let mut node = &self.root;
        for &child_idx in path {
            node = node.children.get(child_idx)?;
        }
        Some(node)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut PartitionNode> {
        let path = self.index.get(&id)?.clone();
        let mut node = &mut self.root;
        for child_idx in path {
            node = node.children.get_mut(child_idx)?;
        }
        Some(node)
    }

    /// Split a node with the given strategy, replacing any existing children.
    ///
    /// `weights` is required for [`SplitStrategy::Custom`] (all weights must
    /// be non-negative and sum to a positive value) and ignored otherwise.
    /// Returns the new child ids in tiling order.
    pub fn split(
        &mut self,
        id: NodeId,
        strategy: SplitStrategy,
        weights: Option<&[f64]>,
    ) -> TessellaResult<Vec<NodeId>> {
        let increment = self.round_increment;
        let proportions = split_proportions(strategy, weights)?;
        let (parent_rect, depth) = {
            let node = self.node(id).ok_or_else(|| {
                TessellaError::target(format!("no partition node with id {}", id.0))
            })?;
            (node.rect, node.depth.saturating_add(1))
        };
        let child_rects = match strategy {
            SplitStrategy::Quad => quad_rects(parent_rect, increment),
            _ => axis_rects(parent_rect, &proportions, increment),
        };

        // Weights track content drift, not split geometry: every child starts
        // at the neutral 1.0 so a fresh split never reads as drifted. Callers
        // feed observed content weights through `set_weight`.
        let base_id = self.next_id;
        let mut ids = Vec::with_capacity(child_rects.len());
        let mut children = Vec::with_capacity(child_rects.len());
        for (i, child_rect) in child_rects.into_iter().enumerate() {
            let child_id = NodeId(base_id + i as u64);
            ids.push(child_id);
            children.push(PartitionNode::new(child_id, child_rect, depth, 1.0));
        }
        let node = self
            .node_mut(id)
            .ok_or_else(|| TessellaError::target(format!("no partition node with id {}", id.0)))?;
        node.children = children;
        node.strategy = Some(strategy);
        self.next_id += ids.len() as u64;
        self.reindex();
        Ok(ids)
    }

    /// Discard the whole subtree and regenerate it from the root bounds with
    /// a weighted custom split.
    ///
    /// Used when content weights drift past the rebalance threshold.
    pub fn rebuild(&mut self, weights: &[f64]) -> TessellaResult<Vec<NodeId>> {
        let root_rect = self.root.rect;
        let root_role = self.root.role;
        self.root = PartitionNode::new(NodeId(0), root_rect, 0, 1.0);
        self.root.role = root_role;
        self.next_id = 1;
        self.reindex();
        self.split(NodeId(0), SplitStrategy::Custom, Some(weights))
    }

    /// Whether the normalized weight spread between the lightest and heaviest
    /// leaf exceeds `threshold` (default callers pass 0.15).
    pub fn needs_rebalance(&self, threshold: f64) -> bool {
        let leaves = self.leaves();
        if leaves.len() < 2 {
            return false;
        }
        let sum: f64 = leaves.iter().map(|n| n.weight).sum();
        if sum <= 0.0 {
            return false;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for leaf in &leaves {
            let w = leaf.weight / sum;
            min = min.min(w);
            max = max.max(w);
        }
        max - min > threshold
    }

    /// Assign a role tag to a node.
    pub fn assign_role(&mut self, id: NodeId, role: Role) -> TessellaResult<()> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| TessellaError::target(format!("no partition node with id {}", id.0)))?;
        node.role = Some(role);
        Ok(())
    }

    /// Set a node's rebalance weight.
    pub fn set_weight(&mut self, id: NodeId, weight: f64) -> TessellaResult<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(TessellaError::validation("node weight must be finite and >= 0"));
        }
        let node = self
            .node_mut(id)
            .ok_or_else(|| TessellaError::target(format!("no partition node with id {}", id.0)))?;
        node.weight = weight;
        Ok(())
    }

    /// All leaves in depth-first tiling order.
    pub fn leaves(&self) -> Vec<&PartitionNode> {
        let mut out = Vec::new();
        collect_leaves(&self.root, &mut out);
        out
    }

    fn reindex(&mut self) {
        self.index.clear();
        index_node(&self.root, &mut Vec::new(), &mut self.index);
    }
}

fn collect_leaves<'a>(node: &'a PartitionNode, out: &mut Vec<&'a PartitionNode>) {
    if node.is_leaf() {
        out.push(node);
        return;
    }
    for child in &node.children {
        collect_leaves(child, out);
    }
}

fn index_node(node: &PartitionNode, path: &mut Vec<usize>, index: &mut HashMap<NodeId, Vec<usize>>) {
    index.insert(node.id, path.clone());
    for (i, child) in node.children.iter().enumerate() {
        path.push(i);
        index_node(child, path, index);
        path.pop();
    }
}

/// Relative segment proportions for a strategy, validated.
fn split_proportions(
    strategy: SplitStrategy,
    weights: Option<&[f64]>,
) -> TessellaResult<Vec<f64>> {
    match strategy {
        SplitStrategy::Quad => Ok(vec![0.25; 4]),
        SplitStrategy::Golden => Ok(vec![PHI, 1.0]),
        SplitStrategy::Fibonacci { segments } => {
            if segments == 0 {
                return Err(TessellaError::validation(
                    "fibonacci split needs at least 1 segment",
                ));
            }
            Ok(math::fibonacci_split(1.0, segments))
        }
        SplitStrategy::Custom => {
            let weights = weights.ok_or_else(|| {
                TessellaError::validation("custom split requires explicit weights")
            })?;
            if weights.is_empty() {
                return Err(TessellaError::validation("custom split weights must be non-empty"));
            }
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(TessellaError::validation(
                    "custom split weights must be finite and >= 0",
                ));
            }
            let sum: f64 = weights.iter().sum();
            if sum <= 0.0 {
                return Err(TessellaError::validation("custom split weights must sum > 0"));
            }
            Ok(weights.to_vec())
        }
    }
}

/// Four equal quadrants; the right column and bottom row absorb rounding.
fn quad_rects(parent: Rect, increment: f64) -> Vec<Rect> {
    let half_w = math::round_to_increment(parent.width() / 2.0, increment).min(parent.width());
    let half_h = math::round_to_increment(parent.height() / 2.0, increment).min(parent.height());
    let (x, y) = (parent.x0, parent.y0);
    vec![
        rect(x, y, half_w, half_h),
        rect(x + half_w, y, parent.width() - half_w, half_h),
        rect(x, y + half_h, half_w, parent.height() - half_h),
        rect(
            x + half_w,
            y + half_h,
            parent.width() - half_w,
            parent.height() - half_h,
        ),
    ]
}

/// Segment `parent` along its dominant axis into `proportions.len()` rects.
///
/// Axis tie-break: split along width when `width > height`, and also when
/// they are equal. Each extent is rounded to the increment; the last segment
/// takes whatever is left so the segments always sum to the parent extent.
fn axis_rects(parent: Rect, proportions: &[f64], increment: f64) -> Vec<Rect> {
    let horizontal = parent.width() >= parent.height();
    let total_extent = if horizontal {
        parent.width()
    } else {
        parent.height()
    };
    let extents = segment_extents(total_extent, proportions, increment);

    let mut out = Vec::with_capacity(extents.len());
    let mut cursor = 0.0;
    for extent in extents {
        let r = if horizontal {
            rect(parent.x0 + cursor, parent.y0, extent, parent.height())
        } else {
            rect(parent.x0, parent.y0 + cursor, parent.width(), extent)
        };
        out.push(r);
        cursor += extent;
    }
    out
}

fn segment_extents(total: f64, proportions: &[f64], increment: f64) -> Vec<f64> {
    let sum: f64 = proportions.iter().sum();
    let mut out = Vec::with_capacity(proportions.len());
    let mut consumed = 0.0;
    for (i, p) in proportions.iter().enumerate() {
        if i + 1 == proportions.len() {
            out.push((total - consumed).max(0.0));
        } else {
            let raw = total * p / sum;
            let extent = math::round_to_increment(raw, increment)
                .clamp(0.0, (total - consumed).max(0.0));
            out.push(extent);
            consumed += extent;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/partition/tree.rs"]
mod tests;
