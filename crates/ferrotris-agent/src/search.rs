//! Depth-2 placement search.
//!
//! For every spawn the search builds a tree of hypothetical placements:
//!
//! - depth 0: every resting placement of the current piece on the live board
//! - depth 1: every resting placement of the next piece on each depth-0 board
//!
//! Every node is scored by a [`PlacementEvaluator`] on the board it leaves
//! behind. The chosen target is the depth-0 node whose depth-1 child has the
//! globally lowest score. Ties keep the first node found, in enumeration order
//! (depth-0 rotation, then column, then the same for depth 1).
//!
//! Nodes live in an arena ([`SearchTree`]) addressed by [`NodeId`]. Each node
//! owns a copy of its [`BitBoard`], so nothing aliases the live board. The tree
//! is dropped as soon as a [`Decision`] is taken.

use ferrotris_engine::{BitBoard, GameSnapshot, Piece, PieceKind, PieceRotation};
use serde::Serialize;

use crate::{
    placement::{Placement, all_placements},
    placement_analysis::PlacementAnalysis,
    placement_evaluator::PlacementEvaluator,
};

/// Number of pieces the search looks at: the current one and the next one.
pub const LOOKAHEAD_DEPTH: u8 = 2;

/// Index of a node in a [`SearchTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Board metrics of a node, taken after its placement and line clears.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeMetrics {
    pub average_height: f32,
    pub max_height: u8,
    pub bumpiness: u32,
    pub holes: u32,
    pub cleared_lines: usize,
    pub line_bonus: f32,
}

impl NodeMetrics {
    fn from_analysis(analysis: &PlacementAnalysis) -> Self {
        let board = analysis.board_analysis();
        Self {
            average_height: board.average_height(),
            max_height: board.max_height(),
            bumpiness: board.bumpiness(),
            holes: board.num_holes(),
            cleared_lines: analysis.cleared_lines(),
            line_bonus: analysis.line_bonus(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    depth: u8,
    placement: Placement,
    board: BitBoard,
    metrics: NodeMetrics,
    evaluation: f32,
}

impl SearchNode {
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// 0 for the current piece, 1 for the next piece.
    #[must_use]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    #[must_use]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Board after this placement, with completed rows removed.
    #[must_use]
    pub fn board(&self) -> &BitBoard {
        &self.board
    }

    #[must_use]
    pub fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }

    #[must_use]
    pub fn evaluation(&self) -> f32 {
        self.evaluation
    }
}

/// Arena of search nodes for one spawn.
#[derive(Debug, Default, Clone)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
    roots: Vec<NodeId>,
}

impl SearchTree {
    /// Builds the full two-ply tree for `current` then `next` on `board`.
    pub fn build<E>(board: &BitBoard, current: PieceKind, next: PieceKind, evaluator: &E) -> Self
    where
        E: PlacementEvaluator + ?Sized,
    {
        let mut tree = Self::default();
        let roots = tree.expand(board, current, None, 0, evaluator);
        tree.roots = roots;
        for root in tree.roots.clone() {
            let root_board = tree.nodes[root.0].board;
            let children = tree.expand(&root_board, next, Some(root), 1, evaluator);
            tree.nodes[root.0].children = children;
        }
        tree
    }

    fn expand<E>(
        &mut self,
        board: &BitBoard,
        kind: PieceKind,
        parent: Option<NodeId>,
        depth: u8,
        evaluator: &E,
    ) -> Vec<NodeId>
    where
        E: PlacementEvaluator + ?Sized,
    {
        debug_assert!(depth < LOOKAHEAD_DEPTH);
        all_placements(board, kind)
            .map(|placement| {
                let analysis = PlacementAnalysis::from_board(board, placement);
                let id = NodeId(self.nodes.len());
                self.nodes.push(SearchNode {
                    parent,
                    children: vec![],
                    depth,
                    placement,
                    board: *analysis.board_analysis().board(),
                    metrics: NodeMetrics::from_analysis(&analysis),
                    evaluation: evaluator.evaluate_placement(&analysis),
                });
                id
            })
            .collect()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    /// Depth-0 nodes in enumeration order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the depth-1 node with the lowest evaluation, first found on ties.
    ///
    /// Depth-0 nodes without children are never considered.
    #[must_use]
    pub fn best_leaf(&self) -> Option<NodeId> {
        let mut best: Option<(NodeId, f32)> = None;
        for &root in &self.roots {
            for &child in self.node(root).children() {
                let evaluation = self.node(child).evaluation;
                if best.is_none_or(|(_, best_eval)| evaluation < best_eval) {
                    best = Some((child, evaluation));
                }
            }
        }
        best.map(|(id, _)| id)
    }

    /// Depth-0 node leading to the best leaf.
    #[must_use]
    pub fn choose_best(&self) -> Option<NodeId> {
        self.best_leaf().and_then(|leaf| self.node(leaf).parent)
    }
}

/// Target chosen for the current piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Resting position of the current piece.
    pub placement: Placement,
    /// Metrics of the board the placement leaves behind.
    pub metrics: NodeMetrics,
    /// Evaluation of the chosen depth-0 node itself.
    pub evaluation: f32,
    /// Evaluation of the best depth-1 node below it.
    pub lookahead_evaluation: f32,
}

impl Decision {
    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.placement.piece().kind()
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.placement.rotation()
    }

    #[must_use]
    pub fn target_column(&self) -> i32 {
        self.placement.column()
    }

    #[must_use]
    pub fn target_piece(&self) -> &Piece {
        self.placement.piece()
    }
}

/// Runs the search once per spawn with a fixed evaluator.
#[derive(Debug)]
pub struct SearchEngine<'a> {
    evaluator: Box<dyn PlacementEvaluator + 'a>,
    previous: Option<Decision>,
}

impl<'a> SearchEngine<'a> {
    #[must_use]
    pub fn new(evaluator: Box<dyn PlacementEvaluator + 'a>) -> Self {
        Self {
            evaluator,
            previous: None,
        }
    }

    /// Last decision taken, the only state carried between spawns.
    #[must_use]
    pub fn previous(&self) -> Option<&Decision> {
        self.previous.as_ref()
    }

    /// Builds the tree for the snapshot and returns the chosen target.
    ///
    /// Returns `None` when the game is not running or no placement of the
    /// current piece has a follow-up placement for the next piece.
    pub fn search(&mut self, snapshot: &GameSnapshot) -> Option<Decision> {
        if !snapshot.status.is_running() {
            return None;
        }
        let tree = SearchTree::build(
            &snapshot.board,
            snapshot.current,
            snapshot.next,
            self.evaluator.as_ref(),
        );
        let leaf = tree.best_leaf()?;
        let root = tree.node(leaf).parent?;
        let node = tree.node(root);
        let decision = Decision {
            placement: node.placement,
            metrics: node.metrics,
            evaluation: node.evaluation,
            lookahead_evaluation: tree.node(leaf).evaluation,
        };
        log::trace!(
            "searched {} nodes for {} then {}",
            tree.len(),
            snapshot.current,
            snapshot.next
        );
        self.previous = Some(decision);
        Some(decision)
    }
}
