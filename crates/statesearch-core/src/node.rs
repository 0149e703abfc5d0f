use std::fmt::{Display, Formatter};

use crate::traits::{Cost, SearchState};

/// Handle of a node inside a [`NodeArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node of the search tree. Never modified after creation.
#[derive(Clone, Debug)]
pub struct SearchNode<S: SearchState> {
    state: S,
    parent: Option<NodeId>,
    action: Option<S::Action>,
    depth: u32,
    g: f64,
    h: f64,
}

impl<S: SearchState> SearchNode<S> {
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The action that generated this node; `None` for the root.
    pub fn action(&self) -> Option<&S::Action> {
        self.action.as_ref()
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn f(&self) -> f64 {
        self.g + self.h
    }

    /// Multi-line rendering used by the trace output.
    pub fn display_with_prefix<'a>(&'a self, id: NodeId, prefix: &'a str) -> impl Display + 'a
    where
        S: std::fmt::Debug,
    {
        NodeDisplay {
            node: self,
            id,
            prefix,
        }
    }
}

struct NodeDisplay<'a, S: SearchState> {
    node: &'a SearchNode<S>,
    id: NodeId,
    prefix: &'a str,
}

impl<S: SearchState + std::fmt::Debug> Display for NodeDisplay<'_, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let NodeDisplay { node, id, prefix } = self;
        writeln!(f, "{prefix}begin:")?;
        writeln!(f, "{prefix} - id: {}", id.0)?;
        match node.parent {
            Some(parent) => writeln!(f, "{prefix} - parent id: {}", parent.0)?,
            None => writeln!(f, "{prefix} - parent id: none")?,
        }
        match &node.action {
            Some(action) => writeln!(f, "{prefix} - last action: {action}")?,
            None => writeln!(f, "{prefix} - last action: none")?,
        }
        writeln!(f, "{prefix} - state: {:?}", node.state)?;
        writeln!(f, "{prefix} - depth: {}", node.depth)?;
        writeln!(f, "{prefix} - gValue: {}", node.g)?;
        writeln!(f, "{prefix} - hValue: {}", node.h)?;
        write!(f, "{prefix}end.")
    }
}

/// Owns every node generated during one search.
///
/// Nodes refer to their parent by handle, so a path is shared by all of its descendants and is
/// recovered by walking handles back to the root.
pub struct NodeArena<S: SearchState> {
    nodes: Vec<SearchNode<S>>,
}

impl<S: SearchState> Default for NodeArena<S> {
    fn default() -> Self {
        NodeArena { nodes: vec![] }
    }
}

impl<S: SearchState> NodeArena<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&mut self, state: S) -> NodeId {
        let h = state.heuristic_value();
        self.push(SearchNode {
            state,
            parent: None,
            action: None,
            depth: 0,
            g: 0.0,
            h,
        })
    }

    /// Creates the child of `parent` reached through `action`, whose resulting state `state` the
    /// caller has already computed.
    pub fn child(&mut self, parent: NodeId, action: S::Action, state: S) -> NodeId {
        let p = &self.nodes[parent.index()];
        let depth = p.depth + 1;
        let g = p.g + action.cost();
        let h = state.heuristic_value();
        self.push(SearchNode {
            state,
            parent: Some(parent),
            action: Some(action),
            depth,
            g,
            h,
        })
    }

    fn push(&mut self, node: SearchNode<S>) -> NodeId {
        let id = NodeId(
            u32::try_from(self.nodes.len()).unwrap_or_else(|_| panic!("node arena is full")),
        );
        self.nodes.push(node);
        id
    }

    /// Drops the most recently created node if it is `id`, reclaiming a child that was never
    /// admitted to the frontier.
    pub fn discard(&mut self, id: NodeId) {
        if id.index() + 1 == self.nodes.len() {
            self.nodes.pop();
        }
    }

    pub fn get(&self, id: NodeId) -> &SearchNode<S> {
        &self.nodes[id.index()]
    }

    /// Actions leading from the root to `id`, in execution order.
    pub fn path_to(&self, id: NodeId) -> Vec<S::Action> {
        let mut actions = vec![];
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get(node_id);
            if let Some(action) = &node.action {
                actions.push(action.clone());
            }
            current = node.parent;
        }
        actions.reverse();
        actions
    }
}

impl<S: SearchState> std::ops::Index<NodeId> for NodeArena<S> {
    type Output = SearchNode<S>;

    fn index(&self, id: NodeId) -> &SearchNode<S> {
        self.get(id)
    }
}
