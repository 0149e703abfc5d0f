use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;

use crate::node::{NodeArena, NodeId, SearchNode};
use crate::traits::SearchState;

/// Dequeue order of a [`Frontier`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    /// Insertion order (breadth-first).
    Fifo,
    /// Reverse insertion order (depth-first).
    Lifo,
    /// Ascending path cost (uniform-cost).
    MinG,
    /// Ascending heuristic value (greedy best-first).
    MinH,
    /// Ascending `g + h` (A*).
    MinF,
}

impl Order {
    /// Priority of a node admitted as the `seq`-th insertion. Smaller keys are dequeued first;
    /// equal primary values fall back to insertion order, except for LIFO.
    fn key<S: SearchState>(self, node: &SearchNode<S>, seq: u64) -> Key {
        let seq = seq as i64;
        match self {
            Order::Fifo => Key(0.0, seq),
            Order::Lifo => Key(0.0, -seq),
            Order::MinG => Key(node.g(), seq),
            Order::MinH => Key(node.h(), seq),
            Order::MinF => Key(node.f(), seq),
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct Key(f64, i64);

#[derive(Debug)]
struct Entry {
    key: Key,
    node: NodeId,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so that the max-heap yields the smallest key.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .0
            .total_cmp(&self.key.0)
            .then_with(|| other.key.1.cmp(&self.key.1))
    }
}

/// The open list: generated nodes not yet expanded.
///
/// Every order shares the same admission rule: at most one open node per state, and a candidate
/// only replaces the open node of its state when its path cost is strictly lower. Replaced nodes
/// are left in the heap and skipped when they surface, so the heap can outgrow [`Frontier::len`].
/// Once stale entries outnumber live ones the heap is rebuilt from the live entries.
pub struct Frontier<S: SearchState> {
    order: Order,
    heap: BinaryHeap<Entry>,
    // We maintain the invariant that this map holds exactly the open nodes, one per state.
    index: AHashMap<S, NodeId>,
    seq: u64,
}

impl<S: SearchState> Frontier<S> {
    pub fn new(order: Order) -> Self {
        Frontier {
            order,
            heap: BinaryHeap::new(),
            index: AHashMap::new(),
            seq: 0,
        }
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// Admits `node` unless an open node for the same state has a path cost no greater than its
    /// own. Returns whether the node was admitted.
    pub fn enqueue(&mut self, arena: &NodeArena<S>, node: NodeId) -> bool {
        let candidate = &arena[node];
        if let Some(&open) = self.index.get(candidate.state()) {
            if arena[open].g() <= candidate.g() {
                return false;
            }
        }
        self.index.insert(candidate.state().clone(), node);
        self.heap.push(Entry {
            key: self.order.key(candidate, self.seq),
            node,
        });
        self.seq += 1;
        if self.heap.len() > 2 * self.index.len() {
            self.compact(arena);
        }
        true
    }

    fn compact(&mut self, arena: &NodeArena<S>) {
        let index = &self.index;
        self.heap
            .retain(|entry| index.get(arena[entry.node].state()) == Some(&entry.node));
    }

    /// Removes and returns the best open node.
    ///
    /// # Panics
    /// Panics if the frontier is empty; callers check [`Frontier::is_empty`] first.
    #[track_caller]
    pub fn dequeue(&mut self, arena: &NodeArena<S>) -> NodeId {
        while let Some(Entry { node, .. }) = self.heap.pop() {
            let state = arena[node].state();
            if self.index.get(state) == Some(&node) {
                self.index.remove(state);
                return node;
            }
        }
        panic!("dequeue on an empty frontier");
    }

    /// The open node for `state`, if any.
    pub fn get(&self, state: &S) -> Option<NodeId> {
        self.index.get(state).copied()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.index.clear();
        self.seq = 0;
    }
}
