//! This module implements an A* search that advances one expansion per call. It follows
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html)
//! in keeping the closed nodes in an [IndexMap] whose entries point to their parent by index,
//! but the frontier lives in the struct between calls so that a caller can observe it.
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use log::{info, trace};
use num_traits::Zero;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Frontier entry. Entries are identified by their insertion sequence number rather than by
/// node, so a node may be on the heap more than once.
struct FrontierEntry<N, C> {
    estimated_cost: C,
    cost: C,
    id: usize,
    node: N,
    parent: usize,
}

impl<N, C: PartialEq> Eq for FrontierEntry<N, C> {}

impl<N, C: PartialEq> PartialEq for FrontierEntry<N, C> {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost) && self.id == other.id
    }
}

impl<N, C: Ord> PartialOrd for FrontierEntry<N, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N, C: Ord> Ord for FrontierEntry<N, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest estimated cost first, then the earliest inserted entry
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => other.id.cmp(&self.id),
            s => s,
        }
    }
}

/// The node closed by a step along with the index it was stored under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finalized<N, C> {
    pub index: usize,
    pub node: N,
    pub parent: Option<N>,
    pub cost: C,
}

/// Outcome of a single call to [StepwiseAstar::step].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expansion<N, C> {
    /// A node was closed and its successors were pushed.
    Expanded(Finalized<N, C>),
    /// The closed node satisfied the success predicate. The search is done.
    Found(Finalized<N, C>),
    /// Nothing is left on the frontier.
    Exhausted,
    /// The search was already done; nothing happened.
    AlreadyDone,
}

fn reverse_path<N, V, F>(parents: &FxIndexMap<N, V>, mut parent: F, start: usize) -> Vec<N>
where
    N: Eq + Hash + Clone,
    F: FnMut(&V) -> usize,
{
    let mut path: Vec<N> = itertools::unfold(start, |i| {
        parents.get_index(*i).map(|(node, value)| {
            *i = parent(value);
            node.clone()
        })
    })
    .collect();
    path.reverse();
    path
}

/// Resumable A* state. Successors, heuristic and success predicate are passed to every
/// [step](Self::step) call instead of being stored, so the search never holds on to the graph.
///
/// A node is on the frontier or closed, never both: closing a node removes it from the live
/// open index, and any older heap entry for it is dropped when it surfaces. Closed nodes are
/// never reopened.
pub struct StepwiseAstar<N, C> {
    start: N,
    start_estimate: C,
    to_see: BinaryHeap<FrontierEntry<N, C>>,
    open: FxIndexMap<N, C>,
    closed: FxIndexMap<N, (usize, C)>,
    next_id: usize,
    done: bool,
    exhausted: bool,
}

impl<N, C> StepwiseAstar<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
{
    /// Creates a search whose frontier holds only `start`, with cost zero and the given
    /// estimate.
    pub fn new(start: N, start_estimate: C) -> StepwiseAstar<N, C> {
        let mut search = StepwiseAstar {
            start,
            start_estimate,
            to_see: BinaryHeap::new(),
            open: FxIndexMap::default(),
            closed: FxIndexMap::default(),
            next_id: 0,
            done: false,
            exhausted: false,
        };
        search.reset();
        search
    }

    /// Returns to the state right after [new](Self::new).
    pub fn reset(&mut self) {
        self.to_see.clear();
        self.open.clear();
        self.closed.clear();
        self.next_id = 0;
        self.done = false;
        self.exhausted = false;
        let start = self.start.clone();
        self.push(start, Zero::zero(), self.start_estimate, usize::MAX);
    }

    fn push(&mut self, node: N, cost: C, estimated_cost: C, parent: usize) {
        self.open.insert(node.clone(), cost);
        self.to_see.push(FrontierEntry {
            estimated_cost,
            cost,
            id: self.next_id,
            node,
            parent,
        });
        self.next_id += 1;
    }

    /// Closes the frontier node with the lowest estimated cost. Ties go to the entry that was
    /// pushed first. Successors that are closed, or already open with a cost at most as high,
    /// are skipped.
    pub fn step<FN, IN, FH, FS>(
        &mut self,
        mut successors: FN,
        mut heuristic: FH,
        mut success: FS,
    ) -> Expansion<N, C>
    where
        FN: FnMut(&N) -> IN,
        IN: IntoIterator<Item = (N, C)>,
        FH: FnMut(&N) -> C,
        FS: FnMut(&N) -> bool,
    {
        if self.done {
            return Expansion::AlreadyDone;
        }
        let entry = loop {
            match self.to_see.pop() {
                // Superseded by a cheaper entry that has been closed already
                Some(entry) if self.is_closed(&entry.node) => continue,
                Some(entry) => break entry,
                None => {
                    if !self.exhausted {
                        info!("Frontier exhausted after closing {} nodes", self.closed.len());
                        self.exhausted = true;
                    }
                    return Expansion::Exhausted;
                }
            }
        };
        self.open.swap_remove(&entry.node);
        let (index, _) = self
            .closed
            .insert_full(entry.node.clone(), (entry.parent, entry.cost));
        let finalized = Finalized {
            index,
            parent: self.closed.get_index(entry.parent).map(|(p, _)| p.clone()),
            node: entry.node,
            cost: entry.cost,
        };
        if success(&finalized.node) {
            self.done = true;
            return Expansion::Found(finalized);
        }
        for (successor, move_cost) in successors(&finalized.node) {
            if self.is_closed(&successor) {
                continue;
            }
            let new_cost = finalized.cost + move_cost;
            if let Some(&open_cost) = self.open.get(&successor) {
                if open_cost <= new_cost {
                    continue;
                }
            }
            let h = heuristic(&successor);
            trace!("Pushing successor {} of node {}", self.next_id, index);
            self.push(successor, new_cost, new_cost + h, index);
        }
        Expansion::Expanded(finalized)
    }

    pub fn start(&self) -> &N {
        &self.start
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Whether no node is left to close. A completed search may also have an empty frontier.
    pub fn is_exhausted(&self) -> bool {
        self.open.is_empty()
    }

    /// Nodes on the frontier, each listed once.
    pub fn open_nodes(&self) -> impl Iterator<Item = &N> + '_ {
        self.open.keys()
    }

    /// Closed nodes in the order they were closed.
    pub fn closed_nodes(&self) -> impl Iterator<Item = &N> + '_ {
        self.closed.keys()
    }

    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }

    pub fn is_closed(&self, node: &N) -> bool {
        self.closed.contains_key(node)
    }

    /// Best known cost of an open node.
    pub fn open_cost(&self, node: &N) -> Option<C> {
        self.open.get(node).copied()
    }

    /// Parent and cost of a closed node.
    pub fn closed_entry(&self, node: &N) -> Option<(Option<&N>, C)> {
        self.closed.get(node).map(|&(parent, cost)| {
            (self.closed.get_index(parent).map(|(p, _)| p), cost)
        })
    }

    /// Path from the start to a closed node, following parent indices.
    pub fn path_to(&self, node: &N) -> Option<Vec<N>> {
        self.closed
            .get_index_of(node)
            .map(|index| self.path_to_index(index))
    }

    /// Path from the start to the node closed under `index`; empty if there is no such node.
    pub fn path_to_index(&self, index: usize) -> Vec<N> {
        reverse_path(&self.closed, |&(p, _)| p, index)
    }
}
