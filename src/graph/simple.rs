//! Compact working graph that the decomposition algorithms run on.

use bitvec::vec::BitVec;
use hashbrown::HashSet;
use indexmap::IndexMap;
use itertools::Itertools;
use petgraph::unionfind::UnionFind;

use super::{Edge, HNodes, Label, Node, VNodes, generic::ImplGraph, ordered};

/// Simple undirected graph over the fixed index range `0..len`.
///
/// In contrast to the [ImplGraph]s, removing a node does not move other nodes around;
/// it only switches the node off (and removes its edges). This allows us to work with
/// the indices of the input graph during the whole decomposition, and to "copy" working
/// graphs by simply cloning them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Simple {
    nodes: Vec<HNodes>,
    live: BitVec,
    num_live: usize,
    num_edges: usize,
}

impl Simple {
    /// Graph with `len` isolated nodes.
    pub fn with_nodes(len: usize) -> Self {
        Self {
            nodes: vec![HNodes::new(); len],
            live: BitVec::repeat(true, len),
            num_live: len,
            num_edges: 0,
        }
    }

    pub fn from_edges(len: usize, edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut ret = Self::with_nodes(len);
        for edge in edges {
            ret.add_edge(edge);
        }
        ret
    }

    /// Simple, undirected copy of `graph` on the same node indices: self-loops are
    /// dropped and parallel edges collapse into one edge. `graph` is not touched.
    pub fn normalize<G: ImplGraph>(graph: &G) -> Self {
        let mut ret = Self::with_nodes(graph.len());
        for (node, neighbours) in graph.iter_with_neighbourhoods() {
            for neighbour in neighbours {
                if node != neighbour {
                    ret.add_edge((node, neighbour));
                }
            }
        }
        ret
    }

    /// Node bound, i.e., including removed nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether there are no live nodes left.
    pub fn is_empty(&self) -> bool {
        self.num_live == 0
    }

    pub fn num_live(&self) -> usize {
        self.num_live
    }

    pub fn edge_count(&self) -> usize {
        self.num_edges
    }

    pub fn is_live(&self, node: Node) -> bool {
        self.live.get(node).is_some_and(|live| *live)
    }

    pub fn iter_live(&self) -> impl Iterator<Item = Node> + '_ {
        self.live.iter_ones()
    }

    /// Return whether the edge is new.
    ///
    /// # Panics
    /// If one of the nodes is not live or if it is a self-loop.
    pub fn add_edge(&mut self, (a, b): Edge) -> bool {
        assert!(a != b, "self-loop on node {a}");
        assert!(self.is_live(a) && self.is_live(b), "edge ({a}, {b}) on a dead node");
        let new = self.nodes[a].insert(b);
        self.nodes[b].insert(a);
        self.num_edges += new as usize;
        new
    }

    /// Return whether the edge existed.
    pub fn remove_edge(&mut self, (a, b): Edge) -> bool {
        let existed = self.nodes.get_mut(a).is_some_and(|n| n.remove(&b));
        if existed {
            self.nodes[b].remove(&a);
            self.num_edges -= 1;
        }
        existed
    }

    pub fn has_edge(&self, (a, b): Edge) -> bool {
        self.nodes.get(a).is_some_and(|neighbours| neighbours.contains(&b))
    }

    /// Empty for removed nodes.
    pub fn neighbours(&self, node: Node) -> &HNodes {
        &self.nodes[node]
    }

    pub fn remove_node(&mut self, node: Node) {
        if !self.is_live(node) {
            return;
        }
        let neighbours = std::mem::take(&mut self.nodes[node]);
        for neighbour in neighbours.iter() {
            self.nodes[*neighbour].remove(&node);
        }
        self.num_edges -= neighbours.len();
        self.live.set(node, false);
        self.num_live -= 1;
    }

    pub fn remove_nodes(&mut self, nodes: impl IntoIterator<Item = Node>) {
        for node in nodes {
            self.remove_node(node);
        }
    }

    /// Every edge once, as `(a, b)` with `a < b`.
    pub fn iter_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.nodes.iter().enumerate().flat_map(|(node, neighbours)| {
            neighbours.iter().filter(move |&&n| node < n).map(move |&n| (node, n))
        })
    }

    /// Edges of `self` that are not in `other` (sorted endpoints).
    pub fn edge_difference(&self, other: &Simple) -> HashSet<Edge> {
        self.iter_edges()
            .filter(|&edge| !other.has_edge(edge))
            .map(|(a, b)| ordered(a, b))
            .collect()
    }

    /// Whether every pair of distinct nodes in `nodes` is adjacent. Trivially true for
    /// less than two nodes.
    pub fn is_clique(&self, nodes: &[Node]) -> bool {
        nodes
            .iter()
            .tuple_combinations()
            .all(|(&a, &b)| a == b || self.has_edge((a, b)))
    }

    /// Partition the live nodes that are not `excluded` into the node sets of the
    /// connected components of the induced subgraph. Components are ordered by their
    /// smallest node and each component is sorted.
    pub fn connected_sets(&self, excluded: &[Node]) -> Vec<VNodes> {
        let mut mask = self.live.clone();
        for &node in excluded {
            if node < mask.len() {
                mask.set(node, false);
            }
        }

        let mut union_find = UnionFind::<Node>::new(self.len());
        for node in mask.iter_ones() {
            for &neighbour in self.nodes[node].iter() {
                if node < neighbour && mask[neighbour] {
                    union_find.union(node, neighbour);
                }
            }
        }

        let mut components: IndexMap<Node, VNodes> = IndexMap::new();
        for node in mask.iter_ones() {
            components.entry(union_find.find(node)).or_default().push(node);
        }
        components.into_values().collect()
    }

    /// Build an [ImplGraph] with the same live nodes and edges. The nodes keep their
    /// order, so the indices stay the same if no node has been removed.
    pub fn to_graph<G: ImplGraph>(&self, labels: &[Label]) -> G {
        let mut compact = vec![0; self.len()];
        let mut live_labels = Vec::with_capacity(self.num_live);
        for (position, node) in self.iter_live().enumerate() {
            compact[node] = position;
            live_labels.push(labels[node]);
        }
        G::from_labelled_parts(
            &live_labels,
            self.iter_edges().map(|(a, b)| (compact[a], compact[b])),
        )
    }
}
