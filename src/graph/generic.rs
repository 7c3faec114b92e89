use std::{fmt::Debug, ops::Range};

use hashbrown::{HashMap, HashSet};

use super::{Edge, HLabels, InvalidGraph, Label, LabelEdge, Node};

/// Marker trait: the nodes of the graph are exactly `0..len`.
///
/// Removing a node may therefore move another node to the freed index (swap-remove);
/// labels are what stays fixed.
pub trait CompactNodes {}

/// A basic graph without any associated data, except for the node labels.
///
/// This is the interface the decomposition consumes; it is not meant as a complete graph
/// library, but only as a convenience to plug in different graph representations.
//
// note that some graph representations can store self-loops or more than one edge
// between two nodes (e.g., petgraph's Graph); the decomposition normalizes them away, but
// `check` reports them
pub trait ImplGraph: CompactNodes + Clone + Debug + Default {
    type Neighbours<'a>: Iterator<Item = Node> + Clone
    where
        Self: 'a;

    // for adding, we only have labelled versions, since we do not know how the
    // label-to-index conversion works; for everything else, we use the indices

    fn add_labelled_edge(&mut self, edge: LabelEdge);

    /// Add an isolated node, if not already in the graph.
    fn add_labelled_node(&mut self, label: Label);

    fn add_labelled_node_symmetrically<N: IntoIterator<Item = Label>>(
        &mut self,
        (label, neighbours): (Label, N),
    ) {
        self.add_labelled_node(label);
        for neighbour in neighbours {
            self.add_labelled_edge((label, neighbour));
        }
    }

    fn from_edge_labels_unchecked(edges: impl IntoIterator<Item = LabelEdge>) -> Self
    where
        Self: Sized,
    {
        let mut ret = Self::default();
        for edge in edges {
            ret.add_labelled_edge(edge);
        }
        ret
    }

    fn from_adjacency_labels_unchecked<A, N>(adj: A) -> Self
    where
        A: IntoIterator<Item = (Label, N)>,
        N: IntoIterator<Item = Label>,
    {
        let mut ret = Self::default();
        for node_adj in adj {
            ret.add_labelled_node_symmetrically(node_adj);
        }
        ret
    }

    /// The adjacency list is assumed to be symmetric already, so implementations may only
    /// insert one direction of each edge.
    fn from_symmetric_adjacency_labels_unchecked<A, N>(adj: A) -> Self
    where
        A: IntoIterator<Item = (Label, N)>,
        N: IntoIterator<Item = Label>,
    {
        Self::from_adjacency_labels_unchecked(adj)
    }

    fn from_edge_labels(
        edges: impl IntoIterator<Item = LabelEdge>,
    ) -> Result<Self, (Self, InvalidGraph<Node>)>
    where
        Self: Sized,
    {
        let graph = Self::from_edge_labels_unchecked(edges);
        match graph.check() {
            Ok(()) => Ok(graph),
            Err(err) => Err((graph, err)),
        }
    }

    /// Graph whose node `i` has the label `labels[i]`, with `edges` given in these
    /// positions. The labels have to be distinct; implementations can then skip the
    /// label lookup that [ImplGraph::add_labelled_edge] needs.
    fn from_labelled_parts(labels: &[Label], edges: impl IntoIterator<Item = Edge>) -> Self
    where
        Self: Sized,
    {
        let mut ret = Self::default();
        for &label in labels {
            ret.add_labelled_node(label);
        }
        for (a, b) in edges {
            ret.add_labelled_edge((labels[a], labels[b]));
        }
        ret
    }

    fn from_adjacency_labels<A, N>(adj: A) -> Result<Self, (Self, InvalidGraph<Node>)>
    where
        A: IntoIterator<Item = (Label, N)>,
        N: IntoIterator<Item = Label>,
        Self: Sized,
    {
        let graph = Self::from_adjacency_labels_unchecked(adj);
        match graph.check() {
            Ok(()) => Ok(graph),
            Err(err) => Err((graph, err)),
        }
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the neighbourhoods describe directed edges (the decomposition refuses to
    /// work on those).
    fn is_directed(&self) -> bool {
        false
    }

    fn get_label(&self, node: Node) -> Option<Label>;

    fn get_neighbours(&self, node: Node) -> Option<Self::Neighbours<'_>>;

    fn remove_node(&mut self, node: Node);

    fn remove_labelled_node(&mut self, label: Label) {
        if let Some(node) = self.find_node(label) {
            self.remove_node(node);
        }
    }

    fn has_edge(&self, (a, b): Edge) -> bool {
        self.get_neighbours(a).is_some_and(|mut neighbours| neighbours.any(|n| n == b))
    }

    /// Number of stored edges (self-loops and parallel edges included).
    fn edge_count(&self) -> usize {
        self.iter_edges().count()
    }

    fn iter_nodes(&self) -> Range<Node> {
        0..self.len()
    }

    fn iter_labels(&self) -> impl Iterator<Item = Label> + Clone {
        self.iter_nodes()
            .map(|node| self.get_label(node).expect("invalid node"))
    }

    fn iter_with_labels(&self) -> impl Iterator<Item = (Node, Label)> + Clone {
        self.iter_nodes()
            .map(|node| (node, self.get_label(node).expect("invalid node")))
    }

    fn iter_with_neighbourhoods(
        &self,
    ) -> impl Iterator<Item = (Node, Self::Neighbours<'_>)> + Clone {
        self.iter_nodes()
            .map(|node| (node, self.get_neighbours(node).expect("invalid node")))
    }

    /// Every stored edge once as `(a, b)` with `a <= b`; parallel edges are repeated.
    fn iter_edges(&self) -> impl Iterator<Item = Edge> {
        self.iter_with_neighbourhoods().flat_map(|(node, neighbours)| {
            neighbours.filter(move |&n| node <= n).map(move |n| (node, n))
        })
    }

    /// Check whether it is a valid simple graph description.
    fn check(&self) -> Result<(), InvalidGraph<Node>> {
        for (node, neighbours) in self.iter_with_neighbourhoods() {
            let mut seen = HashSet::new();
            for neighbour in neighbours {
                if node == neighbour {
                    return Err(InvalidGraph::SelfLoop(node));
                }
                if !seen.insert(neighbour) {
                    return Err(InvalidGraph::ParallelEdge(node, neighbour));
                }
                if !self.has_edge((neighbour, node)) {
                    return Err(InvalidGraph::IncompatibleNeighbourhoods(
                        node, neighbour,
                    ));
                }
            }
        }
        Ok(())
    }

    fn map_to_labels(&self) -> HashMap<Label, HLabels> {
        self.iter_with_neighbourhoods()
            .map(|(node, neighbours)| {
                (
                    self.get_label(node).expect("invalid node"),
                    neighbours.map(|n| self.get_label(n).expect("invalid node")).collect(),
                )
            })
            .collect()
    }

    fn find_node(&self, label: Label) -> Option<Node> {
        self.iter_with_labels()
            .find_map(|(n, l)| if l == label { Some(n) } else { None })
    }
}

mod impl_graphs;
pub use impl_graphs::{
    adj::Adj,
    impl_petgraph::{Pet, PetDirected},
};
