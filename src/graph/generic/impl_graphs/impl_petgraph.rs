use std::iter::Map;

use petgraph::{Directed, EdgeType, Undirected, graph::Neighbors};

use crate::graph::{
    Edge, Label, LabelEdge, Node,
    generic::{CompactNodes, ImplGraph},
};

pub type NodeIndex = petgraph::graph::NodeIndex<Node>;

/// petgraph's graph as multigraph: adding an edge twice stores it twice, and self-loops
/// are allowed.
pub type PetGraph<Ty> = petgraph::Graph<Label, (), Ty, Node>;
pub type Pet = PetGraph<Undirected>;
/// Only here so that directed graphs can be handed to (and rejected by) the
/// decomposition.
pub type PetDirected = PetGraph<Directed>;

impl<Ty: EdgeType> CompactNodes for PetGraph<Ty> {}

impl<Ty: EdgeType> ImplGraph for PetGraph<Ty> {
    type Neighbours<'a>
        = Map<Neighbors<'a, (), Node>, fn(NodeIndex) -> Node>
    where
        Self: 'a;

    fn add_labelled_edge(&mut self, (a, b): LabelEdge) {
        let a_idx = insert_node(self, a);
        let b_idx = insert_node(self, b);
        self.add_edge(a_idx, b_idx, ());
    }

    fn add_labelled_node(&mut self, label: Label) {
        insert_node(self, label);
    }

    fn from_labelled_parts(labels: &[Label], edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut ret = Self::with_capacity(labels.len(), 0);
        for &label in labels {
            ret.add_node(label);
        }
        for (a, b) in edges {
            ret.add_edge(a.into(), b.into(), ());
        }
        ret
    }

    fn len(&self) -> usize {
        self.node_count()
    }

    fn is_directed(&self) -> bool {
        Ty::is_directed()
    }

    fn get_label(&self, node: Node) -> Option<Label> {
        self.node_weight(node.into()).copied()
    }

    fn get_neighbours(&self, node: Node) -> Option<Self::Neighbours<'_>> {
        (node < self.node_count()).then(|| {
            self.neighbors(node.into())
                .map((|e| e.index()) as fn(NodeIndex) -> Node)
        })
    }

    fn remove_node(&mut self, node: Node) {
        // petgraph swaps the last node into the hole, so we stay compact
        self.remove_node(node.into());
    }

    fn edge_count(&self) -> usize {
        petgraph::Graph::edge_count(self)
    }
}

// linear in the number of nodes; bulk construction goes through from_labelled_parts
fn insert_node<Ty: EdgeType>(graph: &mut PetGraph<Ty>, label: Label) -> NodeIndex {
    if let Some(idx) = graph
        .node_indices()
        .find(|idx| graph.node_weight(*idx) == Some(&label))
    {
        idx
    } else {
        graph.add_node(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{InvalidGraph, generic::Adj, test_utils::collect};

    #[test]
    fn multigraph() {
        let graph =
            Pet::from_edge_labels_unchecked(collect!(v; (1, 2), (2, 1), (2, 3), (3, 3),));
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.iter_edges().count(), 4);
        assert_eq!(graph.check(), Err(InvalidGraph::ParallelEdge(0, 1)));
        assert!(!graph.is_directed());

        let (graph, err) = Pet::from_edge_labels(collect!(v; (1, 2), (3, 3),)).unwrap_err();
        assert_eq!(
            err.map(|node| graph.get_label(node).unwrap()),
            InvalidGraph::SelfLoop(3)
        );
    }

    #[test]
    fn directed() {
        let graph = PetDirected::from_edge_labels_unchecked(collect!(v; (1, 2),));
        assert!(graph.is_directed());
        assert!(graph.has_edge((0, 1)));
        assert!(!graph.has_edge((1, 0)));
        assert_eq!(
            graph.check(),
            Err(InvalidGraph::IncompatibleNeighbourhoods(0, 1))
        );
    }

    #[test]
    fn labelled_parts() {
        let edges = [(0, 1), (1, 2), (2, 0), (2, 3)];
        let graph = Pet::from_labelled_parts(&[5, 3, 9, 4], edges);
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.get_label(1), Some(3));
        assert_eq!(graph.find_node(4), Some(3));
        assert!(graph.has_edge((3, 2)));
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.check(), Ok(()));
        assert_eq!(
            graph.map_to_labels(),
            Adj::from_labelled_parts(&[5, 3, 9, 4], edges).map_to_labels()
        );
    }

    #[test]
    fn remove() {
        let mut graph = Pet::from_edge_labels(collect!(v; (1, 2), (2, 3), (3, 4),)).unwrap();
        graph.remove_labelled_node(2);
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.find_node(2), None);
        let three = graph.find_node(3).unwrap();
        let four = graph.find_node(4).unwrap();
        assert!(graph.has_edge((three, four)));
        assert_eq!(graph.get_neighbours(graph.len()).map(|n| n.count()), None);
    }
}
