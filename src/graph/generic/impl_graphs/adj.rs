use std::{iter::Copied, mem};

use hashbrown::{HashMap, HashSet, hash_set};

use crate::graph::{
    Edge, Label, LabelEdge, Node,
    generic::{CompactNodes, ImplGraph},
};

pub type Neighbourhood = HashSet<Node>;

/// Adjacency list; never holds parallel edges, but it can hold self-loops and, via
/// [ImplGraph::from_symmetric_adjacency_labels_unchecked], asymmetric neighbourhoods (see
/// [Adj::correct]).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Adj {
    // separate labels and neighbourhoods, because the labels are usually in the way,
    // except when removing a node (which will require just one more swap_remove) or when
    // reading the graph
    pub nodes: Vec<Neighbourhood>,
    pub labels: Vec<Label>,
    pub invert_labels: HashMap<Label, Node>,
}

impl CompactNodes for Adj {}

impl ImplGraph for Adj {
    type Neighbours<'a>
        = Copied<hash_set::Iter<'a, Node>>
    where
        Self: 'a;

    fn add_labelled_edge(&mut self, (a, b): LabelEdge) {
        let idxa = self.insert(a);
        let idxb = self.insert(b);
        self.nodes[idxa].insert(idxb);
        self.nodes[idxb].insert(idxa);
    }

    fn add_labelled_node(&mut self, label: Label) {
        self.insert(label);
    }

    fn from_symmetric_adjacency_labels_unchecked<A, N>(adj: A) -> Self
    where
        A: IntoIterator<Item = (Label, N)>,
        N: IntoIterator<Item = Label>,
    {
        let mut ret = Self::default();
        for (node, neighbourhood) in adj {
            // just like add_labelled_node_symmetrically, but without
            // ret.nodes[idx_neighbour].insert(idx);
            let idx = ret.insert(node);
            for neighbour in neighbourhood {
                let idx_neighbour = ret.insert(neighbour);
                ret.nodes[idx].insert(idx_neighbour);
            }
        }
        ret
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn get_label(&self, node: Node) -> Option<Label> {
        self.labels.get(node).copied()
    }

    fn get_neighbours(&self, node: Node) -> Option<Self::Neighbours<'_>> {
        self.nodes.get(node).map(|neighbours| neighbours.iter().copied())
    }

    fn remove_node(&mut self, node: Node) {
        assert!(node < self.nodes.len(), "node {node} is not in the graph");
        let last = self.nodes.len() - 1;

        for neighbour in mem::take(&mut self.nodes[node]) {
            self.nodes[neighbour].remove(&node);
        }
        self.invert_labels.remove(&self.labels[node]);

        // the last node moves into the hole
        if node != last {
            let moved = mem::take(&mut self.nodes[last]);
            for neighbour in moved.iter() {
                self.nodes[*neighbour].remove(&last);
            }
            let moved: Neighbourhood =
                moved.into_iter().map(|n| if n == last { node } else { n }).collect();
            for neighbour in moved.iter() {
                self.nodes[*neighbour].insert(node);
            }
            self.nodes[node] = moved;
            self.invert_labels.insert(self.labels[last], node);
        }
        self.nodes.pop();
        self.labels.swap_remove(node);
    }

    fn has_edge(&self, (a, b): Edge) -> bool {
        self.nodes.get(a).is_some_and(|neighbours| neighbours.contains(&b))
    }

    fn edge_count(&self) -> usize {
        // self-loops are counted once, all other edges twice
        let (loops, rest) = self.nodes.iter().enumerate().fold(
            (0, 0),
            |(loops, rest), (node, neighbours)| {
                let is_loop = neighbours.contains(&node) as usize;
                (loops + is_loop, rest + neighbours.len() - is_loop)
            },
        );
        loops + rest / 2
    }

    fn find_node(&self, label: Label) -> Option<Node> {
        self.invert_labels.get(&label).copied()
    }
}

impl Adj {
    fn insert(&mut self, label: Label) -> Node {
        *self.invert_labels.entry(label).or_insert_with(|| {
            self.nodes.push(HashSet::new());
            self.labels.push(label);
            self.nodes.len() - 1
        })
    }

    /// Correct (potentially) invalid graph description.
    pub fn correct(&mut self) {
        for node in self.iter_nodes() {
            let neighbours = &mut self.nodes[node];
            neighbours.remove(&node);
            for neighbour in neighbours.clone() {
                self.nodes
                    .get_mut(neighbour)
                    .unwrap_or_else(|| {
                        panic!(
                            "node '{node}' has neighbour '{neighbour}' that does not \
                             exist in the graph"
                        )
                    })
                    .insert(node);
            }
        }
    }
}
