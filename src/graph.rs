use hashbrown::HashSet;

// some of the following type aliases are not used, but they serve as documentation and
// orientation for variable names

/// Compact index of a node inside of a graph, i.e., a number in `0..graph.len()`.
pub type Node = usize;
/// The user-facing identifier of a node; stable under node removal (indices are not).
pub type Label = usize;
pub type Edge = (Node, Node);
pub type LabelEdge = (Label, Label);

// V for vector
pub type VNodes = Vec<Node>;
pub type VLabels = Vec<Label>;
// H for hash
pub type HNodes = HashSet<Node>;
pub type HLabels = HashSet<Label>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
pub enum InvalidGraph<N> {
    #[error("self loop detected on node {0}")]
    SelfLoop(N),
    #[error("incompatible neighbourhoods between the nodes {0} and {1}")]
    IncompatibleNeighbourhoods(N, N),
    #[error("more than one edge between the nodes {0} and {1}")]
    ParallelEdge(N, N),
}

impl<N> InvalidGraph<N> {
    /// Usually used to map the node indices to their labels.
    pub fn map<M>(self, mut f: impl FnMut(N) -> M) -> InvalidGraph<M> {
        match self {
            InvalidGraph::SelfLoop(n) => InvalidGraph::SelfLoop(f(n)),
            InvalidGraph::IncompatibleNeighbourhoods(a, b) => {
                InvalidGraph::IncompatibleNeighbourhoods(f(a), f(b))
            },
            InvalidGraph::ParallelEdge(a, b) => InvalidGraph::ParallelEdge(f(a), f(b)),
        }
    }
}

/// Sort the endpoints, so that undirected edges can be compared and hashed.
#[inline]
pub fn ordered<T: Ord>(a: T, b: T) -> (T, T) {
    if a <= b { (a, b) } else { (b, a) }
}

pub mod algorithms;
pub mod generic;
pub mod simple;
