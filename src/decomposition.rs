//! Lazily computed clique minimal separator decomposition of a borrowed graph.

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use hashbrown::HashSet;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug_span;

use crate::graph::{
    Label, LabelEdge, Node, VLabels,
    algorithms::{atoms::Atoms, triangulation::Triangulation},
    generic::ImplGraph,
    ordered,
    simple::Simple,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecompositionError {
    #[error("the graph is directed, but the decomposition needs an undirected graph")]
    Directed,
    #[error("label {0} of the tie-break priority is not a node of the graph")]
    UnknownPriorityLabel(Label),
    #[error("label {0} appears more than once in the tie-break priority")]
    DuplicatePriorityLabel(Label),
}

/// Which node MCS-M+ eliminates next if several nodes have the maximum label.
///
/// The atoms (and separators) are the same for every rule; the elimination ordering, the
/// generators and the fill edges are not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The node with the lowest index in the input graph.
    #[default]
    LowestIndex,
    /// The node with the highest index in the input graph.
    HighestIndex,
    /// The labels in this list win in list order; all other nodes come after them, by
    /// lowest index.
    Priority(VLabels),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tie_break: TieBreak,
}

impl Config {
    pub fn with_tie_break(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }
}

/// All results of a [Decomposition] in one serializable struct; every collection is
/// sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub is_chordal: bool,
    pub meo: VLabels,
    pub generators: VLabels,
    pub fill_edges: Vec<LabelEdge>,
    pub atoms: Vec<VLabels>,
    pub separators: Vec<VLabels>,
    pub full_component_count: Vec<(VLabels, usize)>,
}

/// Clique minimal separator decomposition of `graph`.
///
/// The minimal triangulation (MCS-M+) and the atoms are computed on first request and
/// then cached, so every accessor can be called any number of times, in any order. Both
/// caches are [OnceLock]s, i.e., concurrent first requests compute the results only once
/// and never see half-initialized results.
///
/// Self-loops and parallel edges of the input are ignored (the graph is normalized into
/// a simple graph when constructing the decomposition). Vertex sets (atoms and
/// separators) are sorted label vectors.
///
/// The graph is borrowed for the whole lifetime of the decomposition, so it cannot be
/// changed while the decomposition exists.
#[derive(Debug)]
pub struct Decomposition<'a, G> {
    graph: &'a G,
    config: Config,
    labels: VLabels,
    simple: Simple,
    rank: Vec<usize>,
    triangulation: OnceLock<Triangulated<G>>,
    atoms: OnceLock<Atomised>,
    #[cfg(test)]
    runs: Runs,
}

#[derive(Debug)]
struct Triangulated<G> {
    nodes: Triangulation,
    chordal: G,
    meo: VLabels,
    generators: VLabels,
    fill_edges: HashSet<LabelEdge>,
}

#[derive(Debug)]
struct Atomised {
    atoms: IndexSet<VLabels>,
    separators: IndexSet<VLabels>,
    full_component_count: IndexMap<VLabels, usize>,
}

#[cfg(test)]
#[derive(Debug, Default)]
struct Runs {
    triangulation: AtomicUsize,
    atoms: AtomicUsize,
}

impl<'a, G: ImplGraph> Decomposition<'a, G> {
    /// Decomposition with the default [Config].
    pub fn new(graph: &'a G) -> Result<Self, DecompositionError> {
        Self::with_config(graph, Config::default())
    }

    pub fn with_config(graph: &'a G, config: Config) -> Result<Self, DecompositionError> {
        if graph.is_directed() {
            return Err(DecompositionError::Directed);
        }
        let rank = tie_break_rank(graph, &config.tie_break)?;
        Ok(Self {
            graph,
            config,
            labels: graph.iter_labels().collect(),
            simple: Simple::normalize(graph),
            rank,
            triangulation: OnceLock::new(),
            atoms: OnceLock::new(),
            #[cfg(test)]
            runs: Runs::default(),
        })
    }

    /// The input graph (not a copy).
    pub fn graph(&self) -> &'a G {
        self.graph
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether the (normalized) graph is already chordal, i.e., the minimal
    /// triangulation needs no fill edges.
    pub fn is_chordal(&self) -> bool {
        self.triangulated().nodes.chordal.edge_count() == self.simple.edge_count()
    }

    /// The edges that the minimal triangulation adds, as `(a, b)` with `a < b`.
    pub fn fill_edges(&self) -> &HashSet<LabelEdge> {
        &self.triangulated().fill_edges
    }

    /// A minimal chordal supergraph of the graph, with the same labels.
    pub fn minimal_triangulation(&self) -> &G {
        &self.triangulated().chordal
    }

    /// The nodes (in elimination order) whose neighbourhood in the partially eliminated
    /// triangulation is a minimal separator of the triangulation.
    pub fn generators(&self) -> &[Label] {
        &self.triangulated().generators
    }

    /// The minimal elimination ordering, first eliminated node first.
    pub fn meo(&self) -> &[Label] {
        &self.triangulated().meo
    }

    /// For every separator the number of full components it produces (at least 2).
    ///
    /// # Panics
    /// See [Self::atoms].
    pub fn full_component_count(&self) -> &IndexMap<VLabels, usize> {
        &self.atomised().full_component_count
    }

    /// The atoms; they cover all nodes and do not depend on the [TieBreak].
    ///
    /// # Panics
    /// If the internal consistency check of the decomposition fails, i.e., a separator
    /// does not separate the graph. This is a bug and not caused by the input; the atoms
    /// stay uncomputed in that case.
    pub fn atoms(&self) -> &IndexSet<VLabels> {
        &self.atomised().atoms
    }

    /// The clique minimal separators.
    ///
    /// # Panics
    /// See [Self::atoms].
    pub fn separators(&self) -> &IndexSet<VLabels> {
        &self.atomised().separators
    }

    /// Compute everything and collect it (sorted) into one struct.
    pub fn report(&self) -> Report {
        let mut fill_edges: Vec<_> = self.fill_edges().iter().copied().collect();
        fill_edges.sort_unstable();
        let mut atoms: Vec<_> = self.atoms().iter().cloned().collect();
        atoms.sort_unstable();
        let mut separators: Vec<_> = self.separators().iter().cloned().collect();
        separators.sort_unstable();
        let mut full_component_count: Vec<_> = self
            .full_component_count()
            .iter()
            .map(|(separator, count)| (separator.clone(), *count))
            .collect();
        full_component_count.sort_unstable();
        Report {
            is_chordal: self.is_chordal(),
            meo: self.meo().to_vec(),
            generators: self.generators().to_vec(),
            fill_edges,
            atoms,
            separators,
            full_component_count,
        }
    }

    fn triangulated(&self) -> &Triangulated<G> {
        self.triangulation.get_or_init(|| {
            #[cfg(test)]
            self.runs.triangulation.fetch_add(1, Ordering::SeqCst);
            let _span = debug_span!("triangulation").entered();
            self.label_triangulation(self.simple.minimal_triangulation(&self.rank))
        })
    }

    fn atomised(&self) -> &Atomised {
        self.atoms.get_or_init(|| {
            let triangulated = self.triangulated();
            #[cfg(test)]
            self.runs.atoms.fetch_add(1, Ordering::SeqCst);
            let _span = debug_span!("atoms").entered();
            match self.simple.atoms(&triangulated.nodes) {
                Ok(atoms) => self.label_atoms(atoms),
                Err(err) => panic!("inconsistent clique minimal separator decomposition: {err}"),
            }
        })
    }

    fn label_triangulation(&self, nodes: Triangulation) -> Triangulated<G> {
        Triangulated {
            chordal: nodes.chordal.to_graph(&self.labels),
            meo: nodes.meo.iter().map(|&n| self.labels[n]).collect(),
            generators: nodes.generators.iter().map(|&n| self.labels[n]).collect(),
            fill_edges: nodes
                .fill_edges
                .iter()
                .map(|&(a, b)| ordered(self.labels[a], self.labels[b]))
                .collect(),
            nodes,
        }
    }

    fn label_atoms(&self, atoms: Atoms) -> Atomised {
        Atomised {
            atoms: atoms.atoms.iter().map(|atom| self.label_set(atom)).collect(),
            separators: atoms.separators.iter().map(|sep| self.label_set(sep)).collect(),
            full_component_count: atoms
                .full_component_count
                .iter()
                .map(|(separator, count)| (self.label_set(separator), *count))
                .collect(),
        }
    }

    fn label_set(&self, nodes: &[Node]) -> VLabels {
        let mut ret: VLabels = nodes.iter().map(|&n| self.labels[n]).collect();
        ret.sort_unstable();
        ret
    }
}

fn tie_break_rank<G: ImplGraph>(
    graph: &G,
    tie_break: &TieBreak,
) -> Result<Vec<usize>, DecompositionError> {
    let len = graph.len();
    match tie_break {
        TieBreak::LowestIndex => Ok((0..len).collect()),
        TieBreak::HighestIndex => Ok((0..len).rev().collect()),
        TieBreak::Priority(priority) => {
            let mut rank = vec![None; len];
            for (position, &label) in priority.iter().enumerate() {
                let node = graph
                    .find_node(label)
                    .ok_or(DecompositionError::UnknownPriorityLabel(label))?;
                if rank[node].replace(position).is_some() {
                    return Err(DecompositionError::DuplicatePriorityLabel(label));
                }
            }
            let mut next = priority.len();
            Ok(rank
                .into_iter()
                .map(|r| {
                    r.unwrap_or_else(|| {
                        next += 1;
                        next - 1
                    })
                })
                .collect())
        },
    }
}
