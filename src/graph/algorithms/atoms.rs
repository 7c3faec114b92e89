//! Algorithm Atoms: split the graph along its clique minimal separators.

use bitvec::vec::BitVec;
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use super::triangulation::Triangulation;
use crate::graph::{Node, VNodes, simple::Simple};

/// Output of [Simple::atoms]; all node sets are sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Atoms {
    pub atoms: IndexSet<VNodes>,
    /// The (non-empty) clique minimal separators.
    pub separators: IndexSet<VNodes>,
    /// For every separator, the number of full components it produces (at least 2).
    pub full_component_count: IndexMap<VNodes, usize>,
}

/// The triangulation does not belong to the graph, or its generators are wrong.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AtomsError {
    #[error(
        "the separator {separator:?} of generator {generator} does not disconnect the \
         remaining graph"
    )]
    NotSeparating { generator: Node, separator: VNodes },
}

impl Simple {
    /// Compute the atoms, given the minimal triangulation of `self`.
    ///
    /// The generators are visited in reverse elimination order; whenever the
    /// neighbourhood of a generator in the (partially eliminated) triangulation is a
    /// clique in `self`, it is a clique minimal separator and the component of the
    /// generator is peeled off as an atom (together with the separator).
    pub fn atoms(&self, triangulation: &Triangulation) -> Result<Atoms, AtomsError> {
        debug!(generators = triangulation.generators.len(), "atoms");

        // g'' and h'' in the paper
        let mut remaining = self.clone();
        let mut chordal = triangulation.chordal.clone();

        let mut is_generator = BitVec::<usize>::repeat(false, self.len());
        for &generator in triangulation.generators.iter() {
            is_generator.set(generator, true);
        }

        let mut ret = Atoms::default();

        for &node in triangulation.meo.iter().rev() {
            if is_generator[node] {
                let mut separator: VNodes = chordal.neighbours(node).iter().copied().collect();
                separator.sort_unstable();

                // checked on the original graph; in the triangulation, it is always a
                // clique
                if self.is_clique(&separator) {
                    if !separator.is_empty() {
                        // a new separator already splits off two full components
                        *ret.full_component_count.entry(separator.clone()).or_insert(1) += 1;
                        ret.separators.insert(separator.clone());
                    }

                    let components = remaining.connected_sets(&separator);
                    if components.len() == 1 {
                        return Err(AtomsError::NotSeparating { generator: node, separator });
                    }

                    if let Some(mut component) =
                        components.into_iter().find(|c| c.binary_search(&node).is_ok())
                    {
                        remaining.remove_nodes(component.iter().copied());
                        component.extend(separator.iter().copied());
                        component.sort_unstable();
                        trace!(generator = node, ?separator, atom = ?component, "peeled");
                        ret.atoms.insert(component);
                    }
                }
            }

            chordal.remove_node(node);
        }

        if !remaining.is_empty() {
            ret.atoms.insert(remaining.iter_live().collect());
        }

        debug!(
            atoms = ret.atoms.len(),
            separators = ret.separators.len(),
            "atoms done"
        );

        Ok(ret)
    }
}
