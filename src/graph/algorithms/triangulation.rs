//! Minimal triangulation with MCS-M+ (Berry et al., "An Introduction to Clique Minimal
//! Separator Decomposition", 2010).

use bitvec::vec::BitVec;
use hashbrown::HashSet;
use tracing::{debug, trace};

use crate::graph::{Edge, Node, VNodes, ordered, simple::Simple};

/// Output of [Simple::minimal_triangulation]; everything in node indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Triangulation {
    /// Minimal chordal supergraph of the input graph.
    pub chordal: Simple,
    /// Minimal elimination ordering, first eliminated node first.
    pub meo: VNodes,
    /// The nodes whose neighbourhood in `chordal`, restricted to the nodes eliminated
    /// after them, is a minimal separator of `chordal`; in elimination order.
    pub generators: VNodes,
    /// Edges of `chordal` that are not in the input graph, with sorted endpoints.
    pub fill_edges: HashSet<Edge>,
}

impl Simple {
    /// Run MCS-M+ on all live nodes.
    ///
    /// `rank` breaks ties when choosing the next node among those with the maximum
    /// label: the node with the lowest rank wins. It must be indexable by every node and
    /// should be injective, otherwise the choice between equally ranked nodes falls back
    /// to the highest index. The atoms do not depend on `rank`, but the elimination
    /// ordering and the fill edges do.
    pub fn minimal_triangulation(&self, rank: &[usize]) -> Triangulation {
        let len = self.len();
        debug!(nodes = self.num_live(), edges = self.edge_count(), "MCS-M+");

        // g' in the paper
        let mut working = self.clone();
        let mut labels = vec![0usize; len];
        let mut chordal = Simple::with_nodes(len);
        for node in (0..len).filter(|&n| !self.is_live(n)) {
            chordal.remove_node(node);
        }
        let mut meo = Vec::with_capacity(self.num_live());
        let mut generators = Vec::new();
        let mut fill_edges = HashSet::new();

        // `None` is the sentinel that is smaller than every label
        let mut previous_label: Option<usize> = None;

        // reused between the steps; labels are always smaller than the number of
        // eliminated nodes, so they fit into `len` buckets
        let mut reached = BitVec::<usize>::repeat(false, len);
        let mut reach: Vec<VNodes> = vec![Vec::new(); len];

        while let Some(node) = max_label_node(&working, &labels, rank) {
            let label = labels[node];
            let is_generator = previous_label.is_some_and(|previous| label <= previous);
            if is_generator {
                generators.push(node);
            }
            previous_label = Some(label);

            // the nodes that become neighbours of `node` in the triangulation: its
            // current neighbours plus everything reachable via paths whose inner nodes
            // all have a smaller label than the end node
            let mut targets: VNodes = working.neighbours(node).iter().copied().collect();

            reached.fill(false);
            reached.set(node, true);
            for &target in targets.iter() {
                reached.set(target, true);
                reach[labels[target]].push(target);
            }

            for j in 0..len {
                while let Some(y) = reach[j].pop() {
                    for &z in working.neighbours(y).iter() {
                        if reached[z] {
                            continue;
                        }
                        reached.set(z, true);
                        if labels[z] > j {
                            targets.push(z);
                            reach[labels[z]].push(z);
                        } else {
                            reach[j].push(z);
                        }
                    }
                }
            }

            for &target in targets.iter() {
                if chordal.add_edge((node, target)) && !self.has_edge((node, target)) {
                    fill_edges.insert(ordered(node, target));
                }
                labels[target] += 1;
            }

            trace!(node, label, is_generator, degree = targets.len(), "eliminated");
            meo.push(node);
            working.remove_node(node);
        }

        debug!(
            fill_edges = fill_edges.len(),
            generators = generators.len(),
            "MCS-M+ done"
        );

        Triangulation { chordal, meo, generators, fill_edges }
    }
}

fn max_label_node(graph: &Simple, labels: &[usize], rank: &[usize]) -> Option<Node> {
    graph
        .iter_live()
        .max_by(|&a, &b| labels[a].cmp(&labels[b]).then(rank[b].cmp(&rank[a])))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::graph::test_utils::{erdos_renyi, is_chordal_naive};

    fn lowest_index(len: usize) -> Vec<usize> {
        (0..len).collect()
    }

    #[test]
    fn square() {
        // 0 - 1
        // |   |
        // 3 - 2
        let graph = Simple::from_edges(4, [(0, 1), (1, 2), (2, 3), (3, 0)]);
        let triangulation = graph.minimal_triangulation(&lowest_index(4));
        assert_eq!(triangulation.meo, vec![0, 1, 3, 2]);
        assert_eq!(triangulation.generators, vec![2]);
        assert_eq!(triangulation.fill_edges, HashSet::from_iter([(1, 3)]));
        assert_eq!(triangulation.chordal.edge_count(), 5);
        assert!(is_chordal_naive(&triangulation.chordal));

        // other tie-break, other diagonal
        let rank = vec![1, 0, 2, 3];
        let triangulation = graph.minimal_triangulation(&rank);
        assert_eq!(triangulation.meo[0], 1);
        assert_eq!(triangulation.fill_edges, HashSet::from_iter([(0, 2)]));
    }

    #[test]
    fn two_triangles() {
        // 2 - 0 - 3
        //   \ | /
        //     1
        let graph = Simple::from_edges(4, [(0, 1), (0, 2), (1, 2), (0, 3), (1, 3)]);
        let triangulation = graph.minimal_triangulation(&lowest_index(4));
        assert_eq!(triangulation.meo, vec![0, 1, 2, 3]);
        assert_eq!(triangulation.generators, vec![3]);
        assert!(triangulation.fill_edges.is_empty());
        assert_eq!(triangulation.chordal, graph);
    }

    #[test]
    fn trivial() {
        let triangulation = Simple::default().minimal_triangulation(&[]);
        assert_eq!(triangulation, Triangulation::default());

        let mut graph = Simple::from_edges(3, [(0, 2)]);
        graph.remove_node(1);
        let triangulation = graph.minimal_triangulation(&lowest_index(3));
        assert_eq!(triangulation.meo, vec![0, 2]);
        assert!(!triangulation.chordal.is_live(1));
        assert_eq!(triangulation.chordal, graph);
    }

    #[test]
    fn random_graphs_are_minimally_triangulated() {
        let rng = &mut Pcg64::seed_from_u64(42);
        for size in 1..10 {
            for density in [0.2, 0.4, 0.6] {
                let graph = Simple::from_edges(size, erdos_renyi(size, density, rng));
                let triangulation = graph.minimal_triangulation(&lowest_index(size));
                let chordal = &triangulation.chordal;

                let mut meo = triangulation.meo.clone();
                meo.sort_unstable();
                assert_eq!(meo, (0..size).collect::<Vec<_>>());

                assert!(graph.iter_edges().all(|edge| chordal.has_edge(edge)));
                assert_eq!(triangulation.fill_edges, chordal.edge_difference(&graph));
                assert_eq!(
                    chordal.edge_count(),
                    graph.edge_count() + triangulation.fill_edges.len()
                );
                assert!(is_chordal_naive(chordal));

                for &fill_edge in triangulation.fill_edges.iter() {
                    let mut smaller = chordal.clone();
                    smaller.remove_edge(fill_edge);
                    assert!(
                        !is_chordal_naive(&smaller),
                        "fill edge {fill_edge:?} is not needed in {graph:?}"
                    );
                }

                let generators: HashSet<_> = triangulation.generators.iter().collect();
                assert_eq!(generators.len(), triangulation.generators.len());
                assert!(triangulation
                    .meo
                    .first()
                    .map_or(true, |first| !generators.contains(first)));
            }
        }
    }
}
