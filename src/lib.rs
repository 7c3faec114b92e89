//! Clique minimal separator decomposition of undirected graphs.
//!
//! The entry point is [Decomposition]: it computes a minimal triangulation of the graph
//! with MCS-M+ and splits the graph along its clique minimal separators into its unique
//! set of atoms (Berry et al., "An Introduction to Clique Minimal Separator
//! Decomposition", 2010).
//!
//! ```
//! use clique_separators::{
//!     graph::generic::{Adj, ImplGraph},
//!     Decomposition,
//! };
//!
//! // two triangles sharing the edge {1, 2}
//! let graph = Adj::from_edge_labels([(1, 2), (1, 3), (2, 3), (1, 4), (2, 4)]).unwrap();
//! let decomposition = Decomposition::new(&graph).unwrap();
//! assert_eq!(decomposition.separators().len(), 1);
//! assert!(decomposition.separators().contains(&vec![1, 2]));
//! assert_eq!(decomposition.atoms().len(), 2);
//! ```
#![deny(unsafe_op_in_unsafe_fn)]

pub mod decomposition;
pub mod graph;

pub use decomposition::{Config, Decomposition, DecompositionError, Report, TieBreak};
