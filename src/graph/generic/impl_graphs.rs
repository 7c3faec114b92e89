pub mod adj;
pub mod impl_petgraph;
