//! The two stages of the decomposition, both working on [Simple](super::simple::Simple)
//! graphs: [triangulation] (MCS-M+) and [atoms].

pub mod atoms;
pub mod triangulation;
