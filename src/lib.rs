//! lib target
//!
//! Second order random walks on typed, weighted, directed or undirected graphs.
//! See [walks] for the walk parameters and the sampler, [graph] for the graph representation.

pub mod error;

pub mod graph;

pub mod walks;

pub mod generators;

pub mod io;

pub mod tools;

pub mod prelude;
