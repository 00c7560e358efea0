//! To ease access to most frequently items
//!

pub use crate::error::WalkError;

pub use crate::graph::degrees::get_degree_quant_from_csrmat;
pub use crate::graph::{NodeId, TypedGraph, TypedGraphBuilder, WalkGraphT};

pub use crate::walks::*;

pub use crate::generators::*;

pub use crate::io::{csv::*, output::*};

pub use crate::tools::correlation::*;
