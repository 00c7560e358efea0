//! Statistical helpers

pub mod correlation;
