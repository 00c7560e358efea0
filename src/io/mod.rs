//! Reading graphs from csv edge lists and dumping walks

pub mod csv;
pub mod output;
