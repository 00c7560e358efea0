//! Second order random walks on typed weighted graphs.
//!
//! [WalksParameters] describes a batch of walks, [WalkSampler] runs it on any graph implementing
//! [WalkGraphT](crate::graph::WalkGraphT), and the [Walker] extension gives `graph.walk(&parameters)`.
//!
//! ```ignore
//! let parameters = WalksParameters::new(80)?
//!     .set_iterations(Some(10))?
//!     .set_return_weight(Some(0.5))?
//!     .set_explore_weight(Some(2.))?;
//! let walks = graph.walk(&parameters)?;
//! ```

pub mod params;
pub mod sampler;
pub mod stats;
pub mod transition;

pub use params::{SingleWalkParameters, WalkWeights, WalksParameters, DEFAULT_RANDOM_STATE};
pub use sampler::{WalkSampler, Walker};
pub use stats::WalksSummary;
pub use transition::{get_transition_probabilities, get_transition_weights, PreviousStep};
