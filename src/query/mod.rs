//! Query synchronization: request descriptors and their sequencing.

mod descriptor;
mod sequencer;

pub use descriptor::{ListParams, RequestDescriptor};
pub use sequencer::Sequencer;
