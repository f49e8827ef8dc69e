//! # EvictLib
//!
//! EvictLib computes exact hit counts for a cache of fixed capacity over an access trace, under
//! two eviction policies: least recently used, and Belady's optimal policy, which knows the whole
//! trace in advance. The counts serve as ground truth when validating a real cache
//! implementation, and the Belady count bounds what any online policy can achieve.
//!
//! The engines are pure: a capacity and a trace go in, a hit count comes out.
//!
//! ```
//! assert_eq!(evictlib::lru_hits(2, &[1, 2, 1, 3, 1]).unwrap(), 2);
//! assert_eq!(evictlib::belady_hits(2, &[1, 2, 3, 1, 2]).unwrap(), 1);
//! ```
//!
//! Around the engines it provides the plumbing for the usual workflow: reading and writing trace
//! files, generating seeded test cases with answer files, and verifying stored answers.

/// Contains the policy enum over all engines, and the pure hit-counting entry points
pub mod cache;

/// Contains the validated capacity type and the policy selection, which can be read from JSON
pub mod config;

pub mod error;

/// Contains the seeded generator for trace files and their answers
pub mod generator;

pub mod io;

/// Contains the provided eviction policies, with a trait for driving them over a trace
pub mod replacement_policies;

/// Contains slow, obviously correct versions of each policy, used to cross-check the real ones
pub mod reference;

/// Contains the simulator used to run several policies over a trace file
pub mod simulator;

/// Contains the trace and answer file formats
pub mod trace;

#[cfg(test)]
mod test;

/// Contains utilities for discovering and verifying test cases
pub mod util;

pub use cache::{belady_hits, hits, lru_hits};
pub use config::{Capacity, PolicyKind};
pub use error::{Result, SimulationError};
