use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::num::NonZeroUsize;
use std::path::Path;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use crate::error::{Result, SimulationError};

/// A validated cache capacity, always at least one slot
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capacity(NonZeroUsize);

impl Capacity {
    /// Validates a capacity, rejecting zero
    ///
    /// # Examples
    ///
    /// ```
    /// use evictlib::config::Capacity;
    /// assert_eq!(Capacity::new(4).unwrap().get(), 4);
    /// assert!(Capacity::new(0).is_err());
    /// ```
    pub fn new(capacity: usize) -> Result<Self> {
        NonZeroUsize::new(capacity)
            .map(Capacity)
            .ok_or(SimulationError::InvalidCapacity(0))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

/// Capacities read from trace files are signed, so negative values surface as a capacity error
/// rather than a parse error
impl TryFrom<i64> for Capacity {
    type Error = SimulationError;

    fn try_from(value: i64) -> Result<Self> {
        usize::try_from(value)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Capacity)
            .ok_or(SimulationError::InvalidCapacity(value))
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The eviction policy to simulate - lru or belady (also accepted as perfect or optimal)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum PolicyKind {
    #[serde(alias = "lru")]
    #[value(name = "lru")]
    LeastRecentlyUsed,
    #[serde(alias = "belady", alias = "perfect", alias = "optimal")]
    #[value(name = "belady", aliases = ["perfect", "optimal"])]
    Belady,
}

impl PolicyKind {
    /// Every supported policy, in the order results are reported
    pub const ALL: [PolicyKind; 2] = [PolicyKind::LeastRecentlyUsed, PolicyKind::Belady];

    /// Short lowercase name, also used as the answers sub-directory for the policy
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::LeastRecentlyUsed => "lru",
            PolicyKind::Belady => "belady",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of policies a [`Simulator`](crate::simulator::Simulator) runs over each trace.
/// Defaults to both policies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_policies")]
    pub policies: Vec<PolicyKind>,
}

fn default_policies() -> Vec<PolicyKind> {
    PolicyKind::ALL.to_vec()
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            policies: default_policies(),
        }
    }
}

impl SimulationConfig {
    /// Builds a configuration from the requested policies, dropping repeats. An empty request
    /// means every policy.
    pub fn new(policies: impl IntoIterator<Item = PolicyKind>) -> Self {
        let mut unique = Vec::new();
        for policy in policies {
            if !unique.contains(&policy) {
                unique.push(policy);
            }
        }
        if unique.is_empty() {
            Self::default()
        } else {
            SimulationConfig { policies: unique }
        }
    }
}

/// Reads a [`SimulationConfig`] from a JSON file, e.g. `{"policies": ["lru", "belady"]}`
pub fn read_config(path: impl AsRef<Path>) -> Result<SimulationConfig> {
    let file = File::open(path)?;
    let config: SimulationConfig = serde_json::from_reader(BufReader::new(file))?;
    Ok(SimulationConfig::new(config.policies))
}
