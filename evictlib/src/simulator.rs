use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};
use crate::cache::{replay, GenericCache};
use crate::config::{Capacity, PolicyKind, SimulationConfig};
use crate::trace::TraceFile;

/// The simulator runs every configured policy over a trace and collects the results.
///
/// It supports calling simulate multiple times; each call replaces the results with those of the
/// new trace, and adds to the total time spent simulating
pub struct Simulator {
    policies: Vec<PolicyKind>,
    result: SimulationResult,
    simulation_time: Duration,
}

/// The result of simulating one trace. Can be serialised for output
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct SimulationResult {
    pub capacity: Option<Capacity>,
    pub accesses: u64,
    pub policies: Vec<PolicyResult>,
}

/// The result for an individual policy
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct PolicyResult {
    pub policy: PolicyKind,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl SimulationResult {
    /// The result for a given policy, if it was simulated
    pub fn get(&self, policy: PolicyKind) -> Option<&PolicyResult> {
        self.policies.iter().find(|r| r.policy == policy)
    }
}

impl Simulator {

    /// Creates a new simulator for a given configuration
    ///
    /// # Arguments
    ///
    /// * `config`: The policies to run, usually built from command line flags
    ///
    /// returns: Simulator
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            policies: config.policies.clone(),
            result: SimulationResult {
                capacity: None,
                accesses: 0,
                policies: Vec::new(),
            },
            simulation_time: Duration::new(0, 0),
        }
    }

    /// Simulates every configured policy over a trace, each with a fresh cache
    ///
    /// # Examples
    ///
    /// ```
    /// use evictlib::config::{PolicyKind, SimulationConfig};
    /// use evictlib::simulator::Simulator;
    /// use evictlib::trace::parse_trace;
    ///
    /// let trace = parse_trace(b"2 5 1 2 3 1 2").unwrap();
    /// let mut simulator = Simulator::new(&SimulationConfig::default());
    /// let result = simulator.simulate(&trace);
    /// assert_eq!(result.get(PolicyKind::LeastRecentlyUsed).unwrap().hits, 0);
    /// assert_eq!(result.get(PolicyKind::Belady).unwrap().hits, 1);
    /// ```
    pub fn simulate(&mut self, trace: &TraceFile) -> &SimulationResult {
        let start = Instant::now();
        let policies = self
            .policies
            .iter()
            .map(|&policy| {
                let mut cache = GenericCache::new(policy, trace.capacity, &trace.keys);
                let counts = replay(&mut cache, &trace.keys);
                PolicyResult {
                    policy: cache.policy(),
                    hits: counts.hits,
                    misses: counts.misses,
                    evictions: counts.evictions,
                }
            })
            .collect();
        self.simulation_time += start.elapsed();
        self.result = SimulationResult {
            capacity: Some(trace.capacity),
            accesses: trace.keys.len() as u64,
            policies,
        };
        &self.result
    }

    /// Gets the wall-clock execution time for processing
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }
}
