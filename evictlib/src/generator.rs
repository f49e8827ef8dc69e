use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::cache;
use crate::config::{Capacity, PolicyKind};
use crate::error::{Result, SimulationError};
use crate::io::{write_answer_file, write_trace_file};
use crate::reference;
use crate::trace::TraceFile;

/// Which engines compute the answer files
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum AnswerSource {
    /// The indexed policies, fast enough for the default trace sizes
    #[default]
    Indexed,
    /// The naive reference engines. Independent of the indexed policies, but quadratic, so only
    /// usable with small traces.
    Reference,
}

/// Ranges each generated case draws its parameters from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorParams {
    pub capacity: RangeInclusive<usize>,
    pub length: RangeInclusive<usize>,
    /// Keys of a case are drawn uniformly from `0..bound`, with `bound` drawn from this range
    pub key_bound: RangeInclusive<i64>,
    pub answers: AnswerSource,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            capacity: 1..=10_000,
            length: 1..=1_000_000,
            key_bound: 1..=1_000,
            answers: AnswerSource::Indexed,
        }
    }
}

impl GeneratorParams {
    /// Checks that every range is non-empty and can only produce a valid capacity and key bound
    pub fn validate(&self) -> Result<()> {
        if self.capacity.is_empty() || self.length.is_empty() || self.key_bound.is_empty() {
            return Err(SimulationError::InvalidParameters(format!("empty range in {self:?}")));
        }
        Capacity::new(*self.capacity.start())?;
        if *self.key_bound.start() < 1 {
            return Err(SimulationError::InvalidParameters(format!(
                "key bound must be at least 1, got {}",
                self.key_bound.start()
            )));
        }
        Ok(())
    }
}

/// Draws one random trace
pub fn generate_trace<R: Rng>(params: &GeneratorParams, rng: &mut R) -> Result<TraceFile> {
    params.validate()?;
    let capacity = Capacity::new(rng.gen_range(params.capacity.clone()))?;
    let length = rng.gen_range(params.length.clone());
    let bound = rng.gen_range(params.key_bound.clone());
    let keys = (0..length).map(|_| rng.gen_range(0..bound)).collect();
    Ok(TraceFile::new(capacity, keys))
}

/// Computes the expected hit count of a trace under a policy
pub fn answer(trace: &TraceFile, policy: PolicyKind, source: AnswerSource) -> u64 {
    match (source, policy) {
        (AnswerSource::Indexed, _) => {
            let mut cache = cache::GenericCache::new(policy, trace.capacity, &trace.keys);
            cache::replay(&mut cache, &trace.keys).hits
        }
        (AnswerSource::Reference, PolicyKind::LeastRecentlyUsed) => {
            reference::lru_hits(trace.capacity, &trace.keys)
        }
        (AnswerSource::Reference, PolicyKind::Belady) => {
            reference::belady_hits(trace.capacity, &trace.keys)
        }
    }
}

/// Generates `number` cases into `dir`.
///
/// Case `i` is written to `dir/i.txt`, and its answer for each policy `p` to
/// `dir/answers/p/i.txt`. Existing files with the same names are overwritten; nothing else in
/// `dir` is touched. The same seed always produces the same cases.
///
/// returns: the paths of the written trace files, in case order
pub fn write_cases(
    dir: impl AsRef<Path>,
    number: usize,
    policies: &[PolicyKind],
    params: &GeneratorParams,
    seed: u64,
) -> Result<Vec<PathBuf>> {
    params.validate()?;
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    for policy in policies {
        fs::create_dir_all(answers_dir(dir, *policy))?;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut written = Vec::with_capacity(number);
    for i in 0..number {
        let trace = generate_trace(params, &mut rng)?;
        let file_name = format!("{i}.txt");
        let trace_path = dir.join(&file_name);
        write_trace_file(&trace_path, &trace)?;
        for policy in policies {
            let hits = answer(&trace, *policy, params.answers);
            write_answer_file(answers_dir(dir, *policy).join(&file_name), hits)?;
        }
        written.push(trace_path);
    }
    Ok(written)
}

/// Directory holding the answers for one policy
pub fn answers_dir(dir: &Path, policy: PolicyKind) -> PathBuf {
    dir.join("answers").join(policy.as_str())
}
