use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use regex::Regex;
use crate::cache::{replay, GenericCache};
use crate::config::PolicyKind;
use crate::error::{Result, SimulationError};
use crate::generator::answers_dir;
use crate::io::{read_answer_file, read_trace_file};

/// A trace file and the answer it should produce for one policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCasePaths {
    pub name: String,
    pub trace: PathBuf,
    pub answer: PathBuf,
}

/// Finds the cases in a directory laid out by [`write_cases`](crate::generator::write_cases).
///
/// Every file named `<n>.txt` directly inside `dir` is a trace, paired with
/// `dir/answers/<policy>/<n>.txt`. Cases are returned in numeric order.
pub fn discover_cases(dir: impl AsRef<Path>, policy: PolicyKind) -> Result<Vec<TestCasePaths>> {
    let dir = dir.as_ref();
    let pattern = Regex::new(r"^(?P<case>[0-9]+)\.txt$")?;
    let answers = answers_dir(dir, policy);
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Ok(file_name) = entry.file_name().into_string() else {
            continue;
        };
        if let Some(case) = pattern.captures(&file_name).and_then(|c| c.name("case")) {
            names.push((case.as_str().to_string(), file_name.clone()));
        }
    }
    // Numeric order without parsing: shorter digit strings first, then lexicographic
    names.sort_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    let mut out = Vec::with_capacity(names.len());
    for (name, file_name) in names {
        let answer = answers.join(&file_name);
        if !answer.is_file() {
            return Err(SimulationError::MissingAnswer(answer));
        }
        out.push(TestCasePaths {
            name,
            trace: dir.join(&file_name),
            answer,
        });
    }
    Ok(out)
}

/// The outcome of checking one case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    pub case: TestCasePaths,
    pub accesses: usize,
    pub expected: u64,
    pub actual: u64,
    pub time: Duration,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

/// Simulates one case and compares the hit count with its stored answer
pub fn verify_case(case: &TestCasePaths, policy: PolicyKind) -> Result<CaseOutcome> {
    let trace = read_trace_file(&case.trace)?;
    let expected = read_answer_file(&case.answer)?;
    let start = Instant::now();
    let mut cache = GenericCache::new(policy, trace.capacity, &trace.keys);
    let actual = replay(&mut cache, &trace.keys).hits;
    Ok(CaseOutcome {
        case: case.clone(),
        accesses: trace.keys.len(),
        expected,
        actual,
        time: start.elapsed(),
    })
}

/// Verifies cases on up to `workers` threads.
///
/// Cases are independent, so workers just take the next unclaimed case until none are left and
/// send each outcome back. Outcomes are returned in the order of `cases`; if any case could not
/// be read, the error for the first such case is returned instead.
pub fn verify_cases(cases: &[TestCasePaths], policy: PolicyKind, workers: usize) -> Result<Vec<CaseOutcome>> {
    let workers = workers.clamp(1, cases.len().max(1));
    let next = AtomicUsize::new(0);
    let (sender, receiver) = mpsc::channel();
    thread::scope(|scope| {
        for _ in 0..workers {
            let sender = sender.clone();
            let next = &next;
            scope.spawn(move || loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                let Some(case) = cases.get(index) else {
                    break;
                };
                if sender.send((index, verify_case(case, policy))).is_err() {
                    break;
                }
            });
        }
    });
    drop(sender);
    let mut outcomes: Vec<Option<Result<CaseOutcome>>> = cases.iter().map(|_| None).collect();
    for (index, outcome) in receiver {
        outcomes[index] = Some(outcome);
    }
    outcomes.into_iter().flatten().collect()
}
