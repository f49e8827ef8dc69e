use std::error::Error;
use std::fs;
use tempfile::TempDir;
use crate::config::{PolicyKind, SimulationConfig};
use crate::error::SimulationError;
use crate::generator::{answers_dir, generate_trace, write_cases, AnswerSource, GeneratorParams};
use crate::io::{read_answer_file, read_trace_file, write_answer_file};
use crate::simulator::Simulator;
use crate::util::{discover_cases, verify_cases};

fn small_params() -> GeneratorParams {
    GeneratorParams {
        capacity: 1..=6,
        length: 0..=300,
        key_bound: 1..=15,
        answers: AnswerSource::Reference,
    }
}

#[test]
fn run_all_generated_examples() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let written = write_cases(dir.path(), 12, &PolicyKind::ALL, &small_params(), 7)?;
    assert_eq!(written.len(), 12);
    for policy in PolicyKind::ALL {
        let cases = discover_cases(dir.path(), policy)?;
        let names: Vec<_> = cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11"]);
        let outcomes = verify_cases(&cases, policy, 4)?;
        assert_eq!(outcomes.len(), 12);
        for outcome in outcomes {
            println!("{policy} case {}: {} hits", outcome.case.name, outcome.actual);
            assert!(outcome.passed(), "{policy} case {} expected {} got {}", outcome.case.name, outcome.expected, outcome.actual);
        }
    }
    Ok(())
}

#[test]
fn detects_wrong_answer() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    write_cases(dir.path(), 3, &[PolicyKind::LeastRecentlyUsed], &small_params(), 11)?;
    let answer = answers_dir(dir.path(), PolicyKind::LeastRecentlyUsed).join("1.txt");
    let correct = read_answer_file(&answer)?;
    write_answer_file(&answer, correct + 1)?;
    let cases = discover_cases(dir.path(), PolicyKind::LeastRecentlyUsed)?;
    let outcomes = verify_cases(&cases, PolicyKind::LeastRecentlyUsed, 1)?;
    let failed: Vec<_> = outcomes.iter().filter(|o| !o.passed()).map(|o| o.case.name.as_str()).collect();
    assert_eq!(failed, ["1"]);
    assert_eq!(outcomes[1].actual, correct);
    Ok(())
}

#[test]
fn missing_answer_is_an_error() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    write_cases(dir.path(), 2, &[PolicyKind::Belady], &small_params(), 3)?;
    match discover_cases(dir.path(), PolicyKind::LeastRecentlyUsed) {
        Err(SimulationError::MissingAnswer(path)) => assert!(path.ends_with("answers/lru/0.txt")),
        other => panic!("expected a missing answer, got {other:?}"),
    }
    Ok(())
}

#[test]
fn unreadable_case_fails_verification() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    write_cases(dir.path(), 2, &[PolicyKind::Belady], &small_params(), 5)?;
    fs::write(dir.path().join("1.txt"), "3 2 1")?;
    let cases = discover_cases(dir.path(), PolicyKind::Belady)?;
    assert!(matches!(
        verify_cases(&cases, PolicyKind::Belady, 2),
        Err(SimulationError::TraceFormat { .. })
    ));
    Ok(())
}

#[test]
fn ignores_unrelated_files() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    write_cases(dir.path(), 2, &PolicyKind::ALL, &small_params(), 5)?;
    fs::write(dir.path().join("notes.txt"), "not a trace")?;
    fs::write(dir.path().join("3.txt.bak"), "1 0")?;
    fs::create_dir(dir.path().join("7.txt"))?;
    assert_eq!(discover_cases(dir.path(), PolicyKind::Belady)?.len(), 2);
    Ok(())
}

#[test]
fn same_seed_same_cases() -> Result<(), Box<dyn Error>> {
    let first = TempDir::new()?;
    let second = TempDir::new()?;
    let params = GeneratorParams { answers: AnswerSource::Indexed, ..small_params() };
    write_cases(first.path(), 4, &PolicyKind::ALL, &params, 42)?;
    write_cases(second.path(), 4, &PolicyKind::ALL, &params, 42)?;
    for i in 0..4 {
        let name = format!("{i}.txt");
        assert_eq!(fs::read(first.path().join(&name))?, fs::read(second.path().join(&name))?);
        for policy in PolicyKind::ALL {
            assert_eq!(
                read_answer_file(answers_dir(first.path(), policy).join(&name))?,
                read_answer_file(answers_dir(second.path(), policy).join(&name))?
            );
        }
    }
    Ok(())
}

#[test]
fn generated_traces_respect_params() -> Result<(), Box<dyn Error>> {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    let params = small_params();
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..50 {
        let trace = generate_trace(&params, &mut rng)?;
        assert!(params.capacity.contains(&trace.capacity.get()));
        assert!(params.length.contains(&trace.keys.len()));
        assert!(trace.keys.iter().all(|k| (0..15).contains(k)));
    }
    Ok(())
}

#[test]
fn rejects_bad_generator_params() {
    let zero_capacity = GeneratorParams { capacity: 0..=4, ..small_params() };
    assert!(matches!(zero_capacity.validate(), Err(SimulationError::InvalidCapacity(0))));
    #[allow(clippy::reversed_empty_ranges)]
    let empty = GeneratorParams { length: 5..=1, ..small_params() };
    assert!(matches!(empty.validate(), Err(SimulationError::InvalidParameters(_))));
    let no_keys = GeneratorParams { key_bound: 0..=3, ..small_params() };
    assert!(matches!(no_keys.validate(), Err(SimulationError::InvalidParameters(_))));
}

#[test]
fn simulator_reads_trace_files() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("trace.txt");
    fs::write(&path, "2 5\n1 2 3 1 2\n")?;
    let trace = read_trace_file(&path)?;
    let mut simulator = Simulator::new(&SimulationConfig::default());
    let result = simulator.simulate(&trace).clone();
    assert_eq!(result.accesses, 5);
    assert_eq!(result.capacity.map(|c| c.get()), Some(2));
    let lru = result.get(PolicyKind::LeastRecentlyUsed).unwrap();
    assert_eq!((lru.hits, lru.misses, lru.evictions), (0, 5, 3));
    let belady = result.get(PolicyKind::Belady).unwrap();
    assert_eq!((belady.hits, belady.misses, belady.evictions), (1, 4, 2));

    // Results survive a trip through the JSON output format
    let json = serde_json::to_string_pretty(&result)?;
    assert_eq!(serde_json::from_str::<crate::simulator::SimulationResult>(&json)?, result);

    // A second trace replaces the first result
    let only_lru = SimulationConfig::new([PolicyKind::LeastRecentlyUsed]);
    let mut simulator = Simulator::new(&only_lru);
    simulator.simulate(&trace);
    let again = simulator.simulate(&read_trace_file(&path)?);
    assert_eq!(again.policies.len(), 1);
    assert!(again.get(PolicyKind::Belady).is_none());
    Ok(())
}

#[test]
fn trace_capacity_far_beyond_its_keys() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("huge.txt");
    fs::write(&path, "1099511627776 3 7 7 7")?;
    let trace = read_trace_file(&path)?;
    assert_eq!(trace.capacity.get() as u64, 1 << 40);
    let mut simulator = Simulator::new(&SimulationConfig::default());
    let result = simulator.simulate(&trace);
    for policy in PolicyKind::ALL {
        let counts = result.get(policy).unwrap();
        assert_eq!(counts.policy, policy);
        assert_eq!((counts.hits, counts.misses, counts.evictions), (2, 1, 0));
    }
    Ok(())
}

#[test]
fn empty_trace_file_is_a_format_error() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("empty.txt");
    fs::write(&path, "")?;
    assert!(matches!(read_trace_file(&path), Err(SimulationError::TraceFormat { .. })));
    assert!(matches!(read_trace_file(dir.path().join("absent.txt")), Err(SimulationError::Io(_))));
    Ok(())
}
