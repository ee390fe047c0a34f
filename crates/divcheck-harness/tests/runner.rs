// Once clippy takes `clippy.toml` into account (for `tests` targets),
// we can remove these.
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

mod common;

use std::time::Duration;

use divcheck_harness::case::{TestCase, generate_cases};
use divcheck_harness::debugger::RemoteEndpoint;
use divcheck_harness::report::Outcome;
use divcheck_harness::runner::{RunConfig, TestRunner};
use divcheck_harness::session::{Backend, SessionConfig};
use divcheck_harness::{CaseError, SetupError};
use test_log::test;

use crate::common::{FakeDebugger, FakeTarget, wrapping_divide_and_round};

fn local_config() -> RunConfig {
    RunConfig::new(SessionConfig::new("divround.elf", Backend::Local))
}

fn remote_config(port: u16) -> RunConfig {
    let endpoint = RemoteEndpoint::new("localhost", port);
    RunConfig::new(SessionConfig::new(
        "divround.elf",
        Backend::remote(endpoint),
    ))
}

#[test(tokio::test)]
async fn correct_routine_passes_every_case() {
    let (debugger, interactions) = FakeDebugger::new(FakeTarget::default());

    let cases = generate_cases();
    let report = TestRunner::new(debugger, local_config()).run(&cases).await;

    assert!(report.is_success());
    assert!(report.fatal().is_none());
    assert_eq!(report.passed(), cases.len());
    assert_eq!(report.records().len(), cases.len());

    let interactions = interactions.lock().unwrap();
    assert_eq!(interactions.launches, 1);
    assert_eq!(interactions.runs, 1);
    assert_eq!(interactions.entry_hits, 1);
    assert_eq!(interactions.breakpoints, ["main"]);
    assert_eq!(interactions.evaluations.len(), cases.len());
    assert_eq!(
        interactions.evaluations[5],
        "divide_and_round_to_nearest_int(5, 10)"
    );
    assert_eq!(
        interactions.evaluations[256],
        "divide_and_round_to_nearest_int(4294967295, 10)"
    );
    assert_eq!(interactions.terminations, 1);
}

#[test(tokio::test)]
async fn wrapping_routine_fails_at_the_32bit_boundary() {
    let target = FakeTarget {
        routine: wrapping_divide_and_round,
        ..FakeTarget::default()
    };
    let (debugger, interactions) = FakeDebugger::new(target);

    let cases = generate_cases();
    let report = TestRunner::new(debugger, local_config()).run(&cases).await;

    assert!(!report.is_success());
    assert!(report.fatal().is_none());

    // every case is attempted despite the failures
    assert_eq!(report.records().len(), cases.len());
    assert_eq!(report.failed(), 2);

    let failures = report
        .failures()
        .map(|r| match r.outcome {
            Outcome::Failed(CaseError::Mismatch { actual, expected }) => {
                (r.case.dividend(), actual, expected)
            }
            _ => panic!("unexpected outcome for {}", r.case),
        })
        .collect::<Vec<_>>();

    assert_eq!(
        failures,
        [(4_294_967_295, 0, 429_496_730), (4_294_967_291, 0, 429_496_729)]
    );

    assert_eq!(interactions.lock().unwrap().terminations, 1);
}

#[test(tokio::test)]
async fn unreachable_remote_aborts_before_any_case() {
    let (debugger, interactions) = FakeDebugger::new(FakeTarget::default());

    let report = TestRunner::new(debugger, remote_config(1))
        .run(&generate_cases())
        .await;

    assert!(!report.is_success());
    assert!(report.records().is_empty());

    match report.fatal() {
        Some(SetupError::Connect { endpoint, .. }) => {
            assert_eq!(endpoint, &RemoteEndpoint::new("localhost", 1));
        }
        other => panic!("unexpected fatal error: {other:?}"),
    }

    let interactions = interactions.lock().unwrap();
    assert_eq!(interactions.connects, 1);
    assert_eq!(interactions.resets, 0);
    assert!(interactions.breakpoints.is_empty());
    assert!(interactions.evaluations.is_empty());
}

#[test(tokio::test)]
async fn remote_backend_resets_once() {
    let (debugger, interactions) = FakeDebugger::new(FakeTarget::default());

    let report = TestRunner::new(debugger, remote_config(2331))
        .run(&generate_cases())
        .await;

    assert!(report.is_success());

    let interactions = interactions.lock().unwrap();
    assert_eq!(interactions.connects, 1);
    assert_eq!(interactions.resets, 1);
    assert_eq!(interactions.resumes, 1);
    assert_eq!(interactions.runs, 0);
    assert_eq!(interactions.entry_hits, 1);
    assert_eq!(interactions.terminations, 1);
}

#[test(tokio::test)]
async fn missing_entry_symbol_aborts_the_run() {
    let target = FakeTarget {
        symbols: vec!["divide_and_round_to_nearest_int"],
        ..FakeTarget::default()
    };
    let (debugger, interactions) = FakeDebugger::new(target);

    let report = TestRunner::new(debugger, local_config())
        .run(&generate_cases())
        .await;

    assert!(report.records().is_empty());
    assert!(matches!(
        report.fatal(),
        Some(SetupError::Breakpoint { symbol, .. }) if symbol == "main"
    ));
    assert!(interactions.lock().unwrap().evaluations.is_empty());
}

#[test(tokio::test)]
async fn exiting_target_never_reaches_entry() {
    let target = FakeTarget {
        exits_before_entry: true,
        ..FakeTarget::default()
    };
    let (debugger, _) = FakeDebugger::new(target);

    let report = TestRunner::new(debugger, local_config())
        .run(&generate_cases())
        .await;

    assert!(report.records().is_empty());
    assert!(matches!(
        report.fatal(),
        Some(SetupError::EntryNotReached { .. })
    ));
}

#[test(tokio::test)]
async fn unresolved_function_fails_each_case() {
    let (debugger, interactions) = FakeDebugger::new(FakeTarget::default());

    let cases = [TestCase::new(1, divcheck_harness::case::DIVISOR); 3];
    let config = local_config().with_function_symbol("divide_and_round");

    let report = TestRunner::new(debugger, config).run(&cases).await;

    assert!(report.fatal().is_none());
    assert_eq!(report.records().len(), 3);
    assert!(report.records().iter().all(|r| matches!(
        &r.outcome,
        Outcome::Failed(CaseError::Evaluation { expression, .. })
            if expression == "divide_and_round(1, 10)"
    )));

    let interactions = interactions.lock().unwrap();
    assert_eq!(interactions.evaluations.len(), 3);
    assert_eq!(interactions.terminations, 1);
}

#[test(tokio::test)]
async fn unconvertible_value_fails_each_case() {
    let target = FakeTarget {
        raw_value: Some("4294967296"),
        ..FakeTarget::default()
    };
    let (debugger, _) = FakeDebugger::new(target);

    let report = TestRunner::new(debugger, local_config())
        .run(&generate_cases()[..4])
        .await;

    assert_eq!(report.failed(), 4);
    assert!(report.records().iter().all(|r| r.actual.is_none()
        && matches!(
            &r.outcome,
            Outcome::Failed(CaseError::Conversion { value, ty: "u32" }) if value == "4294967296"
        )));
}

#[test(tokio::test)]
async fn hanging_evaluation_times_out() {
    let target = FakeTarget {
        hang_on_evaluation: true,
        ..FakeTarget::default()
    };
    let (debugger, interactions) = FakeDebugger::new(target);

    let config = local_config().with_case_timeout(Some(Duration::from_millis(10)));

    let report = TestRunner::new(debugger, config)
        .run(&generate_cases()[..2])
        .await;

    assert_eq!(report.records().len(), 2);
    assert!(report.records().iter().all(|r| matches!(
        r.outcome,
        Outcome::Failed(CaseError::Timeout(_))
    )));

    // the stuck session is dropped without asking the debugger to exit
    let interactions = interactions.lock().unwrap();
    assert_eq!(interactions.evaluations.len(), 2);
    assert_eq!(interactions.terminations, 0);
    assert_eq!(interactions.dropped_sessions, 1);
}

#[test(tokio::test)]
async fn hanging_setup_times_out() {
    let target = FakeTarget {
        hang_on_launch: true,
        ..FakeTarget::default()
    };
    let (debugger, interactions) = FakeDebugger::new(target);

    let session = SessionConfig::new("divround.elf", Backend::Local)
        .with_timeout(Some(Duration::from_millis(10)));

    let report = TestRunner::new(debugger, RunConfig::new(session))
        .run(&generate_cases())
        .await;

    assert!(report.records().is_empty());
    assert!(matches!(report.fatal(), Some(SetupError::Timeout(_))));
    assert!(interactions.lock().unwrap().evaluations.is_empty());
}

#[test(tokio::test)]
async fn no_case_no_session() {
    let (debugger, interactions) = FakeDebugger::new(FakeTarget::default());

    let report = TestRunner::new(debugger, local_config()).run(&[]).await;

    assert!(report.is_success());
    assert_eq!(interactions.lock().unwrap().launches, 0);
}
