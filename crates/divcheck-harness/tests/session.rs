// Once clippy takes `clippy.toml` into account (for `tests` targets),
// we can remove these.
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

mod common;

use divcheck_harness::debugger::RemoteEndpoint;
use divcheck_harness::invoker::TargetInvoker;
use divcheck_harness::session::{Backend, BackendKind, SessionConfig, SessionManager};
use test_log::test;

use crate::common::{FakeDebugger, FakeTarget};

const ROUTINE: &str = "divide_and_round_to_nearest_int";

#[test(tokio::test)]
async fn establish_is_idempotent() {
    let (debugger, interactions) = FakeDebugger::new(FakeTarget::default());

    let config = SessionConfig::new(
        "divround.elf",
        Backend::remote(RemoteEndpoint::new("localhost", 2331)),
    );

    let mut manager = SessionManager::new(debugger);
    assert!(!manager.is_established());

    let session = manager.establish(&config).await.unwrap();
    assert_eq!(session.backend(), BackendKind::Remote);
    assert_eq!(session.entry().symbol, "main");

    let session = manager.establish(&config).await.unwrap();
    assert_eq!(session.entry().number, 1);
    assert!(manager.is_established());

    {
        let interactions = interactions.lock().unwrap();
        assert_eq!(interactions.launches, 1);
        assert_eq!(interactions.connects, 1);
        assert_eq!(interactions.resets, 1);
        assert_eq!(interactions.breakpoints, ["main"]);
        assert_eq!(interactions.entry_hits, 1);
    }

    manager.teardown().await.unwrap();
    assert_eq!(interactions.lock().unwrap().terminations, 1);
}

#[test(tokio::test)]
async fn custom_entry_symbol() {
    let (debugger, interactions) = FakeDebugger::new(FakeTarget::default());

    let config =
        SessionConfig::new("divround.elf", Backend::Local).with_entry_symbol(ROUTINE);

    let mut manager = SessionManager::new(debugger);
    let session = manager.establish(&config).await.unwrap();

    assert_eq!(session.backend(), BackendKind::Local);
    assert_eq!(session.entry().symbol, ROUTINE);
    assert_eq!(interactions.lock().unwrap().breakpoints, [ROUTINE]);
}

#[test(tokio::test)]
async fn invoking_twice_yields_the_same_result() {
    let (debugger, interactions) = FakeDebugger::new(FakeTarget::default());

    let config = SessionConfig::new("divround.elf", Backend::Local);

    let mut manager = SessionManager::new(debugger);
    let session = manager.establish(&config).await.unwrap();

    let mut invoker = TargetInvoker::new(session);

    let first = invoker.invoke::<u32>(ROUTINE, &[15, 10]).await.unwrap();
    let second = invoker.invoke::<u32>(ROUTINE, &[15, 10]).await.unwrap();

    assert_eq!(first, 2);
    assert_eq!(first, second);

    let boundary = invoker
        .invoke::<u32>(ROUTINE, &[4_294_967_295, 10])
        .await
        .unwrap();
    assert_eq!(boundary, 429_496_730);

    let interactions = interactions.lock().unwrap();
    assert_eq!(interactions.evaluations.len(), 3);
    assert_eq!(interactions.entry_hits, 1);
}

#[test(tokio::test)]
async fn failed_establish_leaves_no_session() {
    let (debugger, interactions) = FakeDebugger::new(FakeTarget::default());

    let config = SessionConfig::new(
        "divround.elf",
        Backend::remote(RemoteEndpoint::new("10.0.0.1", 2331)),
    );

    let mut manager = SessionManager::new(debugger);

    assert!(manager.establish(&config).await.is_err());
    assert!(!manager.is_established());

    manager.teardown().await.unwrap();

    let interactions = interactions.lock().unwrap();
    assert_eq!(interactions.launches, 1);
    assert_eq!(interactions.terminations, 0);
}
