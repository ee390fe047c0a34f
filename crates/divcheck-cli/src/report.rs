use std::error::Error;

use divcheck_harness::CaseError;
use divcheck_harness::case::TestCase;
use divcheck_harness::report::{CaseRecord, Outcome, Report};

use kdl::{KdlDocument, KdlEntry, KdlNode};

/// Dumps the outcome of a test run as a KDL document.
pub fn report_to_kdl<E: Error + 'static>(report: &Report<E>) -> KdlDocument {
    let mut kdl = KdlDocument::new();

    kdl.nodes_mut().push({
        let mut node = KdlNode::new("summary");
        node.entries_mut().extend([
            KdlEntry::new_prop("passed", report.passed() as i128),
            KdlEntry::new_prop("failed", report.failed() as i128),
            KdlEntry::new_prop("total", report.records().len() as i128),
        ]);
        node
    });

    if let Some(fatal) = report.fatal() {
        kdl.nodes_mut().push({
            let mut node = KdlNode::new("fatal");
            node.entries_mut().push(fatal.to_string().into());

            let mut source = fatal.source();
            while let Some(cause) = source {
                node.ensure_children()
                    .nodes_mut()
                    .push(dump_message("caused-by", cause));
                source = cause.source();
            }

            node
        });
    }

    kdl.nodes_mut()
        .extend(report.records().iter().map(dump_record));

    kdl
}

/// Dumps the test cases as a KDL document.
pub fn cases_to_kdl(cases: &[TestCase]) -> KdlDocument {
    let mut kdl = KdlDocument::new();

    kdl.nodes_mut().extend(cases.iter().map(dump_case));

    kdl
}

fn dump_case(case: &TestCase) -> KdlNode {
    let mut node = KdlNode::new("case");

    node.entries_mut().extend([
        KdlEntry::new(i128::from(case.dividend())),
        KdlEntry::new_prop("divisor", i128::from(case.divisor())),
        KdlEntry::new_prop("expected", i128::from(case.expected())),
    ]);

    node
}

fn dump_record<E: Error + 'static>(record: &CaseRecord<E>) -> KdlNode {
    let mut node = dump_case(&record.case);

    if let Some(actual) = record.actual {
        node.entries_mut().push(KdlEntry::new_prop("actual", actual));
    }

    let (outcome, error) = match &record.outcome {
        Outcome::Passed => ("pass", None),
        Outcome::Failed(CaseError::Mismatch { .. }) => ("mismatch", None),
        Outcome::Failed(e @ CaseError::Evaluation { .. }) => ("evaluation-error", Some(e)),
        Outcome::Failed(e @ CaseError::Conversion { .. }) => ("conversion-error", Some(e)),
        Outcome::Failed(e @ CaseError::Timeout(_)) => ("timeout", Some(e)),
    };

    node.entries_mut()
        .push(KdlEntry::new_prop("outcome", outcome));

    if let Some(e) = error {
        node.entries_mut()
            .push(KdlEntry::new_prop("error", error_chain(e)));
    }

    node
}

fn dump_message(name: &str, e: &dyn Error) -> KdlNode {
    let mut node = KdlNode::new(name);
    node.entries_mut().push(e.to_string().into());
    node
}

/// Joins the messages of an error and its sources.
fn error_chain(e: &dyn Error) -> String {
    let mut message = e.to_string();

    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
