use crate::case::TestCase;
use crate::{CaseError, SetupError};

/// Outcome of a test run.
///
/// Case records are kept in the order the cases were run.
#[derive(Debug)]
pub struct Report<E> {
    records: Vec<CaseRecord<E>>,
    fatal: Option<SetupError<E>>,
}

/// Outcome of a single test case.
#[derive(Debug)]
pub struct CaseRecord<E> {
    /// Test case that was run.
    pub case: TestCase,

    /// Value returned by the target, if any.
    pub actual: Option<i128>,

    /// Whether the case passed.
    pub outcome: Outcome<E>,
}

impl<E> CaseRecord<E> {
    /// Returns whether the case passed.
    pub const fn passed(&self) -> bool {
        matches!(self.outcome, Outcome::Passed)
    }
}

/// Outcome of a single test case.
#[derive(Debug)]
pub enum Outcome<E> {
    /// The target returned the expected value.
    Passed,

    /// The case failed.
    Failed(CaseError<E>),
}

impl<E> Default for Report<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Report<E> {
    /// Creates an empty report.
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            fatal: None,
        }
    }

    /// Records the result of a single test case.
    pub fn record(&mut self, case: TestCase, result: Result<i128, CaseError<E>>) {
        let record = match result {
            Ok(actual) if actual == i128::from(case.expected()) => CaseRecord {
                case,
                actual: Some(actual),
                outcome: Outcome::Passed,
            },
            Ok(actual) => CaseRecord {
                case,
                actual: Some(actual),
                outcome: Outcome::Failed(CaseError::Mismatch {
                    actual,
                    expected: i128::from(case.expected()),
                }),
            },
            Err(e) => CaseRecord {
                case,
                actual: None,
                outcome: Outcome::Failed(e),
            },
        };

        self.records.push(record);
    }

    /// Records the fatal error that aborted the run.
    pub fn abort(&mut self, e: SetupError<E>) {
        self.fatal = Some(e);
    }

    /// Returns the records of every case that was run.
    pub fn records(&self) -> &[CaseRecord<E>] {
        &self.records
    }

    /// Returns the fatal error that aborted the run, if any.
    pub const fn fatal(&self) -> Option<&SetupError<E>> {
        self.fatal.as_ref()
    }

    /// Returns the number of passed cases.
    pub fn passed(&self) -> usize {
        self.records.iter().filter(|r| r.passed()).count()
    }

    /// Returns the number of failed cases.
    pub fn failed(&self) -> usize {
        self.records.len() - self.passed()
    }

    /// Returns the records of the failed cases.
    pub fn failures(&self) -> impl Iterator<Item = &CaseRecord<E>> {
        self.records.iter().filter(|r| !r.passed())
    }

    /// Returns whether the run completed and every case passed.
    pub fn is_success(&self) -> bool {
        self.fatal.is_none() && self.records.iter().all(CaseRecord::passed)
    }
}
