use std::fmt;
use std::num::NonZeroU64;

/// Divisor used by every generated case.
pub const DIVISOR: NonZeroU64 = match NonZeroU64::new(10) {
    Some(divisor) => divisor,
    None => unreachable!(),
};

/// Dividends probing the edge of a 32-bit unsigned representation.
pub const BOUNDARY_DIVIDENDS: [u64; 3] = [
    (1 << 32) - 1, // 4294967295
    (1 << 32) - 5, // 4294967291
    (1 << 32) - 10, // 4294967286
];

/// Test case, holding the inputs of the tested routine as well as its
/// expected result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestCase {
    dividend: u64,
    divisor: NonZeroU64,
    expected: u64,
}

impl TestCase {
    /// Creates a new [TestCase].
    ///
    /// The expected result is computed eagerly by the [reference
    /// oracle](crate::oracle).
    pub fn new(dividend: u64, divisor: NonZeroU64) -> Self {
        Self {
            dividend,
            divisor,
            expected: crate::oracle::expected(dividend, divisor),
        }
    }

    /// Returns the dividend given to the tested routine.
    pub const fn dividend(&self) -> u64 {
        self.dividend
    }

    /// Returns the divisor given to the tested routine.
    pub const fn divisor(&self) -> u64 {
        self.divisor.get()
    }

    /// Returns the expected result of the tested routine.
    pub const fn expected(&self) -> u64 {
        self.expected
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} -> {}", self.dividend, self.divisor, self.expected)
    }
}

/// Generates the test cases, in a deterministic order:
/// 1. every dividend in `0..=255`,
/// 2. the [boundary dividends](BOUNDARY_DIVIDENDS).
///
/// All of them use [DIVISOR].
pub fn generate_cases() -> Vec<TestCase> {
    (0..=u64::from(u8::MAX))
        .chain(BOUNDARY_DIVIDENDS)
        .map(|dividend| TestCase::new(dividend, DIVISOR))
        .collect()
}
