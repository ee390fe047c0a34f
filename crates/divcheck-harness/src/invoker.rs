use std::fmt;
use std::time::Duration;

use crate::CaseError;
use crate::debugger::DebugSession;
use crate::session::{TargetSession, with_timeout};

/// Trait for fixed-width integers returned by target functions.
pub trait TargetInt: Copy + Into<i128> + TryFrom<i128> {
    /// Name of the integer type.
    const TYPE_NAME: &'static str;
}

macro_rules! impl_target_int {
    ($($ty:ty),*) => {
        $(
            impl TargetInt for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);
            }
        )*
    };
}

impl_target_int!(u8, u16, u32, u64, i8, i16, i32, i64);

/// Invoker of functions within the halted target.
///
/// Calls are evaluated within the target's current execution context, and
/// return without leaving the target running.
pub struct TargetInvoker<'a, S> {
    session: &'a mut TargetSession<S>,
    timeout: Option<Duration>,
}

impl<'a, S: DebugSession> TargetInvoker<'a, S> {
    /// Creates a new [TargetInvoker] over the given session.
    pub fn new(session: &'a mut TargetSession<S>) -> Self {
        Self {
            session,
            timeout: None,
        }
    }

    /// Specifies the maximum duration of a single invocation.
    ///
    /// `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Calls `symbol(args...)` within the target, and returns its result
    /// coerced to `T`.
    #[tracing::instrument(name = "Invoke", skip(self), fields(ty = T::TYPE_NAME))]
    pub async fn invoke<T: TargetInt>(
        &mut self,
        symbol: &str,
        args: &[u64],
    ) -> Result<T, CaseError<S::Error>> {
        let expression = CallExpr { symbol, args }.to_string();

        let timeout = self.timeout;
        let evaluation = self.session.debug_session_mut().evaluate(&expression);

        let value = with_timeout(timeout, evaluation)
            .await
            .map_err(CaseError::<S::Error>::Timeout)?
            .map_err(|source| CaseError::Evaluation { expression, source })?;

        tracing::debug!(value = value.as_str(), "evaluated");

        coerce(&value)
    }
}

/// Function call expression.
struct CallExpr<'a> {
    symbol: &'a str,
    args: &'a [u64],
}

impl fmt::Display for CallExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.symbol)?;

        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }

        f.write_str(")")
    }
}

/// Coerces the textual value of an evaluation to `T`.
///
/// Only the leading token is considered, so that character values (e.g.,
/// `65 'A'`) are accepted as well.
fn coerce<T: TargetInt, E>(value: &str) -> Result<T, CaseError<E>> {
    let conversion_error = || CaseError::Conversion {
        value: value.to_owned(),
        ty: T::TYPE_NAME,
    };

    let token = value.split_whitespace().next().ok_or_else(conversion_error)?;

    let parsed = match token.strip_prefix("0x") {
        Some(hex) => i128::from_str_radix(hex, 16),
        None => token.parse::<i128>(),
    };

    parsed
        .ok()
        .and_then(|v| T::try_from(v).ok())
        .ok_or_else(conversion_error)
}
