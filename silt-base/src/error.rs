// Structured errors with a small closed set of kinds, so callers can
// match on what went wrong without parsing messages. Everything funnels
// through one private constructor, which gives a single place to set a
// breakpoint that traps any error in the system soon after it exists,
// and which logs each one into the tracing system as it is made. Fresh
// errors capture a backtrace here; errors adopted from libraries keep
// the backtrace recorded at their own origin.

use backtrace_error::DynBacktraceError;
use std::backtrace::Backtrace;
use std::borrow::Cow;
use tracing::error;

#[cfg(test)]
use test_log::test;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // An argument fell outside the representable range.
    BadRange,
    // An input shape or operation this build does not handle.
    Unsupported,
    // A failure adopted from a library, or a broken internal invariant.
    Internal,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    msg: Cow<'static, str>,
    trace: Trace,
}

#[derive(Debug)]
#[allow(dead_code)]
enum Trace {
    Here(Backtrace),
    Adopted(DynBacktraceError),
}

impl Error {
    fn build(kind: ErrorKind, msg: Cow<'static, str>, trace: Trace) -> Error {
        error!(target: "silt", ?kind, "{}", msg);
        Error { kind, msg, trace }
    }

    pub fn new(kind: ErrorKind, msg: impl Into<Cow<'static, str>>) -> Error {
        Error::build(kind, msg.into(), Trace::Here(Backtrace::capture()))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.msg)
    }
}

impl<E: std::error::Error + Send + Sync + 'static> From<E> for Error {
    fn from(e: E) -> Error {
        let msg = e.to_string().into();
        Error::build(
            ErrorKind::Internal,
            msg,
            Trace::Adopted(DynBacktraceError::from(e)),
        )
    }
}

pub fn bad_range(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::new(ErrorKind::BadRange, msg)
}

pub fn unsupported(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::new(ErrorKind::Unsupported, msg)
}

#[test]
fn test_error_kinds() {
    let e = bad_range("start below zero");
    assert_eq!(e.kind(), ErrorKind::BadRange);
    assert_eq!(e.msg(), "start below zero");
    assert_eq!(format!("{e}"), "BadRange: start below zero");

    let adopted: Error = std::io::Error::from(std::io::ErrorKind::NotFound).into();
    assert_eq!(adopted.kind(), ErrorKind::Internal);
}
