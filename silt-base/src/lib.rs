mod error;

pub use error::{bad_range, unsupported, Error, ErrorKind, Result};
