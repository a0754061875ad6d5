//! Error types for building and evaluating functions.

use core::fmt;
use tinct_postscript::ExecutionError;
use tinct_syntax::DecodeError;

/// A specialized [`Result`] type for building functions.
pub type Result<T> = core::result::Result<T, FunctionError>;

/// An error raised while building a function from its PDF object.
///
/// All of these are fatal to constructing the function in question, but never
/// to anything else. Callers are expected to substitute a neutral behavior.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionError {
    /// A reference could not be resolved to an object.
    UnresolvedReference,
    /// The object is neither a dictionary, a stream nor an array.
    InvalidObject,
    /// The function type is not one of 0, 2, 3 or 4.
    UnsupportedFunctionType(i32),
    /// A sampled or calculator function was given as a plain dictionary.
    ExpectedStream,
    /// A required entry is missing from the function dictionary.
    MissingEntry(&'static [u8]),
    /// An entry has the wrong type, length or value.
    InvalidEntry(&'static [u8]),
    /// A nested function doesn't have the number of inputs or outputs its
    /// parent requires.
    InvalidSubfunction,
    /// Functions are nested deeper than allowed, which usually means that a
    /// function references itself.
    NestingTooDeep,
    /// The source of a calculator function is malformed.
    Program(tinct_postscript::Error),
    /// The stream data of the function could not be decoded.
    Decode(DecodeError),
}

/// An error raised while evaluating a function.
///
/// These are fatal to a single evaluation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// Running a calculator program failed.
    Execution(ExecutionError),
    /// The input buffer holds fewer values than the function has inputs.
    MissingInputs {
        /// The number of inputs of the function.
        expected: usize,
        /// The number of values available after the offset.
        found: usize,
    },
    /// The output buffer has less space than the function has outputs.
    MissingOutputSpace {
        /// The number of outputs of the function.
        expected: usize,
        /// The number of slots available after the offset.
        found: usize,
    },
}

impl fmt::Display for FunctionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedReference => write!(f, "unresolved reference"),
            Self::InvalidObject => write!(f, "object is not a function"),
            Self::UnsupportedFunctionType(t) => write!(f, "unsupported function type {t}"),
            Self::ExpectedStream => write!(f, "function requires a stream"),
            Self::MissingEntry(key) => {
                write!(f, "missing entry /{}", String::from_utf8_lossy(key))
            }
            Self::InvalidEntry(key) => {
                write!(f, "invalid entry /{}", String::from_utf8_lossy(key))
            }
            Self::InvalidSubfunction => write!(f, "invalid subfunction"),
            Self::NestingTooDeep => write!(f, "functions are nested too deeply"),
            Self::Program(e) => write!(f, "invalid calculator program: {e}"),
            Self::Decode(e) => write!(f, "failed to decode function data: {e}"),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Execution(e) => write!(f, "{e}"),
            Self::MissingInputs { expected, found } => {
                write!(f, "expected {expected} inputs, found {found}")
            }
            Self::MissingOutputSpace { expected, found } => {
                write!(f, "expected space for {expected} outputs, found {found}")
            }
        }
    }
}

impl core::error::Error for FunctionError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Program(e) => Some(e),
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl core::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Execution(e) => Some(e),
            _ => None,
        }
    }
}

impl From<tinct_postscript::Error> for FunctionError {
    fn from(e: tinct_postscript::Error) -> Self {
        Self::Program(e)
    }
}

impl From<tinct_postscript::SyntaxError> for FunctionError {
    fn from(e: tinct_postscript::SyntaxError) -> Self {
        Self::Program(e.into())
    }
}

impl From<DecodeError> for FunctionError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<ExecutionError> for EvalError {
    fn from(e: ExecutionError) -> Self {
        Self::Execution(e)
    }
}

macro_rules! bail {
    ($err:expr) => {
        return Err($err.into())
    };
}

pub(crate) use bail;
