//! Error types for the calculator language.

use core::fmt;

/// A specialized [`Result`] type for calculator operations.
pub type Result<T> = core::result::Result<T, Error>;

/// An error raised while building or running a calculator program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The program source is malformed. Fatal to constructing the function.
    Syntax(SyntaxError),
    /// Running the program failed. Fatal to one evaluation only.
    Execution(ExecutionError),
}

/// Structural errors found while lexing or parsing a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    /// A numeric literal could not be read.
    InvalidNumber,
    /// An operator name that is not part of the calculator language.
    UnknownOperator,
    /// A byte that cannot start any token.
    UnexpectedCharacter(u8),
    /// The source ended before the program was closed.
    UnexpectedEof,
    /// A token appeared where a different one was required.
    UnexpectedToken {
        /// The token kind that was found.
        found: &'static str,
        /// The token kind that was required.
        expected: &'static str,
    },
    /// A nested block was not followed by `if` or by a second block and `ifelse`.
    MalformedConditional,
}

/// Errors raised by the stack machine for a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionError {
    /// More than the allowed number of operands were pushed.
    StackOverflow,
    /// An operator needed more operands than were available.
    StackUnderflow,
    /// A count operand of `copy`, `index` or `roll` was negative.
    RangeCheck,
    /// The program left fewer values on the stack than the function has outputs.
    MissingOutputs,
    /// The number of inputs didn't match the declared domain.
    InputMismatch,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(e) => write!(f, "{e}"),
            Self::Execution(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNumber => write!(f, "invalid numeric literal"),
            Self::UnknownOperator => write!(f, "unknown operator"),
            Self::UnexpectedCharacter(b) => write!(f, "unexpected character 0x{b:02x}"),
            Self::UnexpectedEof => write!(f, "unexpected end of program"),
            Self::UnexpectedToken { found, expected } => {
                write!(f, "unexpected symbol: found {found}, expected {expected}")
            }
            Self::MalformedConditional => write!(f, "error parsing conditional"),
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackOverflow => write!(f, "calculator stack overflow"),
            Self::StackUnderflow => write!(f, "calculator stack underflow"),
            Self::RangeCheck => write!(f, "operand out of range"),
            Self::MissingOutputs => write!(f, "program produced too few outputs"),
            Self::InputMismatch => write!(f, "wrong number of inputs"),
        }
    }
}

impl core::error::Error for Error {}
impl core::error::Error for SyntaxError {}
impl core::error::Error for ExecutionError {}

impl From<SyntaxError> for Error {
    fn from(e: SyntaxError) -> Self {
        Self::Syntax(e)
    }
}

impl From<ExecutionError> for Error {
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
