/*!
A parser, interpreter and compiler for the PDF calculator language.

PDF type 4 functions are written in a small subset of PostScript that only
consists of numbers, boolean values, a fixed set of operators and the `if` and
`ifelse` conditionals. This crate turns the source of such a program into flat
bytecode and offers two ways of running it:

- An [`Interpreter`], which executes the bytecode on a bounded operand stack and
  supports the whole language.
- A [`CompiledProgram`], which exists for programs that only rearrange their
  inputs and combine them with `add`, `sub` and `mul`. It runs without a stack
  and without any checks, which makes it considerably faster for functions
  that are evaluated once per pixel.

```
use tinct_postscript::Program;

let program = Program::parse(b"{ 2 copy gt { exch } if pop }").unwrap();
let interpreter = program.interpreter(&[(0.0, 1.0), (0.0, 1.0)], &[(0.0, 1.0)], 16);

let mut out = [0.0];
interpreter.eval(&[0.25, 0.75], &mut out).unwrap();
assert_eq!(out, [0.25]);
```

## Features
- `logging`: Emit a log message whenever running a program fails.

## Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]

mod compile;
mod error;
mod interpret;
mod lexer;
mod log;
mod op;
mod parser;
mod reader;

use smallvec::SmallVec;

pub use compile::CompiledProgram;
pub use error::{Error, ExecutionError, Result, SyntaxError};
pub use interpret::{
    DEFAULT_MEMO_CAPACITY, Interpreter, MAX_STACK_DEPTH, OperandStack, Value,
};
pub use op::PostScriptOp;
pub use parser::Instr;

pub(crate) type Bounds = SmallVec<[(f64, f64); 4]>;

/// A parsed calculator program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    code: Vec<Instr>,
}

impl Program {
    /// Parse a program from its source, including the outer braces.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Ok(Self {
            code: parser::parse(data)?,
        })
    }

    /// The bytecode of the program.
    pub fn instructions(&self) -> &[Instr] {
        &self.code
    }

    /// Try to compile the program for the given domain and range.
    ///
    /// Returns `None` if the program uses anything beyond plain arithmetic and
    /// stack manipulation, or if it doesn't produce exactly one value per
    /// range entry.
    pub fn compile(&self, domain: &[(f64, f64)], range: &[(f64, f64)]) -> Option<CompiledProgram> {
        CompiledProgram::new(&self.code, domain, range)
    }

    /// Create an interpreter for the given domain and range that remembers the
    /// results of up to `memo_capacity` distinct inputs.
    pub fn interpreter(
        &self,
        domain: &[(f64, f64)],
        range: &[(f64, f64)],
        memo_capacity: usize,
    ) -> Interpreter {
        Interpreter::new(
            self.code.clone(),
            Bounds::from_slice(domain),
            Bounds::from_slice(range),
            memo_capacity,
        )
    }

    /// Run the program with the given inputs as the initial stack, without any
    /// clamping.
    pub fn execute(&self, inputs: &[f64]) -> core::result::Result<OperandStack, ExecutionError> {
        interpret::execute(&self.code, inputs)
    }
}

/// Clamp `x` into `[min, max]`. NaN becomes `min`, and `max` wins for
/// malformed bounds.
pub(crate) fn clamp(x: f64, min: f64, max: f64) -> f64 {
    x.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors() {
        assert_eq!(
            Program::parse(b"{ 1 2 foo }"),
            Err(Error::Syntax(SyntaxError::UnknownOperator))
        );
        assert_eq!(
            Program::parse(b"{ 1 2 add"),
            Err(Error::Syntax(SyntaxError::UnexpectedEof))
        );
    }

    #[test]
    fn clamping() {
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
        assert_eq!(clamp(-0.5, 0.0, 1.0), 0.0);
        assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
        assert_eq!(clamp(f64::NAN, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.5, 1.0, 0.0), 0.0);
    }

    #[test]
    fn compiles_and_interprets() {
        let program = Program::parse(b"{ 0.5 mul }").unwrap();
        assert!(program.compile(&[(0.0, 1.0)], &[(0.0, 1.0)]).is_some());

        let program = Program::parse(b"{ 90 sin mul }").unwrap();
        assert!(program.compile(&[(0.0, 1.0)], &[(0.0, 1.0)]).is_none());

        let interpreter = program.interpreter(&[(0.0, 1.0)], &[(0.0, 1.0)], 0);
        let mut out = [0.0];
        interpreter.eval(&[0.5], &mut out).unwrap();
        assert!((out[0] - 0.5).abs() < 1e-9);
    }
}
