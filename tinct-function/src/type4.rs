use crate::FunctionSettings;
use crate::clamp::Clamper;
use crate::error::Result;
use tinct_postscript::{CompiledProgram, ExecutionError, Interpreter, Program};
use tinct_syntax::{Stream, XRef};

/// A type 4 function (PostScript calculator function).
#[derive(Debug)]
pub(crate) struct Type4 {
    clamper: Clamper,
    evaluator: Evaluator,
}

#[derive(Debug)]
enum Evaluator {
    Compiled(CompiledProgram),
    Interpreted(Interpreter),
}

impl Type4 {
    /// Create a new type 4 function.
    ///
    /// The program is compiled if possible. Programs the compiler can't handle
    /// are run by the interpreter instead.
    pub(crate) fn new(stream: &Stream, xref: &XRef, settings: &FunctionSettings) -> Result<Self> {
        let clamper = Clamper::new(stream.dict(), xref)?;
        let range = clamper.required_range()?;
        let data = stream.decoded()?;
        let program = Program::parse(&data)?;

        let compiled = if settings.compile_calculator {
            program.compile(&clamper.domain, range)
        } else {
            None
        };

        let evaluator = match compiled {
            Some(compiled) => Evaluator::Compiled(compiled),
            None => Evaluator::Interpreted(program.interpreter(
                &clamper.domain,
                range,
                settings.memo_capacity,
            )),
        };

        Ok(Self { clamper, evaluator })
    }

    pub(crate) fn num_outputs(&self) -> usize {
        self.clamper.range.as_ref().map_or(0, |r| r.len())
    }

    pub(crate) fn clamper(&self) -> &Clamper {
        &self.clamper
    }

    pub(crate) fn is_compiled(&self) -> bool {
        matches!(self.evaluator, Evaluator::Compiled(_))
    }

    /// Evaluate the function. Both evaluators clamp inputs and outputs themselves.
    pub(crate) fn eval(&self, src: &[f64], dest: &mut [f64]) -> core::result::Result<(), ExecutionError> {
        match &self.evaluator {
            Evaluator::Compiled(c) => c.eval(src, dest),
            Evaluator::Interpreted(i) => i.eval(src, dest),
        }
    }
}
