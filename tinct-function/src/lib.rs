/*!
Parsing and evaluating PDF functions.

PDF functions map a number of inputs to a number of outputs. They are used for tint
transforms of separation and DeviceN color spaces, for shadings and for transfer
functions, which means that they are usually evaluated once per pixel. This crate
supports all four function types:

- Type 0 (sampled) functions, interpolating multilinearly between the entries of a
  sample table.
- Type 2 (exponential interpolation) functions.
- Type 3 (stitching) functions, which dispatch to a subfunction depending on the
  input.
- Type 4 (PostScript calculator) functions. Programs that only do arithmetic are
  compiled into straight-line code, all others are run by a memoizing interpreter.

In addition, an array of single-output functions can be used wherever a single
multi-output function is expected.

Functions are usually obtained through a [`FunctionFactory`], which makes sure that
each function object of a document is only built once:

```
use tinct_function::{FunctionFactory, FunctionSettings};
use tinct_syntax::{ObjRef, Object, XRef};

let xref = XRef::from_bytes(b"
    5 0 obj
    << /FunctionType 4 /Domain [0 1] /Range [0 1 0 1 0 1 0 1] >>
    stream
    { 0 0 0 4 -1 roll 1 mul }
    endstream
    endobj
").unwrap();

let factory = FunctionFactory::new(xref, FunctionSettings::default());
let function = factory.get(&Object::Ref(ObjRef::new(5, 0))).unwrap();

let mut cmyk = [0.0; 4];
function.eval_into(&[0.75], 0, &mut cmyk, 0).unwrap();
assert_eq!(cmyk, [0.0, 0.0, 0.0, 0.75]);
```

## Features
- `logging` (enabled by default): Emit log messages via the `log` crate, for example
  when data is malformed but can still be used, or when evaluating a function fails.

## Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]

mod clamp;
mod composite;
mod error;
mod factory;
mod log;
mod type0;
mod type2;
mod type3;
mod type4;

use crate::composite::Composite;
use crate::error::bail;
use crate::log::lerror;
use crate::type0::Type0;
use crate::type2::Type2;
use crate::type3::Type3;
use crate::type4::Type4;
use smallvec::{SmallVec, smallvec};
use std::sync::Arc;
use tinct_syntax::keys::FUNCTION_TYPE;
use tinct_syntax::{Dict, Object, Stream, XRef};

pub use error::{EvalError, FunctionError, Result};
pub use factory::{CacheStats, FunctionFactory};
pub use tinct_postscript::DEFAULT_MEMO_CAPACITY;

/// The output values of a function.
pub type Values = SmallVec<[f64; 4]>;

/// Settings that should be applied when building functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSettings {
    /// Whether type 4 functions should be compiled when possible. If disabled,
    /// all of them are interpreted.
    pub compile_calculator: bool,
    /// How many distinct inputs the interpreter of a type 4 function remembers
    /// results for.
    pub memo_capacity: usize,
    /// How deeply functions can be nested inside stitching functions and
    /// function arrays.
    pub max_nesting_depth: usize,
}

impl Default for FunctionSettings {
    fn default() -> Self {
        Self {
            compile_calculator: true,
            memo_capacity: DEFAULT_MEMO_CAPACITY,
            max_nesting_depth: 16,
        }
    }
}

/// The type of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionType {
    /// A type 0 (sampled) function.
    Sampled,
    /// A type 2 (exponential interpolation) function.
    Exponential,
    /// A type 3 (stitching) function.
    Stitching,
    /// A type 4 (PostScript calculator) function.
    PostScript,
    /// An array of single-output functions.
    Array,
}

/// A PDF function.
///
/// Functions are immutable once built and can be shared between threads. Cloning
/// is cheap.
#[derive(Debug, Clone)]
pub struct Function(Arc<Repr>);

#[derive(Debug)]
enum Repr {
    Sampled(Type0),
    Exponential(Type2),
    Stitching(Type3),
    PostScript(Type4),
    Array(Composite),
}

impl Function {
    /// Build a function from its object, using the default settings.
    ///
    /// Unlike [`FunctionFactory::get`], this always builds a new function.
    pub fn new(object: &Object, xref: &XRef) -> Result<Self> {
        Self::with_settings(object, xref, &FunctionSettings::default())
    }

    /// Build a function from its object.
    pub fn with_settings(object: &Object, xref: &XRef, settings: &FunctionSettings) -> Result<Self> {
        Builder { xref, settings }.build(object, 0)
    }

    /// The type of the function.
    pub fn function_type(&self) -> FunctionType {
        match self.0.as_ref() {
            Repr::Sampled(_) => FunctionType::Sampled,
            Repr::Exponential(_) => FunctionType::Exponential,
            Repr::Stitching(_) => FunctionType::Stitching,
            Repr::PostScript(_) => FunctionType::PostScript,
            Repr::Array(_) => FunctionType::Array,
        }
    }

    /// The number of inputs.
    pub fn num_inputs(&self) -> usize {
        self.domain().len()
    }

    /// The number of outputs.
    ///
    /// For exponential and stitching functions, this is derived from `C0` and
    /// from the subfunctions, respectively.
    pub fn num_outputs(&self) -> usize {
        match self.0.as_ref() {
            Repr::Sampled(f) => f.num_outputs(),
            Repr::Exponential(f) => f.num_outputs(),
            Repr::Stitching(f) => f.num_outputs(),
            Repr::PostScript(f) => f.num_outputs(),
            Repr::Array(f) => f.num_outputs(),
        }
    }

    /// The domain, as one `(min, max)` pair per input.
    pub fn domain(&self) -> &[(f64, f64)] {
        match self.0.as_ref() {
            Repr::Sampled(f) => &f.clamper().domain,
            Repr::Exponential(f) => &f.clamper().domain,
            Repr::Stitching(f) => &f.clamper().domain,
            Repr::PostScript(f) => &f.clamper().domain,
            Repr::Array(f) => f.first().domain(),
        }
    }

    /// The declared range, as one `(min, max)` pair per output.
    ///
    /// Exponential and stitching functions don't need to declare a range, and
    /// function arrays never have one.
    pub fn range(&self) -> Option<&[(f64, f64)]> {
        match self.0.as_ref() {
            Repr::Sampled(f) => f.clamper().range.as_deref(),
            Repr::Exponential(f) => f.clamper().range.as_deref(),
            Repr::Stitching(f) => f.clamper().range.as_deref(),
            Repr::PostScript(f) => f.clamper().range.as_deref(),
            Repr::Array(_) => None,
        }
    }

    /// Whether this is a type 4 function that was compiled, as opposed to one
    /// that is interpreted.
    pub fn is_compiled(&self) -> bool {
        match self.0.as_ref() {
            Repr::PostScript(f) => f.is_compiled(),
            _ => false,
        }
    }

    /// Whether two functions are the same function object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Evaluate the function, reading the inputs from `src` starting at
    /// `src_offset` and writing the outputs into `dest` starting at `dest_offset`.
    pub fn eval_into(
        &self,
        src: &[f64],
        src_offset: usize,
        dest: &mut [f64],
        dest_offset: usize,
    ) -> core::result::Result<(), EvalError> {
        let num_inputs = self.num_inputs();
        let num_outputs = self.num_outputs();

        let input = src
            .get(src_offset..)
            .and_then(|s| s.get(..num_inputs))
            .ok_or(EvalError::MissingInputs {
                expected: num_inputs,
                found: src.len().saturating_sub(src_offset),
            })?;

        let found = dest.len().saturating_sub(dest_offset);
        let output = dest
            .get_mut(dest_offset..)
            .and_then(|d| d.get_mut(..num_outputs))
            .ok_or(EvalError::MissingOutputSpace {
                expected: num_outputs,
                found,
            })?;

        self.eval_inner(input, output)
    }

    /// Evaluate the function, returning the outputs.
    ///
    /// Returns `None` if the evaluation failed.
    pub fn eval(&self, input: &[f64]) -> Option<Values> {
        let mut out = smallvec![0.0; self.num_outputs()];

        match self.eval_into(input, 0, &mut out, 0) {
            Ok(()) => Some(out),
            Err(e) => {
                lerror!("failed to evaluate function: {}", e);

                None
            }
        }
    }

    /// Evaluate the function like [`Function::eval_into`], but never fail.
    ///
    /// If the evaluation fails, the outputs for the lower bounds of the domain
    /// are written instead. If those can't be computed either, the lower bounds
    /// of the range are used, or zeros if there is no range.
    pub fn eval_or_default(
        &self,
        src: &[f64],
        src_offset: usize,
        dest: &mut [f64],
        dest_offset: usize,
    ) {
        let Err(e) = self.eval_into(src, src_offset, dest, dest_offset) else {
            return;
        };

        lerror!("failed to evaluate function, using default values: {}", e);

        let num_outputs = self.num_outputs();
        let lower = self.domain().iter().map(|(min, _)| *min).collect::<Values>();
        let mut fallback: Values = smallvec![0.0; num_outputs];

        if self.eval_inner(&lower, &mut fallback).is_err() {
            fallback = self
                .range()
                .map(|r| r.iter().map(|(min, _)| *min).collect())
                .unwrap_or_default();
            fallback.resize(num_outputs, 0.0);
        }

        for (out, value) in dest.iter_mut().skip(dest_offset).zip(fallback) {
            *out = value;
        }
    }

    /// Evaluate the function for exactly `num_inputs` inputs and `num_outputs`
    /// outputs.
    pub(crate) fn eval_inner(
        &self,
        src: &[f64],
        dest: &mut [f64],
    ) -> core::result::Result<(), EvalError> {
        match self.0.as_ref() {
            Repr::Sampled(f) => f.eval(src, dest),
            Repr::Exponential(f) => f.eval(src[0], dest),
            Repr::Stitching(f) => f.eval(src[0], dest)?,
            Repr::PostScript(f) => f.eval(src, dest)?,
            Repr::Array(f) => f.eval(src, dest)?,
        }

        Ok(())
    }
}

/// Builds functions from their objects.
pub(crate) struct Builder<'a> {
    pub(crate) xref: &'a XRef,
    pub(crate) settings: &'a FunctionSettings,
}

impl Builder<'_> {
    /// Build a function at nesting level `depth`, without any caching.
    pub(crate) fn build(&self, object: &Object, depth: usize) -> Result<Function> {
        if depth > self.settings.max_nesting_depth {
            bail!(FunctionError::NestingTooDeep);
        }

        let object = self
            .xref
            .resolve(object)
            .ok_or(FunctionError::UnresolvedReference)?;

        let repr = match &object {
            Object::Array(array) => Repr::Array(Composite::new(array, self, depth)?),
            Object::Dict(dict) => self.build_dict(dict, None, depth)?,
            Object::Stream(stream) => self.build_dict(stream.dict(), Some(stream), depth)?,
            _ => bail!(FunctionError::InvalidObject),
        };

        Ok(Function(Arc::new(repr)))
    }

    fn build_dict(&self, dict: &Dict, stream: Option<&Stream>, depth: usize) -> Result<Repr> {
        let function_type = clamp::read_required::<i32>(dict, FUNCTION_TYPE, self.xref)?;

        let repr = match function_type {
            0 => Repr::Sampled(Type0::new(
                stream.ok_or(FunctionError::ExpectedStream)?,
                self.xref,
            )?),
            2 => Repr::Exponential(Type2::new(dict, self.xref)?),
            3 => Repr::Stitching(Type3::new(dict, self, depth)?),
            4 => Repr::PostScript(Type4::new(
                stream.ok_or(FunctionError::ExpectedStream)?,
                self.xref,
                self.settings,
            )?),
            t => bail!(FunctionError::UnsupportedFunctionType(t)),
        };

        Ok(repr)
    }
}
