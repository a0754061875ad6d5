use crate::Values;
use crate::clamp::{Clamper, read_numbers, read_required};
use crate::error::{FunctionError, Result, bail};
use smallvec::smallvec;
use tinct_syntax::keys::{C0, C1, DOMAIN, N};
use tinct_syntax::{Dict, XRef};

/// A type 2 function (exponential interpolation function).
#[derive(Debug)]
pub(crate) struct Type2 {
    c0: Values,
    diff: Values,
    clamper: Clamper,
    n: f64,
}

impl Type2 {
    /// Create a new type 2 function.
    pub(crate) fn new(dict: &Dict, xref: &XRef) -> Result<Self> {
        let clamper = Clamper::new(dict, xref)?;

        if clamper.domain.len() != 1 {
            bail!(FunctionError::InvalidEntry(DOMAIN));
        }

        let c0 = read_numbers(dict, C0, xref)?.unwrap_or(smallvec![0.0]);
        let c1 = read_numbers(dict, C1, xref)?.unwrap_or(smallvec![1.0]);

        if c0.len() != c1.len() {
            bail!(FunctionError::InvalidEntry(C1));
        }

        let n = read_required::<f64>(dict, N, xref)?;
        let diff = c0.iter().zip(c1.iter()).map(|(c0, c1)| c1 - c0).collect();

        Ok(Self {
            c0,
            diff,
            clamper,
            n,
        })
    }

    pub(crate) fn num_outputs(&self) -> usize {
        self.c0.len()
    }

    pub(crate) fn clamper(&self) -> &Clamper {
        &self.clamper
    }

    /// Evaluate the function with the given input.
    pub(crate) fn eval(&self, input: f64, dest: &mut [f64]) {
        let mut input = [input];
        self.clamper.clamp_input(&mut input);

        let x = if self.n == 1.0 {
            input[0]
        } else {
            input[0].powf(self.n)
        };

        for (out, (c0, diff)) in dest.iter_mut().zip(self.c0.iter().zip(self.diff.iter())) {
            *out = c0 + x * diff;
        }

        self.clamper.clamp_output(dest);
    }
}
