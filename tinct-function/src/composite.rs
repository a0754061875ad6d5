//! Arrays of single-output functions standing in for one multi-output function.

use crate::error::{EvalError, FunctionError, Result, bail};
use crate::{Builder, Function};
use tinct_syntax::Array;

#[derive(Debug)]
pub(crate) struct Composite {
    functions: Vec<Function>,
}

impl Composite {
    pub(crate) fn new(array: &Array, builder: &Builder<'_>, depth: usize) -> Result<Self> {
        let functions = array
            .iter()
            .map(|f| builder.build(f, depth + 1))
            .collect::<Result<Vec<_>>>()?;

        let Some(first) = functions.first() else {
            bail!(FunctionError::InvalidObject);
        };

        let num_inputs = first.num_inputs();

        if functions
            .iter()
            .any(|f| f.num_outputs() != 1 || f.num_inputs() != num_inputs)
        {
            bail!(FunctionError::InvalidSubfunction);
        }

        Ok(Self { functions })
    }

    pub(crate) fn first(&self) -> &Function {
        // Construction guarantees at least one member.
        &self.functions[0]
    }

    pub(crate) fn num_outputs(&self) -> usize {
        self.functions.len()
    }

    /// Evaluate every member with the full input, each writing one output.
    pub(crate) fn eval(&self, src: &[f64], dest: &mut [f64]) -> core::result::Result<(), EvalError> {
        for (function, out) in self.functions.iter().zip(dest.chunks_mut(1)) {
            function.eval_inner(src, out)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Function, FunctionError, FunctionType};
    use tinct_syntax::{Object, XRef};

    #[test]
    fn fan_out() {
        let xref = XRef::from_bytes(
            b"1 0 obj << /FunctionType 2 /Domain [0 1] /C0 [1] /C1 [0] /N 1 >> endobj",
        )
        .unwrap();
        let func = Function::new(
            &Object::from_bytes(
                b"[ << /FunctionType 2 /Domain [0 1] /N 1 >>
                    1 0 R
                    << /FunctionType 4 /Domain [0 1] /Range [0 1] >> stream\n{ 0.5 mul }\nendstream ]",
            )
            .unwrap(),
            &xref,
        )
        .unwrap();

        assert_eq!(func.function_type(), FunctionType::Array);
        assert_eq!(func.num_inputs(), 1);
        assert_eq!(func.num_outputs(), 3);
        assert_eq!(func.domain(), &[(0.0, 1.0)]);
        assert_eq!(func.eval(&[0.5]).unwrap().as_slice(), &[0.5, 0.5, 0.25]);
        assert_eq!(func.eval(&[1.0]).unwrap().as_slice(), &[1.0, 0.0, 0.5]);
    }

    #[test]
    fn offsets() {
        let func = Function::new(
            &Object::from_bytes(
                b"[ << /FunctionType 2 /Domain [0 1] /N 1 >> << /FunctionType 2 /Domain [0 1] /N 2 >> ]",
            )
            .unwrap(),
            &XRef::default(),
        )
        .unwrap();

        let src = [9.0, 0.5];
        let mut dest = [7.0; 4];
        func.eval_into(&src, 1, &mut dest, 1).unwrap();

        assert_eq!(dest, [7.0, 0.5, 0.25, 7.0]);
    }

    #[test]
    fn invalid() {
        let build = |data: &[u8]| Function::new(&Object::from_bytes(data).unwrap(), &XRef::default());

        assert_eq!(build(b"[]").unwrap_err(), FunctionError::InvalidObject);
        assert_eq!(
            build(b"[ << /FunctionType 2 /Domain [0 1] /C0 [0 0] /C1 [1 1] /N 1 >> ]").unwrap_err(),
            FunctionError::InvalidSubfunction
        );
        assert_eq!(
            build(b"[ << /FunctionType 2 /Domain [0 1] /N 1 >> 5 ]").unwrap_err(),
            FunctionError::InvalidObject
        );
    }
}
