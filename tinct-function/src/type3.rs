use crate::clamp::{Clamper, TupleVec, clamp, interpolate, read_numbers, read_pairs, read_required};
use crate::error::{EvalError, FunctionError, Result, bail};
use crate::{Builder, Function};
use smallvec::SmallVec;
use tinct_syntax::keys::{BOUNDS, DOMAIN, ENCODE, FUNCTIONS};
use tinct_syntax::{Array, Dict};

/// A type 3 function (stitching function).
#[derive(Debug)]
pub(crate) struct Type3 {
    clamper: Clamper,
    functions: Vec<Function>,
    bounds: SmallVec<[f64; 4]>,
    encode: TupleVec,
    num_outputs: usize,
}

impl Type3 {
    /// Create a new type 3 function, building its subfunctions without caching them.
    pub(crate) fn new(dict: &Dict, builder: &Builder<'_>, depth: usize) -> Result<Self> {
        let xref = builder.xref;
        let clamper = Clamper::new(dict, xref)?;

        if clamper.domain.len() != 1 {
            bail!(FunctionError::InvalidEntry(DOMAIN));
        }

        let functions = read_required::<Array>(dict, FUNCTIONS, xref)?
            .iter()
            .map(|f| builder.build(f, depth + 1))
            .collect::<Result<Vec<_>>>()?;

        let Some(first) = functions.first() else {
            bail!(FunctionError::InvalidEntry(FUNCTIONS));
        };

        let num_outputs = first.num_outputs();

        if functions
            .iter()
            .any(|f| f.num_inputs() != 1 || f.num_outputs() != num_outputs)
        {
            bail!(FunctionError::InvalidSubfunction);
        }

        let bounds = match read_numbers(dict, BOUNDS, xref)? {
            Some(bounds) => bounds,
            // Only a single subfunction can do without bounds.
            None if functions.len() == 1 => SmallVec::new(),
            None => bail!(FunctionError::MissingEntry(BOUNDS)),
        };

        if bounds.len() != functions.len() - 1 || !bounds.windows(2).all(|w| w[0] <= w[1]) {
            bail!(FunctionError::InvalidEntry(BOUNDS));
        }

        let encode =
            read_pairs(dict, ENCODE, xref)?.ok_or(FunctionError::MissingEntry(ENCODE))?;

        if encode.len() != functions.len() {
            bail!(FunctionError::InvalidEntry(ENCODE));
        }

        Ok(Self {
            clamper,
            functions,
            bounds,
            encode,
            num_outputs,
        })
    }

    pub(crate) fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    pub(crate) fn clamper(&self) -> &Clamper {
        &self.clamper
    }

    pub(crate) fn eval(&self, input: f64, dest: &mut [f64]) -> core::result::Result<(), EvalError> {
        let (d_min, d_max) = self.clamper.domain[0];
        let x = clamp(input, d_min, d_max);

        // The first subdomain whose upper bound lies above the input. An input
        // equal to a bound belongs to the subdomain starting there.
        let index = self
            .bounds
            .iter()
            .position(|bound| x < *bound)
            .unwrap_or(self.bounds.len());

        let low = match index {
            0 => d_min,
            _ => self.bounds[index - 1],
        };
        let high = self.bounds.get(index).copied().unwrap_or(d_max);
        let (e_min, e_max) = self.encode[index];

        let encoded = if low == high {
            e_min
        } else {
            interpolate(x, low, high, e_min, e_max)
        };

        self.functions[index].eval_inner(&[encoded], dest)?;
        self.clamper.clamp_output(dest);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Function, FunctionError, FunctionSettings, FunctionType};
    use tinct_syntax::keys::{BOUNDS, ENCODE, FUNCTIONS};
    use tinct_syntax::{ObjRef, Object, XRef};

    fn function(data: &[u8]) -> Result<Function, FunctionError> {
        Function::new(&Object::from_bytes(data).unwrap(), &XRef::default())
    }

    fn eval(func: &Function, input: f64) -> Vec<f64> {
        func.eval(&[input]).unwrap().to_vec()
    }

    #[test]
    fn simple() {
        let func = function(
            b"<<
  /FunctionType 3
  /Domain [-7 7]
  /Functions [
    << /FunctionType 2
       /Domain [0 1]
       /C0 [0.5 0.5 0.5]
       /C1 [0.5 0.5 0.5]
       /N 1
    >>
    << /FunctionType 2
       /Domain [0 1]
       /C0 [0.7 0.7 0.7]
       /C1 [0.7 0.7 0.7]
       /N 1
    >>
  ]
  /Bounds [0]
  /Encode [0 1 0 1]
>>",
        )
        .unwrap();

        assert_eq!(func.function_type(), FunctionType::Stitching);
        assert_eq!(func.num_outputs(), 3);

        assert_eq!(eval(&func, -7.0), [0.5, 0.5, 0.5]);
        assert_eq!(eval(&func, -3.0), [0.5, 0.5, 0.5]);
        assert_eq!(eval(&func, -0.5), [0.5, 0.5, 0.5]);
        assert_eq!(eval(&func, 0.0), [0.7, 0.7, 0.7]);
        assert_eq!(eval(&func, 7.0), [0.7, 0.7, 0.7]);
    }

    #[test]
    fn encoding() {
        let func = function(
            b"<< /FunctionType 3 /Domain [0 1] /Bounds [0.5] /Encode [0 1 1 0]
                 /Functions [
                   << /FunctionType 2 /Domain [0 1] /N 1 >>
                   << /FunctionType 2 /Domain [0 1] /C0 [10] /C1 [20] /N 1 >>
                 ] >>",
        )
        .unwrap();

        assert_eq!(eval(&func, 0.0), [0.0]);
        assert_eq!(eval(&func, 0.25), [0.5]);
        // At the bound, the second subfunction is used, with its encoding reversed.
        assert_eq!(eval(&func, 0.5), [20.0]);
        assert_eq!(eval(&func, 0.75), [15.0]);
        assert_eq!(eval(&func, 1.0), [10.0]);
        assert_eq!(eval(&func, 2.0), [10.0]);
    }

    #[test]
    fn empty_subdomain() {
        let func = function(
            b"<< /FunctionType 3 /Domain [0 1] /Bounds [1] /Encode [0 1 0.25 1]
                 /Functions [
                   << /FunctionType 2 /Domain [0 1] /N 1 >>
                   << /FunctionType 2 /Domain [0 1] /C0 [10] /C1 [20] /N 1 >>
                 ] >>",
        )
        .unwrap();

        assert_eq!(eval(&func, 1.0), [12.5]);
    }

    #[test]
    fn referenced_subfunctions() {
        let xref = XRef::from_bytes(
            b"1 0 obj << /FunctionType 2 /Domain [0 1] /N 1 >> endobj
              2 0 obj [1 0 R 1 0 R] endobj",
        )
        .unwrap();
        let func = Function::new(
            &Object::from_bytes(
                b"<< /FunctionType 3 /Domain [0 2] /Bounds [1] /Encode [0 1 0 1] /Functions 2 0 R >>",
            )
            .unwrap(),
            &xref,
        )
        .unwrap();

        assert_eq!(func.eval(&[0.5]).unwrap().as_slice(), &[0.5]);
        assert_eq!(func.eval(&[1.5]).unwrap().as_slice(), &[0.5]);
    }

    #[test]
    fn self_reference() {
        let xref = XRef::from_bytes(
            b"1 0 obj
              << /FunctionType 3 /Domain [0 1] /Encode [0 1] /Functions [1 0 R] >>
              endobj",
        )
        .unwrap();

        assert_eq!(
            Function::with_settings(
                &Object::Ref(ObjRef::new(1, 0)),
                &xref,
                &FunctionSettings::default()
            )
            .unwrap_err(),
            FunctionError::NestingTooDeep
        );
    }

    #[test]
    fn invalid() {
        assert_eq!(
            function(
                b"<< /FunctionType 3 /Domain [0 1] /Encode [0 1 0 1]
                     /Functions [<< /FunctionType 2 /Domain [0 1] /N 1 >> << /FunctionType 2 /Domain [0 1] /N 1 >>] >>"
            )
            .unwrap_err(),
            FunctionError::MissingEntry(BOUNDS)
        );
        assert_eq!(
            function(
                b"<< /FunctionType 3 /Domain [0 1] /Bounds [0.5] /Encode [0 1]
                     /Functions [<< /FunctionType 2 /Domain [0 1] /N 1 >> << /FunctionType 2 /Domain [0 1] /N 1 >>] >>"
            )
            .unwrap_err(),
            FunctionError::InvalidEntry(ENCODE)
        );
        assert_eq!(
            function(
                b"<< /FunctionType 3 /Domain [0 1] /Bounds [0.6 0.4] /Encode [0 1 0 1 0 1]
                     /Functions [<< /FunctionType 2 /Domain [0 1] /N 1 >> << /FunctionType 2 /Domain [0 1] /N 1 >>
                                 << /FunctionType 2 /Domain [0 1] /N 1 >>] >>"
            )
            .unwrap_err(),
            FunctionError::InvalidEntry(BOUNDS)
        );
        assert_eq!(
            function(
                b"<< /FunctionType 3 /Domain [0 1] /Bounds [0.5] /Encode [0 1 0 1]
                     /Functions [<< /FunctionType 2 /Domain [0 1] /N 1 >>
                                 << /FunctionType 2 /Domain [0 1] /C0 [0 0] /C1 [1 1] /N 1 >>] >>"
            )
            .unwrap_err(),
            FunctionError::InvalidSubfunction
        );
        assert_eq!(
            function(b"<< /FunctionType 3 /Domain [0 1] /Encode [] /Functions [] >>").unwrap_err(),
            FunctionError::InvalidEntry(FUNCTIONS)
        );
        assert_eq!(
            function(
                b"<< /FunctionType 3 /Domain [0 1 0 1] /Encode [0 1]
                     /Functions [<< /FunctionType 2 /Domain [0 1] /N 1 >>] >>"
            )
            .unwrap_err(),
            FunctionError::InvalidEntry(tinct_syntax::keys::DOMAIN)
        );
    }
}
