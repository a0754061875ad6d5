//! Domains, ranges and the numeric helpers shared by all function types.

use crate::error::{FunctionError, Result};
use smallvec::SmallVec;
use tinct_syntax::keys::{DOMAIN, RANGE};
use tinct_syntax::{Array, Dict, ObjectLike, XRef};

pub(crate) type TupleVec = SmallVec<[(f64, f64); 4]>;

/// The domain and the optional range of a function.
#[derive(Debug, Clone)]
pub(crate) struct Clamper {
    pub(crate) domain: TupleVec,
    pub(crate) range: Option<TupleVec>,
}

impl Clamper {
    pub(crate) fn new(dict: &Dict, xref: &XRef) -> Result<Self> {
        let domain = read_pairs(dict, DOMAIN, xref)?.ok_or(FunctionError::MissingEntry(DOMAIN))?;

        if domain.is_empty() {
            return Err(FunctionError::InvalidEntry(DOMAIN));
        }

        let range = read_pairs(dict, RANGE, xref)?;

        if range.as_ref().is_some_and(|r| r.is_empty()) {
            return Err(FunctionError::InvalidEntry(RANGE));
        }

        Ok(Self { domain, range })
    }

    /// Return the range, which must be present for the function type at hand.
    pub(crate) fn required_range(&self) -> Result<&TupleVec> {
        self.range.as_ref().ok_or(FunctionError::MissingEntry(RANGE))
    }

    pub(crate) fn clamp_input(&self, input: &mut [f64]) {
        for (x, (min, max)) in input.iter_mut().zip(self.domain.iter()) {
            *x = clamp(*x, *min, *max);
        }
    }

    pub(crate) fn clamp_output(&self, output: &mut [f64]) {
        if let Some(range) = &self.range {
            for (y, (min, max)) in output.iter_mut().zip(range.iter()) {
                *y = clamp(*y, *min, *max);
            }
        }
    }
}

/// Read an optional entry.
///
/// Returns `Ok(None)` if the entry doesn't exist and an error if it exists but
/// can't be read as `T`.
pub(crate) fn read_optional<T: ObjectLike>(
    dict: &Dict,
    key: &'static [u8],
    xref: &XRef,
) -> Result<Option<T>> {
    if !dict.contains_key(key) {
        return Ok(None);
    }

    dict.get::<T>(key, xref)
        .map(Some)
        .ok_or(FunctionError::InvalidEntry(key))
}

pub(crate) fn read_required<T: ObjectLike>(
    dict: &Dict,
    key: &'static [u8],
    xref: &XRef,
) -> Result<T> {
    read_optional(dict, key, xref)?.ok_or(FunctionError::MissingEntry(key))
}

/// Read an optional array of numbers.
pub(crate) fn read_numbers(
    dict: &Dict,
    key: &'static [u8],
    xref: &XRef,
) -> Result<Option<SmallVec<[f64; 4]>>> {
    let Some(array) = read_optional::<Array>(dict, key, xref)? else {
        return Ok(None);
    };

    array
        .to_vec::<f64>(xref)
        .map(|v| Some(SmallVec::from_vec(v)))
        .ok_or(FunctionError::InvalidEntry(key))
}

/// Read an array of numbers as `(min, max)` pairs.
pub(crate) fn read_pairs(dict: &Dict, key: &'static [u8], xref: &XRef) -> Result<Option<TupleVec>> {
    let Some(numbers) = read_numbers(dict, key, xref)? else {
        return Ok(None);
    };

    if numbers.len() % 2 != 0 {
        return Err(FunctionError::InvalidEntry(key));
    }

    Ok(Some(numbers.chunks_exact(2).map(|c| (c[0], c[1])).collect()))
}

/// Map `x` from `[x_min, x_max]` to `[y_min, y_max]`.
#[inline(always)]
pub(crate) fn interpolate(x: f64, x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> f64 {
    y_min + (x - x_min) * ((y_max - y_min) / (x_max - x_min))
}

/// Clamp `x` into `[min, max]`. NaN becomes `min`, and `max` wins for
/// malformed bounds.
#[inline(always)]
pub(crate) fn clamp(x: f64, min: f64, max: f64) -> f64 {
    x.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinct_syntax::Object;

    fn dict(data: &[u8]) -> Dict {
        Object::from_bytes(data).unwrap().into_dict().unwrap()
    }

    #[test]
    fn domain_and_range() {
        let clamper = Clamper::new(
            &dict(b"<< /Domain [0 1 -1 1] /Range [0 0.5] >>"),
            &XRef::default(),
        )
        .unwrap();

        let mut input = [2.0, -3.0];
        clamper.clamp_input(&mut input);
        assert_eq!(input, [1.0, -1.0]);

        let mut output = [0.75];
        clamper.clamp_output(&mut output);
        assert_eq!(output, [0.5]);
    }

    #[test]
    fn missing_range() {
        let clamper = Clamper::new(&dict(b"<< /Domain [0 1] >>"), &XRef::default()).unwrap();

        let mut output = [7.0];
        clamper.clamp_output(&mut output);
        assert_eq!(output, [7.0]);
        assert_eq!(
            clamper.required_range().unwrap_err(),
            FunctionError::MissingEntry(RANGE)
        );
    }

    #[test]
    fn malformed() {
        let xref = XRef::default();

        assert_eq!(
            Clamper::new(&dict(b"<< /Range [0 1] >>"), &xref).unwrap_err(),
            FunctionError::MissingEntry(DOMAIN)
        );
        assert_eq!(
            Clamper::new(&dict(b"<< /Domain [0 1 2] >>"), &xref).unwrap_err(),
            FunctionError::InvalidEntry(DOMAIN)
        );
        assert_eq!(
            Clamper::new(&dict(b"<< /Domain [] >>"), &xref).unwrap_err(),
            FunctionError::InvalidEntry(DOMAIN)
        );
        assert_eq!(
            Clamper::new(&dict(b"<< /Domain [0 /One] >>"), &xref).unwrap_err(),
            FunctionError::InvalidEntry(DOMAIN)
        );
    }

    #[test]
    fn referenced_domain() {
        let xref = XRef::from_bytes(b"4 0 obj [0 2] endobj").unwrap();
        let clamper = Clamper::new(&dict(b"<< /Domain 4 0 R >>"), &xref).unwrap();

        assert_eq!(clamper.domain.as_slice(), &[(0.0, 2.0)]);
    }

    #[test]
    fn interpolation() {
        assert_eq!(interpolate(0.5, 0.0, 1.0, 10.0, 20.0), 15.0);
        assert_eq!(interpolate(2.0, 0.0, 4.0, 1.0, 0.0), 0.5);
        assert_eq!(clamp(f64::NAN, 0.0, 1.0), 0.0);
    }
}
