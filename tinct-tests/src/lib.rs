//! Shared fixtures for the integration tests.

use once_cell::sync::Lazy;
use tinct_function::{Function, FunctionSettings};
use tinct_syntax::{Object, XRef};

/// A small document whose objects are used across the tests.
///
/// - `1 0 R`: an exponential function from black to red.
/// - `2 0 R`: a calculator function inverting its input.
/// - `3 0 R`: a stitching function made of `1 0 R` and `2 0 R`.
/// - `4 0 R`: a sampled function with the values `0`, `0.5` and `1`.
/// - `5 0 R`: a calculator function with a syntax error.
pub const DOCUMENT: &[u8] = b"%PDF-1.7

1 0 obj
<< /FunctionType 2 /Domain [0 1] /C0 [0 0 0] /C1 [1 0 0] /N 1 >>
endobj

2 0 obj
<< /FunctionType 4 /Domain [0 1] /Range [0 1 0 1 0 1] >>
stream
{ 1 exch sub dup dup }
endstream
endobj

3 0 obj
<< /FunctionType 3 /Domain [0 1] /Functions [1 0 R 2 0 R] /Bounds [0.5] /Encode [0 1 0 1] >>
endobj

4 0 obj
<< /FunctionType 0 /Domain [0 1] /Range [0 1] /Size [3] /BitsPerSample 2 /Decode [0 1.5]
   /Filter /ASCIIHexDecode >>
stream
18>
endstream
endobj

5 0 obj
<< /FunctionType 4 /Domain [0 1] /Range [0 1] >>
stream
{ 1 add
endstream
endobj
";

/// The parsed objects of [`DOCUMENT`].
pub static XREF: Lazy<XRef> =
    Lazy::new(|| XRef::from_bytes(DOCUMENT).expect("the test document is valid"));

/// Build a function from its source, with the references resolved in [`XREF`].
pub fn function(data: &[u8]) -> Function {
    function_with(data, &FunctionSettings::default())
}

/// Like [`function`], but with custom settings.
pub fn function_with(data: &[u8], settings: &FunctionSettings) -> Function {
    let object = Object::from_bytes(data).expect("the object is valid");

    Function::with_settings(&object, &XREF, settings).expect("the function is valid")
}

/// `count` evenly spaced points covering `[min, max]`, both ends included.
pub fn samples(min: f64, max: f64, count: usize) -> impl Iterator<Item = f64> {
    let step = (max - min) / (count - 1) as f64;

    (0..count).map(move |i| min + step * i as f64)
}

/// Assert that two slices are equal up to a small tolerance.
#[track_caller]
pub fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} != {expected:?}");

    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{actual:?} != {expected:?}");
    }
}
