use tinct_function::{Function, FunctionType};
use tinct_syntax::{ObjRef, Object};
use tinct_tests::{XREF, assert_close, function, samples};

fn reference(num: i32) -> Function {
    Function::new(&Object::Ref(ObjRef::new(num, 0)), &XREF).unwrap()
}

fn eval(func: &Function, input: f64) -> Vec<f64> {
    func.eval(&[input]).unwrap().to_vec()
}

#[test]
fn sampled_values() {
    let func = reference(4);

    assert_eq!(func.function_type(), FunctionType::Sampled);
    assert_eq!(eval(&func, 0.0), [0.0]);
    assert_eq!(eval(&func, 0.5), [0.5]);
    assert_eq!(eval(&func, 1.0), [1.0]);
    // Halfway between two samples.
    assert_eq!(eval(&func, 0.25), [0.25]);
    assert_eq!(eval(&func, 0.75), [0.75]);
}

#[test]
fn sampled_is_monotonic_between_samples() {
    let func = reference(4);
    let outputs = samples(0.0, 1.0, 101).map(|x| eval(&func, x)[0]).collect::<Vec<_>>();

    assert!(outputs.windows(2).all(|w| w[0] <= w[1]));
    assert_close(&outputs[50..51], &[0.5]);
}

#[test]
fn inputs_are_clamped_to_domain() {
    for num in 1..=4 {
        let func = reference(num);
        let (min, max) = func.domain()[0];

        assert_eq!(eval(&func, min - 1.0), eval(&func, min), "object {num}");
        assert_eq!(eval(&func, max + 1.0), eval(&func, max), "object {num}");
        assert_eq!(eval(&func, f64::NAN), eval(&func, min), "object {num}");
    }
}

#[test]
fn exponential_is_linear() {
    let func = function(b"<< /FunctionType 2 /Domain [0 1] /C0 [0 0 0] /C1 [1 1 1] /N 1 >>");

    assert_eq!(func.function_type(), FunctionType::Exponential);
    assert_eq!(func.range(), None);

    for x in samples(0.0, 1.0, 101) {
        assert_close(&eval(&func, x), &[x, x, x]);
    }
}

#[test]
fn exponential_from_document() {
    let func = reference(1);

    assert_eq!(eval(&func, 0.0), [0.0, 0.0, 0.0]);
    assert_eq!(eval(&func, 0.5), [0.5, 0.0, 0.0]);
    assert_eq!(eval(&func, 1.0), [1.0, 0.0, 0.0]);
}

#[test]
fn stitching_segments() {
    let func = reference(3);

    assert_eq!(func.function_type(), FunctionType::Stitching);
    assert_eq!(func.num_outputs(), 3);

    assert_eq!(eval(&func, 0.0), [0.0, 0.0, 0.0]);
    assert_eq!(eval(&func, 0.25), [0.5, 0.0, 0.0]);
    // A bound belongs to the segment starting at it.
    assert_eq!(eval(&func, 0.5), [1.0, 1.0, 1.0]);
    assert_eq!(eval(&func, 0.75), [0.5, 0.5, 0.5]);
    assert_eq!(eval(&func, 1.0), [0.0, 0.0, 0.0]);
}

#[test]
fn array_of_functions() {
    let func = function(
        b"[ << /FunctionType 2 /Domain [0 1] /C0 [0] /C1 [1] /N 1 >>
            << /FunctionType 0 /Domain [0 1] /Range [0 1] /Size [3] /BitsPerSample 2
               /Decode [0 1.5] /Filter /ASCIIHexDecode >> stream\n18>\nendstream ]",
    );

    assert_eq!(func.function_type(), FunctionType::Array);
    assert_eq!(func.num_outputs(), 2);
    assert_eq!(eval(&func, 0.25), [0.25, 0.25]);
    assert_eq!(eval(&func, 2.0), [1.0, 1.0]);
}

#[test]
fn default_values_on_failure() {
    let func = function(
        b"<< /FunctionType 4 /Domain [0 1] /Range [0.25 1 0.5 1] >>
          stream
          { dup 0.5 lt { pop pop } if dup }
          endstream",
    );
    let mut out = [9.0, 9.0];

    // The lower domain bound fails too, so the lower range bounds are used.
    func.eval_or_default(&[0.25], 0, &mut out, 0);
    assert_eq!(out, [0.25, 0.5]);

    func.eval_or_default(&[0.75], 0, &mut out, 0);
    assert_eq!(out, [0.75, 0.75]);
}
