use tinct_function::{CacheStats, FunctionError, FunctionFactory, FunctionSettings};
use tinct_postscript::{Error, SyntaxError};
use tinct_syntax::{ObjRef, Object};
use tinct_tests::XREF;

fn factory() -> FunctionFactory {
    FunctionFactory::new(XREF.clone(), FunctionSettings::default())
}

fn reference(num: i32) -> Object {
    Object::Ref(ObjRef::new(num, 0))
}

#[test]
fn shared_function_is_built_once() {
    let factory = factory();
    let obj = reference(4);

    // Like several shadings referencing the same function.
    let functions = (0..10).map(|_| factory.get(&obj).unwrap()).collect::<Vec<_>>();

    assert!(functions.iter().all(|f| f.ptr_eq(&functions[0])));
    assert_eq!(
        factory.stats(),
        CacheStats {
            hits: 9,
            misses: 1,
            builds: 1
        }
    );
}

#[test]
fn subfunctions_are_not_cached() {
    let factory = factory();

    let stitching = factory.get(&reference(3)).unwrap();
    assert_eq!(factory.len(), 1);

    let exponential = factory.get(&reference(1)).unwrap();
    assert_eq!(factory.len(), 2);
    assert_eq!(factory.stats().builds, 2);

    assert_eq!(stitching.eval(&[0.25]).unwrap().as_slice(), &[0.5, 0.0, 0.0]);
    assert_eq!(exponential.eval(&[0.5]).unwrap().as_slice(), &[0.5, 0.0, 0.0]);
}

#[test]
fn broken_function() {
    let factory = factory();

    for _ in 0..2 {
        assert_eq!(
            factory.get(&reference(5)).unwrap_err(),
            FunctionError::Program(Error::Syntax(SyntaxError::UnexpectedEof))
        );
    }

    assert!(factory.is_empty());
    assert_eq!(factory.stats().misses, 2);
}

#[test]
fn concurrent_evaluation() {
    let factory = factory();

    std::thread::scope(|s| {
        for i in 0..16 {
            let factory = &factory;

            s.spawn(move || {
                let func = factory.get(&reference(2 + i % 3)).unwrap();
                let x = i as f64 / 16.0;

                for _ in 0..100 {
                    assert_eq!(func.eval(&[x]).unwrap().len(), func.num_outputs());
                }
            });
        }
    });

    let stats = factory.stats();
    assert_eq!(stats.builds, 3);
    assert_eq!(stats.hits, 13);
    assert_eq!(factory.len(), 3);
}
