/*!
A minimal, owned model of PDF objects.

This crate provides the pieces of the PDF object model that are needed to
describe functions: numbers, names, strings, arrays, dictionaries and streams,
references to indirect objects and a store ([`XRef`]) to resolve them in.
Objects can be constructed directly or parsed from their textual
representation.

```
use tinct_syntax::{Object, XRef, keys};

let xref = XRef::from_bytes(b"1 0 obj [0 1] endobj").unwrap();
let obj = Object::from_bytes(b"<< /FunctionType 2 /Domain 1 0 R /N 1 >>").unwrap();
let dict = obj.into_dict().unwrap();

assert_eq!(dict.get::<i32>(keys::FUNCTION_TYPE, &xref), Some(2));
assert_eq!(
    dict.get::<tinct_syntax::Array>(keys::DOMAIN, &xref).unwrap().to_vec::<f64>(&xref),
    Some(vec![0.0, 1.0])
);
```

Composite objects (arrays, dictionaries and streams) are reference counted.
Cloning them is cheap, and every clone shares the same [`ObjectIdentity`].

## Features
- `logging`: Emit log messages for unsupported filters and malformed streams.

## Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]

mod bit_reader;
mod error;
mod filter;
mod log;
mod object;
mod reader;
mod trivia;
mod xref;

pub use bit_reader::{BitReader, BitSize};
pub use error::{DecodeError, Result};
pub use object::dict::keys;
pub use object::{
    Array, Dict, Name, Number, ObjRef, Object, ObjectIdentity, ObjectLike, Stream, String,
};
pub use xref::{MAX_REFERENCE_DEPTH, XRef};
