//! Object references.

use crate::object::Number;
use crate::reader::{Readable, Reader};

/// A reference to an indirect object.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub struct ObjRef {
    /// The object number.
    pub obj_number: i32,
    /// The generation number.
    pub gen_number: i32,
}

impl ObjRef {
    /// Create a new object reference.
    pub fn new(obj_number: i32, gen_number: i32) -> Self {
        Self {
            obj_number,
            gen_number,
        }
    }
}

/// Read a number that must have been written as an integer.
pub(crate) fn read_int(r: &mut Reader<'_>) -> Option<i32> {
    let n = r.read::<Number>()?;

    n.is_integer().then(|| n.as_i32())
}

impl Readable for ObjRef {
    fn read(r: &mut Reader<'_>) -> Option<Self> {
        let obj_number = read_int(r)?;
        r.skip_white_spaces_and_comments();
        let gen_number = read_int(r)?;
        r.skip_white_spaces_and_comments();
        r.forward_tag(b"R")?;

        Some(Self::new(obj_number, gen_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple() {
        assert_eq!(
            Reader::new(b"34 1 R").read::<ObjRef>().unwrap(),
            ObjRef::new(34, 1)
        );
    }

    #[test]
    fn trailing() {
        assert_eq!(
            Reader::new(b"256 0 R (hi)").read::<ObjRef>().unwrap(),
            ObjRef::new(256, 0)
        );
    }

    #[test]
    fn invalid() {
        assert!(Reader::new(b"256 R").read::<ObjRef>().is_none());
        assert!(Reader::new(b"256 257").read::<ObjRef>().is_none());
        assert!(Reader::new(b"2.5 0 R").read::<ObjRef>().is_none());
    }
}
