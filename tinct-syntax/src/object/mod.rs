//! PDF objects.

use crate::reader::{Readable, Reader};
use std::sync::Arc;

pub(crate) mod array;
pub(crate) mod dict;
pub(crate) mod name;
pub(crate) mod number;
pub(crate) mod r#ref;
pub(crate) mod stream;
pub(crate) mod string;

pub use array::Array;
pub use dict::Dict;
pub use name::Name;
pub use number::Number;
pub use r#ref::ObjRef;
pub use stream::Stream;
pub use string::String;

/// A type that an [`Object`] can be converted into.
pub trait ObjectLike: TryFrom<Object> {}

impl ObjectLike for Object {}

/// A primitive PDF object.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// A null object.
    Null,
    /// A boolean object.
    Boolean(bool),
    /// A number object.
    Number(Number),
    /// A string object.
    String(String),
    /// A name object.
    Name(Name),
    /// An array object.
    Array(Array),
    /// A dict object.
    Dict(Dict),
    /// A stream object.
    Stream(Stream),
    /// A reference to an indirect object.
    Ref(ObjRef),
}

impl Object {
    /// Parse a single object from its textual representation.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let mut r = Reader::new(data);
        r.skip_white_spaces_and_comments();

        r.read::<Self>()
    }

    /// Try casting the object to a specific subtype.
    pub fn cast<T: ObjectLike>(self) -> Option<T> {
        self.try_into().ok()
    }

    /// Returns the dictionary of a dictionary or stream object.
    pub fn dict(&self) -> Option<&Dict> {
        match self {
            Self::Dict(d) => Some(d),
            Self::Stream(s) => Some(s.dict()),
            _ => None,
        }
    }

    /// Returns the identity of a composite object.
    ///
    /// Numbers, names and other simple objects don't have an identity.
    pub fn identity(&self) -> Option<ObjectIdentity> {
        match self {
            Self::Array(a) => Some(a.identity()),
            Self::Dict(d) => Some(d.identity()),
            Self::Stream(s) => Some(s.identity()),
            _ => None,
        }
    }

    /// Convert the object into a dictionary.
    #[inline(always)]
    pub fn into_dict(self) -> Option<Dict> {
        self.cast()
    }

    /// Convert the object into an array.
    #[inline(always)]
    pub fn into_array(self) -> Option<Array> {
        self.cast()
    }

    /// Convert the object into a stream.
    #[inline(always)]
    pub fn into_stream(self) -> Option<Stream> {
        self.cast()
    }

    /// Convert the object into a name.
    #[inline(always)]
    pub fn into_name(self) -> Option<Name> {
        self.cast()
    }

    /// Convert the object into a number.
    #[inline(always)]
    pub fn into_number(self) -> Option<Number> {
        self.cast()
    }
}

impl TryFrom<Object> for bool {
    type Error = ();

    fn try_from(value: Object) -> Result<Self, Self::Error> {
        match value {
            Object::Boolean(b) => Ok(b),
            _ => Err(()),
        }
    }
}

impl ObjectLike for bool {}

impl Readable for Object {
    fn read(r: &mut Reader<'_>) -> Option<Self> {
        let object = match r.peek_byte()? {
            b'n' => {
                r.forward_tag(b"null")?;
                Self::Null
            }
            b't' => {
                r.forward_tag(b"true")?;
                Self::Boolean(true)
            }
            b'f' => {
                r.forward_tag(b"false")?;
                Self::Boolean(false)
            }
            b'/' => Self::Name(r.read::<Name>()?),
            b'<' => match r.peek_tag(b"<<") {
                Some(()) => {
                    let mut cloned = r.clone();
                    let dict = cloned.read::<Dict>()?;
                    cloned.skip_white_spaces_and_comments();

                    if cloned.peek_tag(b"stream").is_some() {
                        Self::Stream(r.read::<Stream>()?)
                    } else {
                        r.jump(cloned.offset());

                        Self::Dict(dict)
                    }
                }
                None => Self::String(r.read::<String>()?),
            },
            b'(' => Self::String(r.read::<String>()?),
            b'.' | b'+' | b'-' | b'0'..=b'9' => match r.read::<ObjRef>() {
                Some(obj_ref) => Self::Ref(obj_ref),
                None => Self::Number(r.read::<Number>()?),
            },
            b'[' => Self::Array(r.read::<Array>()?),
            _ => return None,
        };

        Some(object)
    }
}

/// The identity of a concrete composite object.
///
/// Two objects that are structurally equal but were created separately have
/// different identities, while clones of the same object share one. An identity
/// is only meaningful while the object is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectIdentity(usize);

impl ObjectIdentity {
    pub(crate) fn of<T>(data: &Arc<T>) -> Self {
        Self(Arc::as_ptr(data).addr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(data: &[u8]) -> Option<Object> {
        Object::from_bytes(data)
    }

    #[test]
    fn null() {
        assert_eq!(object(b"null"), Some(Object::Null));
    }

    #[test]
    fn bool() {
        assert_eq!(object(b"true"), Some(Object::Boolean(true)));
        assert_eq!(object(b"false"), Some(Object::Boolean(false)));
        assert_eq!(object(b"fals"), None);
    }

    #[test]
    fn number() {
        assert!(matches!(object(b"34.5").unwrap(), Object::Number(_)));
    }

    #[test]
    fn string() {
        assert!(matches!(object(b"(Hi)").unwrap(), Object::String(_)));
        assert!(matches!(object(b"<34>").unwrap(), Object::String(_)));
    }

    #[test]
    fn name() {
        assert!(matches!(object(b"/Name").unwrap(), Object::Name(_)));
    }

    #[test]
    fn dict() {
        assert!(matches!(
            object(b"<</Entry 45>>").unwrap(),
            Object::Dict(_)
        ));
    }

    #[test]
    fn array() {
        assert!(matches!(object(b"[45]").unwrap(), Object::Array(_)));
    }

    #[test]
    fn stream() {
        let obj = object(b"<< /Length 3 >> stream\nabc\nendstream").unwrap();

        assert!(matches!(obj, Object::Stream(_)));
        assert_eq!(obj.dict().unwrap().len(), 1);
    }

    #[test]
    fn reference() {
        assert_eq!(object(b"12 0 R"), Some(Object::Ref(ObjRef::new(12, 0))));
        assert!(matches!(object(b"12 0").unwrap(), Object::Number(_)));
    }

    #[test]
    fn leading_comment() {
        assert!(matches!(object(b"% function\n[1]").unwrap(), Object::Array(_)));
    }

    #[test]
    fn invalid() {
        assert!(object(b"]").is_none());
        assert!(object(b"").is_none());
    }

    #[test]
    fn identities() {
        let a = object(b"<</A 1>>").unwrap();
        let b = object(b"<</A 1>>").unwrap();

        assert_eq!(a, b);
        assert_ne!(a.identity(), b.identity());
        assert_eq!(a.identity(), a.clone().identity());
        assert_eq!(object(b"1").unwrap().identity(), None);
    }
}
