//! Name objects.

use crate::object::{Object, ObjectLike};
use crate::reader::{Readable, Reader};
use crate::trivia::is_regular_character;
use smallvec::SmallVec;
use std::borrow::Borrow;
use std::fmt::{Debug, Formatter};
use std::ops::Deref;

/// A PDF name.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(SmallVec<[u8; 24]>);

impl Deref for Name {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<[u8]> for Name {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl Name {
    /// Create a new name from a sequence of bytes, resolving `#xx` escapes.
    pub fn new(data: &[u8]) -> Self {
        if !data.contains(&b'#') {
            return Self(SmallVec::from_slice(data));
        }

        let mut cleaned = SmallVec::new();
        let mut r = Reader::new(data);

        while let Some(b) = r.read_byte() {
            if b == b'#'
                && let Some(escaped) = r
                    .tail()
                    .and_then(|t| Some(hex_value(*t.first()?)? << 4 | hex_value(*t.get(1)?)?))
            {
                r.jump(r.offset() + 2);
                cleaned.push(escaped);
            } else {
                cleaned.push(b);
            }
        }

        Self(cleaned)
    }

    /// Return a string representation of the name.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("{non-ascii key}")
    }
}

impl Debug for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.as_str())
    }
}

pub(crate) fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'0'..=b'9' => Some(c - b'0'),
        _ => None,
    }
}

impl Readable for Name {
    fn read(r: &mut Reader<'_>) -> Option<Self> {
        r.forward_tag(b"/")?;
        let start = r.offset();
        r.forward_while(is_regular_character);

        Some(Self::new(r.range(start..r.offset())?))
    }
}

impl TryFrom<Object> for Name {
    type Error = ();

    fn try_from(value: Object) -> Result<Self, Self::Error> {
        match value {
            Object::Name(n) => Ok(n),
            _ => Err(()),
        }
    }
}

impl ObjectLike for Name {}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(data: &[u8]) -> Option<Name> {
        Reader::new(data).read::<Name>()
    }

    #[test]
    fn empty() {
        assert_eq!(name(b"/").unwrap().deref(), b"");
    }

    #[test]
    fn missing_solidus() {
        assert!(name(b"dfg").is_none());
    }

    #[test]
    fn delimited() {
        assert_eq!(name(b"/FlateDecode/ASCIIHexDecode").unwrap().deref(), b"FlateDecode");
        assert_eq!(name(b"/Domain[0 1]").unwrap().deref(), b"Domain");
        assert_eq!(name(b"/Size 4").unwrap().deref(), b"Size");
    }

    #[test]
    fn escapes() {
        assert_eq!(name(b"/A#42").unwrap().deref(), b"AB");
        assert_eq!(name(b"/Lime#20Green").unwrap().deref(), b"Lime Green");
        // An invalid escape is kept as is.
        assert_eq!(name(b"/A#G1").unwrap().deref(), b"A#G1");
    }
}
