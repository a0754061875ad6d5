//! String objects.

use crate::object::name::hex_value;
use crate::object::{Object, ObjectLike};
use crate::reader::{Readable, Reader};
use crate::trivia::is_white_space_character;
use std::fmt::{Debug, Formatter};
use std::ops::Deref;

/// A PDF string, either written literally or in hexadecimal form.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct String(Vec<u8>);

impl String {
    /// Create a new string from its decoded bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    /// Return the decoded bytes of the string.
    pub fn get(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for String {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Debug for String {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", std::string::String::from_utf8_lossy(&self.0))
    }
}

impl Readable for String {
    fn read(r: &mut Reader<'_>) -> Option<Self> {
        match r.peek_byte()? {
            b'<' => read_hex(r),
            b'(' => read_literal(r),
            _ => None,
        }
        .map(Self)
    }
}

fn read_hex(r: &mut Reader<'_>) -> Option<Vec<u8>> {
    r.forward_tag(b"<")?;
    let mut nibbles = vec![];

    loop {
        match r.read_byte()? {
            b'>' => break,
            b if is_white_space_character(b) => {}
            b => nibbles.push(hex_value(b)?),
        }
    }

    // An odd number of digits behaves as if a final zero was appended.
    Some(
        nibbles
            .chunks(2)
            .map(|pair| pair[0] << 4 | pair.get(1).copied().unwrap_or(0))
            .collect(),
    )
}

fn read_literal(r: &mut Reader<'_>) -> Option<Vec<u8>> {
    r.forward_tag(b"(")?;
    let mut data = vec![];
    let mut depth = 1;

    loop {
        match r.read_byte()? {
            b'(' => {
                depth += 1;
                data.push(b'(');
            }
            b')' => {
                depth -= 1;

                if depth == 0 {
                    break;
                }

                data.push(b')');
            }
            b'\\' => match r.read_byte()? {
                b'n' => data.push(b'\n'),
                b'r' => data.push(b'\r'),
                b't' => data.push(b'\t'),
                b'b' => data.push(0x08),
                b'f' => data.push(0x0c),
                b'\r' => {
                    // Line continuation.
                    r.forward_tag(b"\n");
                }
                b'\n' => {}
                b @ b'0'..=b'7' => {
                    let mut value = (b - b'0') as u32;

                    for _ in 0..2 {
                        match r.eat(|b| matches!(b, b'0'..=b'7')) {
                            Some(b) => value = value * 8 + (b - b'0') as u32,
                            None => break,
                        }
                    }

                    data.push(value as u8);
                }
                b => data.push(b),
            },
            b => data.push(b),
        }
    }

    Some(data)
}

impl TryFrom<Object> for String {
    type Error = ();

    fn try_from(value: Object) -> Result<Self, Self::Error> {
        match value {
            Object::String(s) => Ok(s),
            _ => Err(()),
        }
    }
}

impl ObjectLike for String {}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(data: &[u8]) -> Option<Vec<u8>> {
        Reader::new(data).read::<String>().map(|s| s.get().to_vec())
    }

    #[test]
    fn hex() {
        assert_eq!(string(b"<00010203>").unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(string(b"<0 0 01 0 203>").unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(string(b"<901FA>").unwrap(), vec![0x90, 0x1f, 0xa0]);
        assert!(string(b"<0001").is_none());
        assert!(string(b"<00xy>").is_none());
    }

    #[test]
    fn literal() {
        assert_eq!(string(b"(Hi there.)").unwrap(), b"Hi there.");
        assert_eq!(string(b"(Hi (()) there)").unwrap(), b"Hi (()) there");
        assert_eq!(string(b"(Hi \\()").unwrap(), b"Hi (");
        assert_eq!(string(b"(\\n\\t\\\\)").unwrap(), b"\n\t\\");
        assert_eq!(string(b"(\\0053\\53)").unwrap(), b"\x053+");
        assert_eq!(string(b"(a\\\nb)").unwrap(), b"ab");
        assert!(string(b"(unterminated").is_none());
    }
}
