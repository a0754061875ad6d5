//! Number objects.

use crate::log::ldebug;
use crate::object::{Object, ObjectLike};
use crate::reader::{Readable, Reader};
use std::str::FromStr;

/// A PDF number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Number(InternalNumber);

impl Number {
    /// Returns the number as a f64.
    pub fn as_f64(&self) -> f64 {
        match self.0 {
            InternalNumber::Real(r) => r,
            InternalNumber::Integer(i) => i as f64,
        }
    }

    /// Returns the number as a f32.
    pub fn as_f32(&self) -> f32 {
        self.as_f64() as f32
    }

    /// Returns the number as an i32.
    pub fn as_i32(&self) -> i32 {
        match self.0 {
            InternalNumber::Real(r) => {
                let res = r as i32;

                if r.trunc() != r {
                    ldebug!("float {} was truncated to {}", r, res);
                }

                res
            }
            InternalNumber::Integer(i) => i,
        }
    }

    /// Whether the number was written as an integer.
    pub fn is_integer(&self) -> bool {
        matches!(self.0, InternalNumber::Integer(_))
    }

    /// Create a new `Number` from a f64 number.
    pub fn from_f64(num: f64) -> Self {
        Self(InternalNumber::Real(num))
    }

    /// Create a new `Number` from a i32 number.
    pub fn from_i32(num: i32) -> Self {
        Self(InternalNumber::Integer(num))
    }
}

impl Readable for Number {
    fn read(r: &mut Reader<'_>) -> Option<Self> {
        let start = r.offset();
        r.eat(|b| b == b'+' || b == b'-');

        match r.peek_byte()? {
            b'.' => {
                r.forward();
                r.forward_while_1(is_digit)?;
            }
            b'0'..=b'9' => {
                r.forward_while_1(is_digit)?;
                if let Some(()) = r.forward_tag(b".") {
                    r.forward_while(is_digit);
                }
            }
            _ => return None,
        }

        let data = r.range(start..r.offset())?;
        let is_real = data.contains(&b'.');
        // We need to use f64 here, so that we can still parse a full `i32` without losing
        // precision.
        let num = f64::from_str(std::str::from_utf8(data).ok()?).ok()?;

        if !is_real && num >= i32::MIN as f64 && num <= i32::MAX as f64 {
            Some(Self(InternalNumber::Integer(num as i32)))
        } else {
            Some(Self(InternalNumber::Real(num)))
        }
    }
}

impl TryFrom<Object> for Number {
    type Error = ();

    fn try_from(value: Object) -> Result<Self, Self::Error> {
        match value {
            Object::Number(n) => Ok(n),
            _ => Err(()),
        }
    }
}

impl ObjectLike for Number {}

#[derive(Clone, Copy, Debug, PartialEq)]
enum InternalNumber {
    Real(f64),
    Integer(i32),
}

macro_rules! int_num {
    ($i:ident) => {
        impl TryFrom<Object> for $i {
            type Error = ();

            fn try_from(value: Object) -> std::result::Result<Self, Self::Error> {
                match value {
                    Object::Number(n) => n.as_i32().try_into().ok().ok_or(()),
                    _ => Err(()),
                }
            }
        }

        impl ObjectLike for $i {}
    };
}

int_num!(i32);
int_num!(u32);
int_num!(u16);
int_num!(usize);
int_num!(u8);

macro_rules! float_num {
    ($f:ident, $conv:ident) => {
        impl TryFrom<Object> for $f {
            type Error = ();

            fn try_from(value: Object) -> std::result::Result<Self, Self::Error> {
                match value {
                    Object::Number(n) => Ok(n.$conv()),
                    _ => Err(()),
                }
            }
        }

        impl ObjectLike for $f {}
    };
}

float_num!(f32, as_f32);
float_num!(f64, as_f64);

fn is_digit(byte: u8) -> bool {
    byte.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(data: &str) -> Option<Number> {
        Reader::new(data.as_bytes()).read::<Number>()
    }

    #[test]
    fn integers() {
        assert_eq!(number("0").unwrap().as_i32(), 0);
        assert_eq!(number("+32").unwrap().as_i32(), 32);
        assert_eq!(number("-32").unwrap().as_i32(), -32);
        assert_eq!(number("003245").unwrap().as_i32(), 3245);
        assert_eq!(number("38359922").unwrap().as_i32(), 38359922);
        assert!(number("98349").unwrap().is_integer());
    }

    #[test]
    fn trailing() {
        assert_eq!(number("0abc").unwrap().as_i32(), 0);
        assert_eq!(number("1.5]").unwrap().as_f64(), 1.5);
    }

    #[test]
    fn reals() {
        assert_eq!(number("-32.01").unwrap().as_f64(), -32.01);
        assert_eq!(number("-.345").unwrap().as_f64(), -0.345);
        assert_eq!(number("-.00143").unwrap().as_f64(), -0.00143);
        assert_eq!(number("98349.432534").unwrap().as_f64(), 98349.432534);
        assert_eq!(number("4.").unwrap().as_f64(), 4.0);
        assert!(!number("4.").unwrap().is_integer());
    }

    #[test]
    fn large_integers_become_reals() {
        let n = number("4294967296").unwrap();
        assert!(!n.is_integer());
        assert_eq!(n.as_f64(), 4294967296.0);
    }

    #[test]
    fn invalid() {
        assert!(number("+abc").is_none());
        assert!(number(".").is_none());
        assert!(number("-").is_none());
    }

    #[test]
    fn conversions() {
        let obj = Object::Number(Number::from_f64(2.7));
        assert_eq!(i32::try_from(obj.clone()), Ok(2));
        assert_eq!(f64::try_from(obj.clone()), Ok(2.7));
        assert_eq!(u8::try_from(Object::Number(Number::from_i32(-1))), Err(()));
        assert_eq!(f64::try_from(Object::Boolean(true)), Err(()));
    }
}
