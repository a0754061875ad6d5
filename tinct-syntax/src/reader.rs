//! Reading bytes and PDF objects from data.

use crate::trivia::{is_eol_character, is_white_space_character};
use std::ops::Range;

/// A cursor over a byte slice.
#[derive(Clone, Debug)]
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    #[inline]
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub(crate) fn jump(&mut self, offset: usize) {
        self.offset = offset;
    }

    #[inline]
    pub(crate) fn at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    #[inline]
    pub(crate) fn tail(&self) -> Option<&'a [u8]> {
        self.data.get(self.offset..)
    }

    #[inline]
    pub(crate) fn range(&self, range: Range<usize>) -> Option<&'a [u8]> {
        self.data.get(range)
    }

    #[inline]
    pub(crate) fn read_byte(&mut self) -> Option<u8> {
        let byte = self.peek_byte()?;
        self.offset += 1;

        Some(byte)
    }

    #[inline]
    pub(crate) fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let bytes = self.data.get(self.offset..self.offset.checked_add(len)?)?;
        self.offset += len;

        Some(bytes)
    }

    #[inline]
    pub(crate) fn peek_byte(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    #[inline]
    pub(crate) fn peek_tag(&self, tag: &[u8]) -> Option<()> {
        self.tail()?.starts_with(tag).then_some(())
    }

    #[inline]
    pub(crate) fn forward(&mut self) {
        self.offset += 1;
    }

    #[inline]
    pub(crate) fn forward_tag(&mut self, tag: &[u8]) -> Option<()> {
        self.peek_tag(tag)?;
        self.offset += tag.len();

        Some(())
    }

    #[inline]
    pub(crate) fn forward_while(&mut self, f: impl Fn(u8) -> bool) {
        while self.peek_byte().is_some_and(&f) {
            self.forward();
        }
    }

    #[inline]
    pub(crate) fn forward_while_1(&mut self, f: impl Fn(u8) -> bool) -> Option<()> {
        self.eat(&f)?;
        self.forward_while(f);

        Some(())
    }

    #[inline]
    pub(crate) fn eat(&mut self, f: impl Fn(u8) -> bool) -> Option<u8> {
        let byte = self.peek_byte()?;

        if f(byte) {
            self.forward();
            Some(byte)
        } else {
            None
        }
    }

    /// Read an object, leaving the reader untouched if that fails.
    #[inline]
    pub(crate) fn read<T: Readable>(&mut self) -> Option<T> {
        let old_offset = self.offset;

        T::read(self).or_else(|| {
            self.offset = old_offset;

            None
        })
    }

    #[inline]
    pub(crate) fn skip_white_spaces(&mut self) {
        self.forward_while(is_white_space_character);
    }

    #[inline]
    pub(crate) fn skip_white_spaces_and_comments(&mut self) {
        while let Some(b) = self.peek_byte() {
            if is_white_space_character(b) {
                self.skip_white_spaces();
            } else if b == b'%' {
                self.forward_while(|b| !is_eol_character(b));
            } else {
                return;
            }
        }
    }
}

pub(crate) trait Readable: Sized {
    fn read(r: &mut Reader<'_>) -> Option<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_white_spaces() {
        let mut r = Reader::new(b"  % a comment\n\r\n  % another\nabc");
        r.skip_white_spaces_and_comments();

        assert_eq!(r.tail().unwrap(), b"abc");
    }

    #[test]
    fn tags() {
        let mut r = Reader::new(b"endobj");
        assert!(r.forward_tag(b"endstream").is_none());
        assert_eq!(r.offset(), 0);
        assert!(r.forward_tag(b"end").is_some());
        assert_eq!(r.read_bytes(3).unwrap(), b"obj");
        assert!(r.at_end());
        assert!(r.read_bytes(1).is_none());
    }
}
