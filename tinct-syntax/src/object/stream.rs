//! Streams.

use crate::error::DecodeError;
use crate::filter::Filter;
use crate::log::ldebug;
use crate::object::dict::keys::{DECODE_PARMS, FILTER, LENGTH};
use crate::object::{Dict, Object, ObjectIdentity, ObjectLike};
use crate::reader::{Readable, Reader};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A stream of arbitrary data.
///
/// Cloning a stream is cheap and keeps its identity.
#[derive(Clone, PartialEq)]
pub struct Stream(Arc<Repr>);

#[derive(PartialEq)]
struct Repr {
    dict: Dict,
    data: Vec<u8>,
}

impl Stream {
    /// Create a new stream from its dictionary and raw (still encoded) data.
    pub fn new(dict: Dict, data: Vec<u8>) -> Self {
        Self(Arc::new(Repr { dict, data }))
    }

    /// Return the dictionary of the stream.
    pub fn dict(&self) -> &Dict {
        &self.0.dict
    }

    /// Return the raw data of the stream, before applying any filters.
    pub fn raw_data(&self) -> &[u8] {
        &self.0.data
    }

    /// Return the decoded data of the stream.
    ///
    /// Note that the result of this method will not be cached, so calling it multiple
    /// times is expensive.
    pub fn decoded(&self) -> Result<Cow<'_, [u8]>, DecodeError> {
        let mut current = Cow::Borrowed(self.raw_data());

        for (i, filter) in self.filters()?.into_iter().enumerate() {
            let params = match self.0.dict.get_raw(DECODE_PARMS) {
                Some(Object::Dict(d)) => Some(d),
                Some(Object::Array(a)) => match a.get_raw(i) {
                    Some(Object::Dict(d)) => Some(d),
                    _ => None,
                },
                _ => None,
            };

            current = Cow::Owned(filter.apply(&current, params)?);
        }

        Ok(current)
    }

    fn filters(&self) -> Result<SmallVec<[Filter; 2]>, DecodeError> {
        match self.0.dict.get_raw(FILTER) {
            None => Ok(SmallVec::new()),
            Some(Object::Name(n)) => Ok(SmallVec::from_elem(Filter::from_name(n)?, 1)),
            Some(Object::Array(a)) => a
                .iter()
                .map(|item| match item {
                    Object::Name(n) => Filter::from_name(n),
                    _ => Err(DecodeError::MalformedFilter),
                })
                .collect(),
            Some(_) => Err(DecodeError::MalformedFilter),
        }
    }

    /// The identity of the stream.
    pub fn identity(&self) -> ObjectIdentity {
        ObjectIdentity::of(&self.0)
    }
}

impl Debug for Stream {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stream (len: {:?})", self.0.data.len())
    }
}

impl Readable for Stream {
    fn read(r: &mut Reader<'_>) -> Option<Self> {
        let dict = r.read::<Dict>()?;

        r.skip_white_spaces_and_comments();
        r.forward_tag(b"stream")?;
        let _ = r
            .forward_tag(b"\r\n")
            .or_else(|| r.forward_tag(b"\n"))
            .or_else(|| r.forward_tag(b"\r"));

        if let Some(Object::Number(length)) = dict.get_raw(LENGTH)
            && let Ok(length) = usize::try_from(length.as_i32())
        {
            let mut probe = r.clone();

            if let Some(data) = probe.read_bytes(length) {
                probe.skip_white_spaces();

                if probe.forward_tag(b"endstream").is_some() {
                    r.jump(probe.offset());

                    return Some(Self::new(dict, data.to_vec()));
                }
            }

            ldebug!("stream has an invalid length, scanning for the end instead");
        }

        let tail = r.tail()?;
        let end = tail.windows(9).position(|w| w == b"endstream")?;
        let mut data = &tail[..end];

        if let Some(stripped) = data.strip_suffix(b"\r\n") {
            data = stripped;
        } else if let Some(stripped) = data
            .strip_suffix(b"\n")
            .or_else(|| data.strip_suffix(b"\r"))
        {
            data = stripped;
        }

        r.jump(r.offset() + end + 9);

        Some(Self::new(dict, data.to_vec()))
    }
}

impl TryFrom<Object> for Stream {
    type Error = ();

    fn try_from(value: Object) -> Result<Self, Self::Error> {
        match value {
            Object::Stream(s) => Ok(s),
            _ => Err(()),
        }
    }
}

impl ObjectLike for Stream {}
