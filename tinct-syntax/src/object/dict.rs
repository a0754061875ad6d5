//! Dictionaries.

use crate::object::{Name, ObjRef, Object, ObjectIdentity, ObjectLike};
use crate::reader::{Readable, Reader};
use crate::xref::XRef;
use rustc_hash::FxHashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A dictionary, which is a key-value map, keys being names, and values being any PDF object or
/// object reference.
///
/// Cloning a dictionary is cheap and keeps its identity.
#[derive(Clone, Default, PartialEq)]
pub struct Dict(Arc<FxHashMap<Name, Object>>);

impl Dict {
    /// Create a new empty dictionary.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a new dictionary from a list of entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (Name, Object)>) -> Self {
        Self(Arc::new(entries.into_iter().collect()))
    }

    /// Returns the number of entries in the dictionary.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks whether the dictionary contains an entry with a specific key.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the entry of a key as a specific object, resolving it in case it's
    /// an object reference.
    pub fn get<T: ObjectLike>(&self, key: &[u8], xref: &XRef) -> Option<T> {
        xref.resolve(self.get_raw(key)?)?.try_into().ok()
    }

    /// Return the unresolved entry for a specific key.
    pub fn get_raw(&self, key: &[u8]) -> Option<&Object> {
        self.0.get(key)
    }

    /// Get the object reference linked to a key.
    pub fn get_ref(&self, key: &[u8]) -> Option<ObjRef> {
        match self.get_raw(key)? {
            Object::Ref(r) => Some(*r),
            _ => None,
        }
    }

    /// Returns an iterator over all keys in the dictionary.
    pub fn keys(&self) -> impl Iterator<Item = &Name> {
        self.0.keys()
    }

    /// The identity of the dictionary.
    pub fn identity(&self) -> ObjectIdentity {
        ObjectIdentity::of(&self.0)
    }
}

impl Debug for Dict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut entries = self.0.iter().collect::<Vec<_>>();
        entries.sort_by(|(k1, _), (k2, _)| k1.cmp(k2));

        f.debug_map().entries(entries).finish()
    }
}

impl Readable for Dict {
    fn read(r: &mut Reader<'_>) -> Option<Self> {
        r.forward_tag(b"<<")?;
        let mut entries = FxHashMap::default();

        loop {
            r.skip_white_spaces_and_comments();

            if let Some(()) = r.forward_tag(b">>") {
                return Some(Self(Arc::new(entries)));
            }

            let key = r.read::<Name>()?;
            r.skip_white_spaces_and_comments();
            let value = r.read::<Object>()?;

            // A null value is equivalent to the entry not existing.
            if value != Object::Null {
                entries.insert(key, value);
            }
        }
    }
}

impl TryFrom<Object> for Dict {
    type Error = ();

    fn try_from(value: Object) -> Result<Self, Self::Error> {
        match value {
            Object::Dict(d) => Ok(d),
            Object::Stream(s) => Ok(s.dict().clone()),
            _ => Err(()),
        }
    }
}

impl ObjectLike for Dict {}

/// A collection of common dictionary keys.
#[allow(missing_docs)]
pub mod keys {
    macro_rules! key {
        ($i:ident, $e:expr) => {
            pub const $i: &'static [u8] = $e;
        };
    }

    // Streams
    key!(ASCII_HEX_DECODE, b"ASCIIHexDecode");
    key!(ASCII_HEX_DECODE_ABBREVIATION, b"AHx");
    key!(DECODE_PARMS, b"DecodeParms");
    key!(FILTER, b"Filter");
    key!(FLATE_DECODE, b"FlateDecode");
    key!(FLATE_DECODE_ABBREVIATION, b"Fl");
    key!(LENGTH, b"Length");
    key!(PREDICTOR, b"Predictor");

    // Functions
    key!(BITS_PER_SAMPLE, b"BitsPerSample");
    key!(BOUNDS, b"Bounds");
    key!(C0, b"C0");
    key!(C1, b"C1");
    key!(DECODE, b"Decode");
    key!(DOMAIN, b"Domain");
    key!(ENCODE, b"Encode");
    key!(FUNCTION_TYPE, b"FunctionType");
    key!(FUNCTIONS, b"Functions");
    key!(N, b"N");
    key!(ORDER, b"Order");
    key!(RANGE, b"Range");
    key!(SIZE, b"Size");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Array, Number};
    use std::ops::Deref;

    fn dict(data: &[u8]) -> Option<Dict> {
        Reader::new(data).read::<Dict>()
    }

    #[test]
    fn empty() {
        assert!(dict(b"<<>>").unwrap().is_empty());
        assert!(dict(b"<<  \n >>").unwrap().is_empty());
    }

    #[test]
    fn entries() {
        let d = dict(b"<</FunctionType 2 /Domain [0 1] /N 1.5 /Name/Value>>").unwrap();
        let xref = XRef::default();

        assert_eq!(d.len(), 4);
        assert_eq!(d.get::<i32>(keys::FUNCTION_TYPE, &xref), Some(2));
        assert_eq!(d.get::<f64>(keys::N, &xref), Some(1.5));
        assert_eq!(d.get::<Name>(b"Name", &xref).unwrap().deref(), b"Value");
        assert_eq!(
            d.get::<Array>(keys::DOMAIN, &xref)
                .unwrap()
                .to_vec::<f64>(&xref),
            Some(vec![0.0, 1.0])
        );
        assert!(d.get::<Dict>(keys::N, &xref).is_none());
        assert!(!d.contains_key(keys::RANGE));
    }

    #[test]
    fn null_entries_are_dropped() {
        let d = dict(b"<</A null /B 1>>").unwrap();
        assert!(!d.contains_key(b"A"));
        assert!(d.contains_key(b"B"));
    }

    #[test]
    fn references() {
        let d = dict(b"<</N 3 0 R>>").unwrap();
        let mut xref = XRef::default();

        assert_eq!(d.get_ref(keys::N), Some(ObjRef::new(3, 0)));
        assert_eq!(d.get::<f64>(keys::N, &xref), None);

        xref.insert(ObjRef::new(3, 0), Object::Number(Number::from_i32(2)));
        assert_eq!(d.get::<f64>(keys::N, &xref), Some(2.0));
    }

    #[test]
    fn with_comments() {
        let d = dict(b"<< % start\n/Length 3 % the length\n>>").unwrap();
        assert_eq!(d.get::<u32>(keys::LENGTH, &XRef::default()), Some(3));
    }

    #[test]
    fn invalid() {
        assert!(dict(b"<</A 1").is_none());
        assert!(dict(b"<<1 2>>").is_none());
    }
}
