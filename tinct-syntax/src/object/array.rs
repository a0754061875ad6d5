//! Arrays.

use crate::object::{Object, ObjectIdentity, ObjectLike};
use crate::reader::{Readable, Reader};
use crate::xref::XRef;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// An array of PDF objects.
///
/// Cloning an array is cheap and keeps its identity.
#[derive(Clone, Default, PartialEq)]
pub struct Array(Arc<Vec<Object>>);

impl Array {
    /// Create a new array from a list of objects.
    pub fn new(items: Vec<Object>) -> Self {
        Self(Arc::new(items))
    }

    /// Returns the number of items in the array.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the array is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the unresolved items of the array.
    pub fn iter(&self) -> std::slice::Iter<'_, Object> {
        self.0.iter()
    }

    /// Return the unresolved item at `index`.
    pub fn get_raw(&self, index: usize) -> Option<&Object> {
        self.0.get(index)
    }

    /// Return the item at `index` as a specific object, resolving references.
    pub fn get<T: ObjectLike>(&self, index: usize, xref: &XRef) -> Option<T> {
        xref.resolve(self.get_raw(index)?)?.try_into().ok()
    }

    /// Convert all items into a specific object, resolving references.
    ///
    /// Returns `None` if any item cannot be converted.
    pub fn to_vec<T: ObjectLike>(&self, xref: &XRef) -> Option<Vec<T>> {
        (0..self.len()).map(|i| self.get::<T>(i, xref)).collect()
    }

    /// The identity of the array.
    pub fn identity(&self) -> ObjectIdentity {
        ObjectIdentity::of(&self.0)
    }
}

impl From<Vec<Object>> for Array {
    fn from(items: Vec<Object>) -> Self {
        Self::new(items)
    }
}

impl Debug for Array {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl Readable for Array {
    fn read(r: &mut Reader<'_>) -> Option<Self> {
        r.forward_tag(b"[")?;
        let mut items = vec![];

        loop {
            r.skip_white_spaces_and_comments();

            if let Some(()) = r.forward_tag(b"]") {
                return Some(Self::new(items));
            }

            items.push(r.read::<Object>()?);
        }
    }
}

impl TryFrom<Object> for Array {
    type Error = ();

    fn try_from(value: Object) -> Result<Self, Self::Error> {
        match value {
            Object::Array(a) => Ok(a),
            _ => Err(()),
        }
    }
}

impl ObjectLike for Array {}
