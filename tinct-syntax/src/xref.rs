//! Storing and resolving indirect objects.

use crate::object::r#ref::read_int;
use crate::object::{ObjRef, Object, ObjectLike};
use crate::reader::Reader;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// The maximum number of references that are followed when resolving an object.
pub const MAX_REFERENCE_DEPTH: usize = 16;

/// A store of indirect objects.
///
/// Cloning an `XRef` is cheap, clones share their objects until one of them is
/// modified.
#[derive(Debug, Clone, Default)]
pub struct XRef(Arc<FxHashMap<ObjRef, Object>>);

impl XRef {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a sequence of `N G obj ... endobj` definitions.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let mut xref = Self::new();
        let mut r = Reader::new(data);

        loop {
            r.skip_white_spaces_and_comments();

            if r.at_end() {
                return Some(xref);
            }

            let obj_number = read_int(&mut r)?;
            r.skip_white_spaces_and_comments();
            let gen_number = read_int(&mut r)?;
            r.skip_white_spaces_and_comments();
            r.forward_tag(b"obj")?;
            r.skip_white_spaces_and_comments();
            let object = r.read::<Object>()?;
            r.skip_white_spaces_and_comments();
            r.forward_tag(b"endobj")?;

            xref.insert(ObjRef::new(obj_number, gen_number), object);
        }
    }

    /// Insert an indirect object, replacing any previous object with the same reference.
    pub fn insert(&mut self, obj_ref: ObjRef, object: Object) {
        Arc::make_mut(&mut self.0).insert(obj_ref, object);
    }

    /// Return the number of indirect objects.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the object stored for a reference, without resolving it further.
    pub fn get_raw(&self, obj_ref: ObjRef) -> Option<&Object> {
        self.0.get(&obj_ref)
    }

    /// Return the object for a reference as a specific type, following reference chains.
    pub fn get<T: ObjectLike>(&self, obj_ref: ObjRef) -> Option<T> {
        self.resolve(&Object::Ref(obj_ref))?.try_into().ok()
    }

    /// Resolve an object, following references until a direct object is reached.
    ///
    /// Returns `None` for dangling references and for chains that are too long,
    /// which includes cyclic ones.
    pub fn resolve(&self, object: &Object) -> Option<Object> {
        let mut current = object;

        for _ in 0..=MAX_REFERENCE_DEPTH {
            match current {
                Object::Ref(r) => current = self.get_raw(*r)?,
                _ => return Some(current.clone()),
            }
        }

        None
    }
}
