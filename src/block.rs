//! The shared memory block behind a [Buffer](crate::Buffer).

use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

/// A fixed-size, contiguous byte allocation shared by a buffer and every view into it.
///
/// Cloning a block clones the handle, not the bytes; every clone observes the same memory.
/// Identity (for de-duplication) is handle identity; see [ByteBlock::ptr_eq].
#[derive(Debug, Clone, Default)]
pub struct ByteBlock(Rc<RefCell<Box<[u8]>>>);

impl ByteBlock {
    /// Allocate a new block of `len` zeroed bytes.
    pub fn zeroed(len: usize) -> Self {
        Self::from(vec![0u8; len])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `self` and `other` are handles to the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// # Panics
    ///
    /// * if the block is currently borrowed mutably
    #[inline]
    pub fn bytes(&self) -> Ref<'_, [u8]> {
        Ref::map(self.0.borrow(), |b| &b[..])
    }

    /// # Panics
    ///
    /// * if the block is currently borrowed
    #[inline]
    pub fn bytes_mut(&self) -> RefMut<'_, [u8]> {
        RefMut::map(self.0.borrow_mut(), |b| &mut b[..])
    }

    /// Borrow `len` bytes starting at `offset`.
    ///
    /// # Panics
    ///
    /// * `offset + len > self.len()`
    pub fn range(&self, offset: usize, len: usize) -> Ref<'_, [u8]> {
        Ref::map(self.0.borrow(), |b| &b[offset..offset + len])
    }
}

impl From<Vec<u8>> for ByteBlock {
    fn from(data: Vec<u8>) -> Self {
        Self(Rc::new(RefCell::new(data.into_boxed_slice())))
    }
}

impl From<&[u8]> for ByteBlock {
    fn from(data: &[u8]) -> Self {
        Self::from(data.to_vec())
    }
}
