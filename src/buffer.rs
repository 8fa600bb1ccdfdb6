//! [Buffer]: a bump-allocated arena of bytes from which [BufferViews](BufferView) are carved.

use std::ops::Range;

use tessera_common::{ComponentType, CompositionType};

use crate::{
    accessor::{Accessor, AccessorDesc, Placement},
    block::ByteBlock,
    buffer_view::BufferView,
    error::Error,
};

/// Size in bytes of the words addressed by [Buffer::typed_window].
pub const WORD_SIZE: usize = 4;

/// An arena over a window of one contiguous [ByteBlock].
///
/// Views are handed out by advancing a bump pointer; nothing is ever freed. Releasing a view
/// leaves its bytes permanently unused.
///
/// # Invariants
///
/// * `taken_bytes <= byte_length`
/// * every child view region lies inside `0..byte_length`
/// * child view regions never overlap
#[derive(Debug)]
pub struct Buffer {
    block: ByteBlock,
    name: String,
    byte_length: usize,
    byte_offset_in_block: usize,
    byte_align: usize,
    taken_bytes: usize,
    /// Buffer-relative regions of every view taken from this buffer.
    views: Vec<Range<usize>>,
}

impl Buffer {
    /// Wrap the first `byte_length` bytes of `block` as an arena.
    ///
    /// # Errors
    ///
    /// * [Error::OutOfBoundsFootprint] if `block` is shorter than `byte_length`
    pub fn new(
        byte_length: usize,
        block: ByteBlock,
        name: impl Into<String>,
        byte_align: usize,
    ) -> Result<Self, Error> {
        Self::with_base_offset(byte_length, block, 0, name, byte_align)
    }

    /// Wrap `block[base_offset..base_offset + byte_length]` as an arena.
    ///
    /// # Errors
    ///
    /// * [Error::OutOfBoundsFootprint] if the window does not fit inside `block`
    pub fn with_base_offset(
        byte_length: usize,
        block: ByteBlock,
        base_offset: usize,
        name: impl Into<String>,
        byte_align: usize,
    ) -> Result<Self, Error> {
        let block_length = block.len();
        if base_offset
            .checked_add(byte_length)
            .map_or(true, |end| end > block_length)
        {
            return Err(Error::OutOfBoundsFootprint {
                byte_offset: base_offset,
                footprint: byte_length,
                block_length,
            });
        }
        Ok(Self {
            block,
            name: name.into(),
            byte_length,
            byte_offset_in_block: base_offset,
            byte_align: byte_align.max(1),
            taken_bytes: 0,
            views: Vec::new(),
        })
    }

    /// Allocate a fresh zeroed block of exactly `byte_length` bytes and wrap it.
    pub fn allocate(byte_length: usize, name: impl Into<String>, byte_align: usize) -> Self {
        Self {
            block: ByteBlock::zeroed(byte_length),
            name: name.into(),
            byte_length,
            byte_offset_in_block: 0,
            byte_align: byte_align.max(1),
            taken_bytes: 0,
            views: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    /// Offset of this buffer's first byte within its block.
    #[inline]
    pub fn byte_offset_in_block(&self) -> usize {
        self.byte_offset_in_block
    }

    #[inline]
    pub fn byte_align(&self) -> usize {
        self.byte_align
    }

    /// The bump pointer; bytes before it have been handed out (or skipped).
    #[inline]
    pub fn taken_bytes(&self) -> usize {
        self.taken_bytes
    }

    #[inline]
    pub fn remaining_bytes(&self) -> usize {
        self.byte_length - self.taken_bytes
    }

    #[inline]
    pub fn block(&self) -> &ByteBlock {
        &self.block
    }

    /// Buffer-relative regions of every view taken so far, in the order they were taken.
    #[inline]
    pub fn view_regions(&self) -> &[Range<usize>] {
        &self.views
    }

    /// Round `byte_length` up to this buffer's alignment.
    ///
    /// [take_buffer_view](Self::take_buffer_view) never pads; callers that need aligned views
    /// request `padded_length(n)` bytes instead of `n`.
    #[inline]
    pub fn padded_length(&self, byte_length: usize) -> usize {
        byte_length.next_multiple_of(self.byte_align)
    }

    /// Take a view of exactly `byte_length_to_need` bytes at the bump pointer.
    ///
    /// `byte_stride` is the view's default stride; 0 means accessors are tightly packed.
    ///
    /// # Errors
    ///
    /// * [Error::AllocationOverflow] if `byte_length_to_need + self.taken_bytes() >
    ///   self.byte_length()`; the bump pointer is unchanged
    pub fn take_buffer_view(
        &mut self,
        byte_length_to_need: usize,
        byte_stride: usize,
    ) -> Result<BufferView, Error> {
        let byte_offset = self.taken_bytes;
        let end = self.checked_end(byte_offset, byte_length_to_need)?;
        if byte_length_to_need % self.byte_align != 0 {
            tracing::debug!(
                buffer = self.name.as_str(),
                byte_length = byte_length_to_need,
                byte_align = self.byte_align,
                "buffer view length is not a multiple of the buffer alignment; following views will be unaligned"
            );
        }
        Ok(self.place_view(byte_offset, end, byte_stride))
    }

    /// Take a view of `byte_length_to_need` bytes at `byte_offset` (relative to this buffer).
    ///
    /// The bump pointer only moves if the new region extends past it, so a later
    /// [take_buffer_view](Self::take_buffer_view) can never land on top of this region.
    ///
    /// # Errors
    ///
    /// * [Error::AllocationOverflow] if the region extends past the end of the buffer
    /// * [Error::RegionOverlap] if the region overlaps any view already taken
    pub fn take_buffer_view_with_byte_offset(
        &mut self,
        byte_length_to_need: usize,
        byte_stride: usize,
        byte_offset: usize,
    ) -> Result<BufferView, Error> {
        let end = self.checked_end(byte_offset, byte_length_to_need)?;
        if byte_length_to_need > 0
            && self
                .views
                .iter()
                .any(|r| r.start < end && byte_offset < r.end)
        {
            return Err(Error::RegionOverlap {
                byte_offset,
                byte_length: byte_length_to_need,
            });
        }
        Ok(self.place_view(byte_offset, end, byte_stride))
    }

    /// An [Accessor] directly over this buffer's bytes, without a [BufferView].
    ///
    /// The window starts `word_offset` 4-byte words into the buffer and holds `length`
    /// tightly packed elements. Nothing is registered and the bump pointer does not move, so
    /// the window may alias views; it is an escape hatch for direct access.
    ///
    /// # Errors
    ///
    /// * [Error::OutOfBoundsFootprint] if the window, after any 8-byte realignment, extends
    ///   past the end of the buffer
    pub fn typed_window(
        &self,
        word_offset: usize,
        composition: CompositionType,
        component: ComponentType,
        length: usize,
    ) -> Result<Accessor, Error> {
        let byte_offset = word_offset * WORD_SIZE;
        let footprint = composition.size_in_bytes(component) * length;
        if byte_offset
            .checked_add(footprint)
            .map_or(true, |end| end > self.byte_length)
        {
            return Err(Error::OutOfBoundsFootprint {
                byte_offset,
                footprint,
                block_length: self.byte_length,
            });
        }
        let window = Accessor::new(
            self.block.clone(),
            Placement {
                byte_offset_in_block: self.byte_offset_in_block + byte_offset,
                byte_offset_in_buffer: byte_offset,
                byte_offset_in_view: byte_offset,
                byte_stride: 0,
            },
            AccessorDesc::new(composition, component, length),
        )?;
        // an 8-byte realignment may have pushed the window past the end of the buffer
        let realigned_offset = window.byte_offset_in_buffer();
        if realigned_offset + window.footprint() > self.byte_length {
            return Err(Error::OutOfBoundsFootprint {
                byte_offset: realigned_offset,
                footprint: window.footprint(),
                block_length: self.byte_length,
            });
        }
        Ok(window)
    }

    /// Whether `self` and `other` are backed by the same block.
    #[inline]
    pub fn is_same(&self, other: &Self) -> bool {
        self.block.ptr_eq(&other.block)
    }

    fn checked_end(&self, byte_offset: usize, byte_length: usize) -> Result<usize, Error> {
        byte_offset
            .checked_add(byte_length)
            .filter(|&end| end <= self.byte_length)
            .ok_or(Error::AllocationOverflow {
                requested: byte_length,
                byte_offset,
                capacity: self.byte_length,
            })
    }

    fn place_view(&mut self, byte_offset: usize, end: usize, byte_stride: usize) -> BufferView {
        tracing::trace!(
            buffer = self.name.as_str(),
            byte_offset,
            byte_length = end - byte_offset,
            byte_stride,
            "taking buffer view"
        );
        self.views.push(byte_offset..end);
        self.taken_bytes = self.taken_bytes.max(end);
        BufferView::new(
            self.block.clone(),
            self.byte_offset_in_block + byte_offset,
            byte_offset,
            end - byte_offset,
            byte_stride,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sliced_block_keeps_base_offset() {
        let block = ByteBlock::zeroed(256);
        let mut buffer = Buffer::with_base_offset(64, block, 128, "slice", 4).unwrap();
        let view = buffer.take_buffer_view(16, 0).unwrap();
        assert_eq!(view.byte_offset_in_buffer(), 0);
        assert_eq!(view.byte_offset_in_block(), 128);
    }

    #[test]
    fn window_past_block_end_is_rejected() {
        let block = ByteBlock::zeroed(64);
        assert_eq!(
            Buffer::with_base_offset(64, block, 8, "slice", 4).unwrap_err(),
            Error::OutOfBoundsFootprint {
                byte_offset: 8,
                footprint: 64,
                block_length: 64,
            }
        );
    }

    #[test]
    fn padding_is_left_to_the_caller() {
        let mut buffer = Buffer::allocate(32, "pad", 4);
        buffer.take_buffer_view(6, 0).unwrap();
        assert_eq!(buffer.taken_bytes(), 6);
        assert_eq!(buffer.padded_length(6), 8);
    }

    #[test]
    fn offset_placement_pushes_bump_pointer() {
        let mut buffer = Buffer::allocate(64, "mixed", 4);
        buffer.take_buffer_view_with_byte_offset(8, 0, 32).unwrap();
        assert_eq!(buffer.taken_bytes(), 40);
        let view = buffer.take_buffer_view(8, 0).unwrap();
        assert_eq!(view.byte_offset_in_buffer(), 40);
        // the gap before the placed region is still usable by explicit placement
        buffer.take_buffer_view_with_byte_offset(32, 0, 0).unwrap();
        assert_eq!(buffer.taken_bytes(), 48);
    }

    #[test]
    fn offset_placement_rejects_overlap() {
        let mut buffer = Buffer::allocate(64, "overlap", 4);
        buffer.take_buffer_view(16, 0).unwrap();
        assert_eq!(
            buffer.take_buffer_view_with_byte_offset(8, 0, 12).unwrap_err(),
            Error::RegionOverlap {
                byte_offset: 12,
                byte_length: 8,
            }
        );
        assert_eq!(buffer.view_regions(), &[0..16]);
    }

    #[test]
    fn typed_window_reads_raw_words() {
        let mut buffer = Buffer::allocate(16, "raw", 4);
        let mut view = buffer.take_buffer_view(16, 0).unwrap();
        view.write_bytes(8, &7.5f32.to_le_bytes());
        let window = buffer
            .typed_window(2, CompositionType::Scalar, ComponentType::Float, 2)
            .unwrap();
        assert_eq!(window.get_scalar(0, Default::default()), 7.5);
        assert!(buffer
            .typed_window(3, CompositionType::Scalar, ComponentType::Float, 2)
            .is_err());
    }

    #[test]
    fn realigned_window_stays_inside_buffer() {
        let block = ByteBlock::zeroed(32);
        let buffer = Buffer::new(12, block, "partial", 4).unwrap();
        assert_eq!(
            buffer
                .typed_window(1, CompositionType::Scalar, ComponentType::Double, 1)
                .unwrap_err(),
            Error::OutOfBoundsFootprint {
                byte_offset: 8,
                footprint: 8,
                block_length: 12,
            }
        );
        let aligned = buffer
            .typed_window(0, CompositionType::Scalar, ComponentType::Double, 1)
            .unwrap();
        assert!(!aligned.alignment_corrected());
    }

    #[test]
    fn identity_is_block_identity() {
        let block = ByteBlock::zeroed(32);
        let a = Buffer::new(16, block.clone(), "a", 4).unwrap();
        let b = Buffer::with_base_offset(16, block, 16, "b", 4).unwrap();
        let c = Buffer::allocate(16, "c", 4);
        assert!(a.is_same(&b));
        assert!(!a.is_same(&c));
    }
}
