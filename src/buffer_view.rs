//! [BufferView]: a region of a [Buffer](crate::Buffer) from which [Accessors](Accessor) are
//! carved.

use std::cell::Ref;

use crate::{
    accessor::{Accessor, AccessorDesc, Placement},
    block::ByteBlock,
    error::Error,
};

/// Hint of the GPU binding point a view's data is intended for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

impl BufferTarget {
    pub fn to_gl(self) -> u32 {
        match self {
            Self::Array => 34962,
            Self::ElementArray => 34963,
        }
    }

    pub fn from_gl(val: u32) -> Result<Self, &'static str> {
        match val {
            34962 => Ok(Self::Array),
            34963 => Ok(Self::ElementArray),
            _ => Err("invalid BufferTarget value"),
        }
    }
}

/// Where an accessor taken from a view sits, and how it is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessorLayout {
    pub byte_offset_in_view: usize,
    pub byte_stride: usize,
    /// Natural size of one element, including every entry of an array element.
    pub element_size: usize,
    pub count: usize,
}

impl AccessorLayout {
    /// Whether elements of this accessor are interleaved with other data.
    #[inline]
    pub fn is_interleaved(&self) -> bool {
        self.byte_stride != self.element_size
    }
}

/// A byte range of a buffer, carved into accessors by a second bump pointer.
///
/// A view whose accessors all have their natural stride is *SoA* (each attribute is one
/// contiguous run); a view with any interleaved accessor is *AoS*.
#[derive(Debug)]
pub struct BufferView {
    block: ByteBlock,
    byte_offset_in_block: usize,
    byte_offset_in_buffer: usize,
    byte_length: usize,
    /// 0 means "tightly packed", computed per accessor.
    default_byte_stride: usize,
    target: Option<BufferTarget>,
    taken_bytes: usize,
    accessors: Vec<AccessorLayout>,
    is_aos: bool,
}

impl BufferView {
    pub(crate) fn new(
        block: ByteBlock,
        byte_offset_in_block: usize,
        byte_offset_in_buffer: usize,
        byte_length: usize,
        default_byte_stride: usize,
    ) -> Self {
        Self {
            block,
            byte_offset_in_block,
            byte_offset_in_buffer,
            byte_length,
            default_byte_stride,
            target: None,
            taken_bytes: 0,
            accessors: Vec::new(),
            is_aos: false,
        }
    }

    #[inline]
    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    #[inline]
    pub fn byte_offset_in_buffer(&self) -> usize {
        self.byte_offset_in_buffer
    }

    #[inline]
    pub fn byte_offset_in_block(&self) -> usize {
        self.byte_offset_in_block
    }

    #[inline]
    pub fn default_byte_stride(&self) -> usize {
        self.default_byte_stride
    }

    #[inline]
    pub fn taken_bytes(&self) -> usize {
        self.taken_bytes
    }

    #[inline]
    pub fn remaining_bytes(&self) -> usize {
        self.byte_length - self.taken_bytes
    }

    #[inline]
    pub fn target(&self) -> Option<BufferTarget> {
        self.target
    }

    #[inline]
    pub fn set_target(&mut self, target: Option<BufferTarget>) {
        self.target = target;
    }

    #[inline]
    pub fn block(&self) -> &ByteBlock {
        &self.block
    }

    /// Layouts of every accessor taken from this view, in the order they were taken.
    #[inline]
    pub fn accessor_layouts(&self) -> &[AccessorLayout] {
        &self.accessors
    }

    #[inline]
    pub fn is_aos(&self) -> bool {
        self.is_aos
    }

    #[inline]
    pub fn is_soa(&self) -> bool {
        !self.is_aos
    }

    /// The stride an accessor described by `desc` would be given by this view.
    pub fn effective_stride(&self, desc: &AccessorDesc) -> usize {
        if desc.byte_stride != 0 {
            desc.byte_stride
        } else if self.default_byte_stride != 0 {
            self.default_byte_stride
        } else {
            desc.element_size()
        }
    }

    /// Take an accessor at this view's bump pointer.
    ///
    /// # Errors
    ///
    /// * [Error::AllocationOverflow] if `stride * count` bytes do not fit in the rest of the
    ///   view; the bump pointer is unchanged
    /// * [Error::OutOfBoundsFootprint] if the accessor would extend past its block
    pub fn take_accessor(&mut self, desc: AccessorDesc) -> Result<Accessor, Error> {
        let byte_stride = self.effective_stride(&desc);
        let byte_offset = self.taken_bytes;
        let requested = byte_stride.saturating_mul(desc.count);
        self.check_fits(byte_offset, requested)?;

        let accessor = self.place_accessor(byte_offset, byte_stride, desc)?;
        // an 8-byte realignment may have pushed the accessor past the end of the view
        let end = accessor.byte_offset_in_view() + accessor.byte_length();
        self.check_fits(byte_offset, end - byte_offset)?;
        self.register(&accessor, end);
        Ok(accessor)
    }

    /// Take an accessor at `byte_offset` within this view, independent of the bump pointer.
    ///
    /// Used for interleaved attributes declared at fixed offsets; accessors placed this way
    /// may alias each other. Only the bytes actually addressed are required to fit: the last
    /// element needs `element_size` bytes, not a full stride.
    ///
    /// # Errors
    ///
    /// * [Error::AllocationOverflow] if the addressed bytes do not fit in the view
    /// * [Error::OutOfBoundsFootprint] if the accessor would extend past its block
    pub fn take_accessor_with_byte_offset(
        &mut self,
        desc: AccessorDesc,
        byte_offset: usize,
    ) -> Result<Accessor, Error> {
        let byte_stride = self.effective_stride(&desc);
        let footprint = desc.footprint(byte_stride);
        self.check_fits(byte_offset, footprint)?;

        let accessor = self.place_accessor(byte_offset, byte_stride, desc)?;
        let end = accessor.byte_offset_in_view() + accessor.footprint();
        self.check_fits(byte_offset, end - byte_offset)?;
        self.register(&accessor, end);
        Ok(accessor)
    }

    /// The bytes of exactly this view's region.
    ///
    /// # Panics
    ///
    /// * if the block is currently borrowed mutably
    pub fn byte_window(&self) -> Ref<'_, [u8]> {
        self.block.range(self.byte_offset_in_block, self.byte_length)
    }

    /// An owned copy of this view's bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.byte_window().to_vec()
    }

    /// Copy raw `bytes` into this view, starting `byte_offset` bytes into it.
    ///
    /// # Panics
    ///
    /// * `byte_offset + bytes.len() > self.byte_length()`
    pub fn write_bytes(&mut self, byte_offset: usize, bytes: &[u8]) {
        assert!(
            byte_offset + bytes.len() <= self.byte_length,
            "write of {} bytes at offset {byte_offset} exceeds buffer view of {} bytes",
            bytes.len(),
            self.byte_length
        );
        let start = self.byte_offset_in_block + byte_offset;
        self.block.bytes_mut()[start..start + bytes.len()].copy_from_slice(bytes);
    }

    /// Structural equality: same block, same region, same default stride.
    pub fn is_same(&self, other: &Self) -> bool {
        self.byte_length == other.byte_length
            && self.byte_offset_in_block == other.byte_offset_in_block
            && self.default_byte_stride == other.default_byte_stride
            && self.block.ptr_eq(&other.block)
    }

    fn check_fits(&self, byte_offset: usize, byte_length: usize) -> Result<(), Error> {
        match byte_offset.checked_add(byte_length) {
            Some(end) if end <= self.byte_length => Ok(()),
            _ => Err(Error::AllocationOverflow {
                requested: byte_length,
                byte_offset,
                capacity: self.byte_length,
            }),
        }
    }

    fn place_accessor(
        &self,
        byte_offset: usize,
        byte_stride: usize,
        desc: AccessorDesc,
    ) -> Result<Accessor, Error> {
        tracing::trace!(
            byte_offset_in_view = byte_offset,
            byte_stride,
            composition = %desc.composition,
            component = %desc.component,
            count = desc.count,
            "taking accessor"
        );
        Accessor::new(
            self.block.clone(),
            Placement {
                byte_offset_in_block: self.byte_offset_in_block + byte_offset,
                byte_offset_in_buffer: self.byte_offset_in_buffer + byte_offset,
                byte_offset_in_view: byte_offset,
                byte_stride,
            },
            desc,
        )
    }

    fn register(&mut self, accessor: &Accessor, end: usize) {
        let layout = AccessorLayout {
            byte_offset_in_view: accessor.byte_offset_in_view(),
            byte_stride: accessor.byte_stride(),
            element_size: accessor.element_size(),
            count: accessor.count(),
        };
        self.is_aos |= layout.is_interleaved();
        self.accessors.push(layout);
        self.taken_bytes = self.taken_bytes.max(end);
    }
}
