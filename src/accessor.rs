//! [Accessor]: a typed, strided window into the bytes of a [BufferView](crate::BufferView).
//!
//! # Addressing
//!
//! Element `i` of an accessor starts at `byte_offset_in_block + byte_stride * i`. The `*_at`
//! variants add a further `composition_offset` (in bytes), for reading lanes of an element that
//! is shared by several interleaved values. When [AccessOptions] carries an index accessor,
//! `i` is first remapped through it; this is how indexed geometry and indexed animation
//! channels are read with the same code as plain ones.
//!
//! # Flavors
//!
//! Every shape is available as
//!
//! * a returned value ([get_vec3](Accessor::get_vec3), [get](Accessor::get)),
//! * a write into a caller-owned value ([get_into](Accessor::get_into)), for hot paths that
//!   shouldn't allocate,
//! * a plain `Vec<f64>` ([get_element](Accessor::get_element)), for export code that
//!   shouldn't depend on math types.

use nalgebra::{Matrix2, Matrix3, Matrix4, Vector2, Vector3, Vector4};
use tessera_common::{ComponentType, CompositionType, Endian, ReadFn, WriteFn};

use crate::{block::ByteBlock, error::Error, value::FlatValue};

mod bounds;
mod desc;
mod transfer;

pub use desc::{AccessOptions, AccessorDesc};

/// Component types at least this wide are realigned to their own size at construction.
const REALIGNED_COMPONENT_SIZE: usize = 8;

/// Where an accessor lands, as decided by the view (or buffer) creating it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
    pub(crate) byte_offset_in_block: usize,
    pub(crate) byte_offset_in_buffer: usize,
    pub(crate) byte_offset_in_view: usize,
    /// 0 means the natural element size.
    pub(crate) byte_stride: usize,
}

/// A typed, strided window into a shared byte block.
///
/// Accessors never own their bytes: any number of accessors may alias the same memory, and a
/// write through one is immediately visible through every other.
#[derive(Debug)]
pub struct Accessor {
    block: ByteBlock,
    composition: CompositionType,
    component: ComponentType,
    count: usize,
    byte_stride: usize,
    array_length: usize,
    normalized: bool,
    byte_offset_in_block: usize,
    byte_offset_in_buffer: usize,
    byte_offset_in_view: usize,
    alignment_corrected: bool,
    read: ReadFn,
    write: WriteFn,
    min: Vec<f64>,
    max: Vec<f64>,
    min_max_dirty: bool,
    taken_slots: usize,
    version: u64,
}

impl Accessor {
    /// # Errors
    ///
    /// * [Error::OutOfBoundsFootprint] if the addressed bytes extend past the end of `block`
    pub(crate) fn new(
        block: ByteBlock,
        mut placement: Placement,
        desc: AccessorDesc,
    ) -> Result<Self, Error> {
        let element_size = desc.element_size();
        let byte_stride = match placement.byte_stride {
            0 => element_size,
            s => s,
        };

        let mut alignment_corrected = false;
        let misalignment = placement.byte_offset_in_block % REALIGNED_COMPONENT_SIZE;
        if desc.component.size_in_bytes() >= REALIGNED_COMPONENT_SIZE && misalignment != 0 {
            let padding = REALIGNED_COMPONENT_SIZE - misalignment;
            tracing::warn!(
                byte_offset = placement.byte_offset_in_block,
                padding,
                component = %desc.component,
                "accessor realigned to an 8-byte boundary"
            );
            placement.byte_offset_in_block += padding;
            placement.byte_offset_in_buffer += padding;
            placement.byte_offset_in_view += padding;
            alignment_corrected = true;
        }

        let footprint = desc::footprint(byte_stride, desc.count, element_size);
        let block_length = block.len();
        if placement
            .byte_offset_in_block
            .checked_add(footprint)
            .map_or(true, |end| end > block_length)
        {
            return Err(Error::OutOfBoundsFootprint {
                byte_offset: placement.byte_offset_in_block,
                footprint,
                block_length,
            });
        }

        let min_max_dirty = desc.min.is_none() || desc.max.is_none();
        Ok(Self {
            block,
            composition: desc.composition,
            component: desc.component,
            count: desc.count,
            byte_stride,
            array_length: desc.array_length.max(1),
            normalized: desc.normalized,
            byte_offset_in_block: placement.byte_offset_in_block,
            byte_offset_in_buffer: placement.byte_offset_in_buffer,
            byte_offset_in_view: placement.byte_offset_in_view,
            alignment_corrected,
            read: desc.component.reader(),
            write: desc.component.writer(),
            min: desc.min.unwrap_or_default(),
            max: desc.max.unwrap_or_default(),
            min_max_dirty,
            taken_slots: 0,
            version: 0,
        })
    }

    #[inline]
    pub fn composition(&self) -> CompositionType {
        self.composition
    }

    #[inline]
    pub fn component(&self) -> ComponentType {
        self.component
    }

    /// Number of elements.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn byte_stride(&self) -> usize {
        self.byte_stride
    }

    #[inline]
    pub fn array_length(&self) -> usize {
        self.array_length
    }

    /// Whether integer components should be read as normalized values by the GPU.
    ///
    /// This is metadata only; getters always return raw component values.
    #[inline]
    pub fn normalized(&self) -> bool {
        self.normalized
    }

    #[inline]
    pub fn number_of_components(&self) -> usize {
        self.composition.number_of_components()
    }

    /// Components in one element, counting every entry of an array element.
    #[inline]
    pub fn element_component_count(&self) -> usize {
        self.number_of_components() * self.array_length
    }

    /// Natural size of one element in bytes.
    #[inline]
    pub fn element_size(&self) -> usize {
        self.composition.size_in_bytes(self.component) * self.array_length
    }

    /// `byte_stride * count`.
    #[inline]
    pub fn byte_length(&self) -> usize {
        self.byte_stride * self.count
    }

    /// Bytes actually addressed, from the first byte of element 0 to the last byte of the
    /// last element.
    #[inline]
    pub fn footprint(&self) -> usize {
        desc::footprint(self.byte_stride, self.count, self.element_size())
    }

    #[inline]
    pub fn byte_offset_in_block(&self) -> usize {
        self.byte_offset_in_block
    }

    #[inline]
    pub fn byte_offset_in_buffer(&self) -> usize {
        self.byte_offset_in_buffer
    }

    #[inline]
    pub fn byte_offset_in_view(&self) -> usize {
        self.byte_offset_in_view
    }

    /// Whether construction moved this accessor forward to an 8-byte boundary.
    #[inline]
    pub fn alignment_corrected(&self) -> bool {
        self.alignment_corrected
    }

    #[inline]
    pub fn is_aos(&self) -> bool {
        self.byte_stride != self.element_size()
    }

    #[inline]
    pub fn is_soa(&self) -> bool {
        !self.is_aos()
    }

    /// Incremented on every write through this accessor.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub fn block(&self) -> &ByteBlock {
        &self.block
    }

    /// Number of slots handed out by [take_one](Self::take_one).
    #[inline]
    pub fn taken_slots(&self) -> usize {
        self.taken_slots
    }

    /// Claim the next unclaimed element of this accessor as a one-element accessor.
    ///
    /// This lets one accessor back `count` independent per-instance values: each instance
    /// calls `take_one` once and keeps the returned window.
    ///
    /// # Errors
    ///
    /// * [Error::SlotOverflow] once all `count` slots have been claimed
    pub fn take_one(&mut self) -> Result<Accessor, Error> {
        if self.taken_slots >= self.count {
            return Err(Error::SlotOverflow { count: self.count });
        }
        let offset = self.byte_stride * self.taken_slots;
        self.taken_slots += 1;
        Ok(Accessor {
            block: self.block.clone(),
            composition: self.composition,
            component: self.component,
            count: 1,
            byte_stride: self.byte_stride,
            array_length: self.array_length,
            normalized: self.normalized,
            byte_offset_in_block: self.byte_offset_in_block + offset,
            byte_offset_in_buffer: self.byte_offset_in_buffer + offset,
            byte_offset_in_view: self.byte_offset_in_view + offset,
            alignment_corrected: false,
            read: self.read,
            write: self.write,
            min: Vec::new(),
            max: Vec::new(),
            min_max_dirty: true,
            taken_slots: 0,
            version: 0,
        })
    }

    /// Block address of element `i`, after index remapping.
    ///
    /// # Panics
    ///
    /// * if the (remapped) index is not less than `count`
    fn element_address(&self, i: usize, opts: AccessOptions<'_>) -> usize {
        let index = match opts.indices {
            Some(indices) => indices.get_scalar(i, AccessOptions::default()) as usize,
            None => i,
        };
        assert!(
            index < self.count,
            "element index {index} out of range for accessor of {} elements",
            self.count
        );
        self.byte_offset_in_block + self.byte_stride * index
    }

    /// # Panics
    ///
    /// * if `n` components starting `composition_offset` bytes into an element do not fit in
    ///   that element
    fn check_lanes(&self, composition_offset: usize, n: usize) {
        let size = self.component.size_in_bytes();
        assert!(
            composition_offset + n * size <= self.element_size(),
            "{n} components at byte {composition_offset} do not fit in an element of {} bytes",
            self.element_size()
        );
    }

    /// Read `n` components starting at `address`, passing each to `sink`.
    fn read_raw(&self, address: usize, n: usize, endian: Endian, mut sink: impl FnMut(usize, f64)) {
        let bytes = self.block.bytes();
        let size = self.component.size_in_bytes();
        for k in 0..n {
            let at = address + k * size;
            sink(k, (self.read)(&bytes[at..at + size], endian));
        }
    }

    /// Write `n` components starting at `address`, taking each from `source`.
    fn write_raw(&mut self, address: usize, n: usize, endian: Endian, source: impl Fn(usize) -> f64) {
        {
            let mut bytes = self.block.bytes_mut();
            let size = self.component.size_in_bytes();
            for k in 0..n {
                let at = address + k * size;
                (self.write)(&mut bytes[at..at + size], source(k), endian);
            }
        }
        self.mark_written();
    }

    /// Invalidate bounds and bump the version after bytes were written.
    fn mark_written(&mut self) {
        self.min_max_dirty = true;
        self.version += 1;
    }

    /// Read element `i` into `out`.
    ///
    /// Reads `V::COMPONENTS` components; `V` may be narrower than the element, never wider.
    ///
    /// # Panics
    ///
    /// * if the (remapped) index is not less than `count`
    /// * if `V` holds more components than one element
    pub fn get_into<V: FlatValue>(&self, i: usize, out: &mut V, opts: AccessOptions<'_>) {
        self.check_lanes(0, V::COMPONENTS);
        let address = self.element_address(i, opts);
        self.read_raw(address, V::COMPONENTS, opts.endian, |k, v| {
            out.set_component(k, v)
        });
    }

    /// [get_into](Self::get_into), `composition_offset` bytes into element `i`.
    pub fn get_into_at<V: FlatValue>(
        &self,
        i: usize,
        composition_offset: usize,
        out: &mut V,
        opts: AccessOptions<'_>,
    ) {
        self.check_lanes(composition_offset, V::COMPONENTS);
        let address = self.element_address(i, opts) + composition_offset;
        self.read_raw(address, V::COMPONENTS, opts.endian, |k, v| {
            out.set_component(k, v)
        });
    }

    #[inline]
    pub fn get<V: FlatValue>(&self, i: usize, opts: AccessOptions<'_>) -> V {
        let mut res = V::zeroed();
        self.get_into(i, &mut res, opts);
        res
    }

    #[inline]
    pub fn get_at<V: FlatValue>(
        &self,
        i: usize,
        composition_offset: usize,
        opts: AccessOptions<'_>,
    ) -> V {
        let mut res = V::zeroed();
        self.get_into_at(i, composition_offset, &mut res, opts);
        res
    }

    /// Write `value` to element `i`.
    ///
    /// # Panics
    ///
    /// * if the (remapped) index is not less than `count`
    /// * if `V` holds more components than one element
    pub fn set<V: FlatValue>(&mut self, i: usize, value: &V, opts: AccessOptions<'_>) {
        self.check_lanes(0, V::COMPONENTS);
        let address = self.element_address(i, opts);
        self.write_raw(address, V::COMPONENTS, opts.endian, |k| value.component(k));
    }

    /// [set](Self::set), `composition_offset` bytes into element `i`.
    pub fn set_at<V: FlatValue>(
        &mut self,
        i: usize,
        composition_offset: usize,
        value: &V,
        opts: AccessOptions<'_>,
    ) {
        self.check_lanes(composition_offset, V::COMPONENTS);
        let address = self.element_address(i, opts) + composition_offset;
        self.write_raw(address, V::COMPONENTS, opts.endian, |k| value.component(k));
    }

    /// Every component of element `i`, as plain numbers.
    pub fn get_element(&self, i: usize, opts: AccessOptions<'_>) -> Vec<f64> {
        let mut res = vec![0.0; self.element_component_count()];
        self.get_element_into(i, &mut res, opts);
        res
    }

    /// Read the first `out.len()` components of element `i` into `out`.
    ///
    /// # Panics
    ///
    /// * if the (remapped) index is not less than `count`
    /// * if `out` is longer than one element
    pub fn get_element_into(&self, i: usize, out: &mut [f64], opts: AccessOptions<'_>) {
        self.check_lanes(0, out.len());
        let address = self.element_address(i, opts);
        self.read_raw(address, out.len(), opts.endian, |k, v| out[k] = v);
    }

    /// Write `values` to the leading components of element `i`.
    ///
    /// # Panics
    ///
    /// * if the (remapped) index is not less than `count`
    /// * if `values` holds more components than one element
    pub fn set_element(&mut self, i: usize, values: &[f64], opts: AccessOptions<'_>) {
        self.check_lanes(0, values.len());
        let address = self.element_address(i, opts);
        self.write_raw(address, values.len(), opts.endian, |k| values[k]);
    }

    #[inline]
    pub fn get_scalar(&self, i: usize, opts: AccessOptions<'_>) -> f64 {
        self.get::<f64>(i, opts)
    }

    #[inline]
    pub fn get_scalar_at(&self, i: usize, composition_offset: usize, opts: AccessOptions<'_>) -> f64 {
        self.get_at::<f64>(i, composition_offset, opts)
    }

    #[inline]
    pub fn get_vec2(&self, i: usize, opts: AccessOptions<'_>) -> Vector2<f64> {
        self.get(i, opts)
    }

    #[inline]
    pub fn get_vec3(&self, i: usize, opts: AccessOptions<'_>) -> Vector3<f64> {
        self.get(i, opts)
    }

    #[inline]
    pub fn get_vec4(&self, i: usize, opts: AccessOptions<'_>) -> Vector4<f64> {
        self.get(i, opts)
    }

    #[inline]
    pub fn get_mat2(&self, i: usize, opts: AccessOptions<'_>) -> Matrix2<f64> {
        self.get(i, opts)
    }

    #[inline]
    pub fn get_mat3(&self, i: usize, opts: AccessOptions<'_>) -> Matrix3<f64> {
        self.get(i, opts)
    }

    #[inline]
    pub fn get_mat4(&self, i: usize, opts: AccessOptions<'_>) -> Matrix4<f64> {
        self.get(i, opts)
    }

    #[inline]
    pub fn set_scalar(&mut self, i: usize, value: f64, opts: AccessOptions<'_>) {
        self.set(i, &value, opts)
    }

    #[inline]
    pub fn set_scalar_at(
        &mut self,
        i: usize,
        composition_offset: usize,
        value: f64,
        opts: AccessOptions<'_>,
    ) {
        self.set_at(i, composition_offset, &value, opts)
    }

    #[inline]
    pub fn set_vec2(&mut self, i: usize, x: f64, y: f64, opts: AccessOptions<'_>) {
        self.set(i, &[x, y], opts)
    }

    #[inline]
    pub fn set_vec3(&mut self, i: usize, x: f64, y: f64, z: f64, opts: AccessOptions<'_>) {
        self.set(i, &[x, y, z], opts)
    }

    #[inline]
    pub fn set_vec4(&mut self, i: usize, x: f64, y: f64, z: f64, w: f64, opts: AccessOptions<'_>) {
        self.set(i, &[x, y, z, w], opts)
    }

    #[inline]
    pub fn set_mat2(&mut self, i: usize, value: &Matrix2<f64>, opts: AccessOptions<'_>) {
        self.set(i, value, opts)
    }

    #[inline]
    pub fn set_mat3(&mut self, i: usize, value: &Matrix3<f64>, opts: AccessOptions<'_>) {
        self.set(i, value, opts)
    }

    #[inline]
    pub fn set_mat4(&mut self, i: usize, value: &Matrix4<f64>, opts: AccessOptions<'_>) {
        self.set(i, value, opts)
    }
}
