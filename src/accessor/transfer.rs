//! Bulk and cross-accessor data movement.

use super::{AccessOptions, Accessor};
use crate::error::Error;

impl Accessor {
    /// Copy the bytes addressed by `other` over the start of the bytes addressed by `self`.
    ///
    /// The copy is raw: strides and component types are not reconciled, so this is meant for
    /// accessors of identical layout (or for blitting packed data into place).
    ///
    /// # Errors
    ///
    /// * [Error::FootprintMismatch] if `other` addresses more bytes than `self`
    pub fn copy_buffer(&mut self, other: &Accessor) -> Result<(), Error> {
        let copied = other.footprint();
        let available = self.footprint();
        if copied > available {
            return Err(Error::FootprintMismatch { copied, available });
        }
        let src = other.byte_offset_in_block;
        let dst = self.byte_offset_in_block;
        if self.block.ptr_eq(&other.block) {
            self.block
                .bytes_mut()
                .copy_within(src..src + copied, dst);
        } else {
            let from = other.block.range(src, copied);
            self.block.bytes_mut()[dst..dst + copied].copy_from_slice(&from);
        }
        self.mark_written();
        Ok(())
    }

    /// Overwrite element `i` with element `other_i` of `other`.
    ///
    /// # Errors
    ///
    /// * [Error::CompositionMismatch] if the two accessors hold different compositions
    /// * [Error::ElementWidthMismatch] if their elements hold different numbers of components
    pub fn set_element_from(
        &mut self,
        i: usize,
        other: &Accessor,
        other_i: usize,
    ) -> Result<(), Error> {
        self.check_composition(other)?;
        let values = other.get_element(other_i, AccessOptions::default());
        self.set_element(i, &values, AccessOptions::default());
        Ok(())
    }

    /// Add `coeff` times element `other_i` of `other` to element `i`.
    ///
    /// # Errors
    ///
    /// * [Error::CompositionMismatch] if the two accessors hold different compositions
    /// * [Error::ElementWidthMismatch] if their elements hold different numbers of components
    pub fn add_element_from(
        &mut self,
        i: usize,
        other: &Accessor,
        coeff: f64,
        other_i: usize,
    ) -> Result<(), Error> {
        self.check_composition(other)?;
        let addend = other.get_element(other_i, AccessOptions::default());
        let mut values = self.get_element(i, AccessOptions::default());
        for (v, a) in values.iter_mut().zip(addend) {
            *v += coeff * a;
        }
        self.set_element(i, &values, AccessOptions::default());
        Ok(())
    }

    /// Fill elements in order from a flat list of components.
    ///
    /// Components past `count` elements are ignored; a short list leaves the remaining
    /// elements (or the tail of a partial element) untouched.
    pub fn copy_from_components(&mut self, values: &[f64]) {
        let width = self.element_component_count();
        if width == 0 {
            return;
        }
        for (i, chunk) in values.chunks(width).take(self.count).enumerate() {
            self.set_element(i, chunk, AccessOptions::default());
        }
    }

    /// Every component of every element, in element order.
    pub fn to_components(&self) -> Vec<f64> {
        let width = self.element_component_count();
        let mut res = vec![0.0; width * self.count];
        for (i, chunk) in res.chunks_mut(width.max(1)).enumerate().take(self.count) {
            self.get_element_into(i, chunk, AccessOptions::default());
        }
        res
    }

    fn check_composition(&self, other: &Accessor) -> Result<(), Error> {
        if self.composition != other.composition {
            return Err(Error::CompositionMismatch {
                expected: self.composition,
                actual: other.composition,
            });
        }
        // array_length may still differ
        if self.element_component_count() != other.element_component_count() {
            return Err(Error::ElementWidthMismatch {
                expected: self.element_component_count(),
                actual: other.element_component_count(),
            });
        }
        Ok(())
    }
}
