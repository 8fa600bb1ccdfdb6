//! Construction parameters for [Accessors](super::Accessor).

use tessera_common::{ComponentType, CompositionType, Endian};

use super::Accessor;

/// Everything needed to take an accessor from a [BufferView](crate::BufferView).
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorDesc {
    pub composition: CompositionType,
    pub component: ComponentType,
    pub count: usize,
    /// 0 defers to the view's default stride, then to the natural element size.
    pub byte_stride: usize,
    /// Number of compositions per element (for uniform arrays); at least 1.
    pub array_length: usize,
    pub normalized: bool,
    pub min: Option<Vec<f64>>,
    pub max: Option<Vec<f64>>,
}

impl AccessorDesc {
    pub fn new(composition: CompositionType, component: ComponentType, count: usize) -> Self {
        Self {
            composition,
            component,
            count,
            byte_stride: 0,
            array_length: 1,
            normalized: false,
            min: None,
            max: None,
        }
    }

    #[must_use]
    pub fn byte_stride(mut self, byte_stride: usize) -> Self {
        self.byte_stride = byte_stride;
        self
    }

    #[must_use]
    pub fn array_length(mut self, array_length: usize) -> Self {
        self.array_length = array_length.max(1);
        self
    }

    #[must_use]
    pub fn normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    #[must_use]
    pub fn min(mut self, min: impl Into<Vec<f64>>) -> Self {
        self.min = Some(min.into());
        self
    }

    #[must_use]
    pub fn max(mut self, max: impl Into<Vec<f64>>) -> Self {
        self.max = Some(max.into());
        self
    }

    /// Natural size of one element: `components * component size * array_length`.
    #[inline]
    pub fn element_size(&self) -> usize {
        self.composition.size_in_bytes(self.component) * self.array_length.max(1)
    }

    /// Bytes actually addressed by `count` elements at `byte_stride`.
    pub fn footprint(&self, byte_stride: usize) -> usize {
        footprint(byte_stride, self.count, self.element_size())
    }
}

pub(crate) fn footprint(byte_stride: usize, count: usize, element_size: usize) -> usize {
    match count {
        0 => 0,
        n => byte_stride
            .saturating_mul(n - 1)
            .saturating_add(element_size),
    }
}

/// Per-call options shared by every accessor getter and setter.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessOptions<'idx> {
    /// If present, element `i` is first remapped through `indices.get_scalar(i)`.
    pub indices: Option<&'idx Accessor>,
    pub endian: Endian,
}

impl<'idx> AccessOptions<'idx> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn indexed(mut self, indices: &'idx Accessor) -> Self {
        self.indices = Some(indices);
        self
    }

    #[inline]
    #[must_use]
    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    #[inline]
    #[must_use]
    pub fn big_endian(self) -> Self {
        self.endian(Endian::Big)
    }
}
