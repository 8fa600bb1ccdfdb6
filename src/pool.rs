//! Session-wide arenas, one per intended use.

use crate::buffer::Buffer;

/// What the bytes of a pooled [Buffer] are for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUse {
    GpuInstanceData,
    GpuVertexData,
    UboGeneric,
    CpuGeneric,
}

impl BufferUse {
    pub const ALL: [Self; 4] = [
        Self::GpuInstanceData,
        Self::GpuVertexData,
        Self::UboGeneric,
        Self::CpuGeneric,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::GpuInstanceData => "gpu_instance_data",
            Self::GpuVertexData => "gpu_vertex_data",
            Self::UboGeneric => "ubo_generic",
            Self::CpuGeneric => "cpu_generic",
        }
    }
}

/// Sizes of the pooled arenas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Byte length of each pool, indexed like [BufferUse::ALL].
    pub byte_lengths: [usize; 4],
    /// Alignment shared by every pool.
    pub byte_align: usize,
}

impl PoolConfig {
    /// Default size of every pool: 16MiB.
    pub const DEFAULT_BYTE_LENGTH: usize = 16 * 1024 * 1024;

    /// Default alignment; large enough for any component type.
    pub const DEFAULT_BYTE_ALIGN: usize = 8;

    #[must_use]
    pub fn with_byte_length(mut self, usage: BufferUse, byte_length: usize) -> Self {
        self.byte_lengths[usage.index()] = byte_length;
        self
    }

    #[must_use]
    pub fn with_byte_align(mut self, byte_align: usize) -> Self {
        self.byte_align = byte_align.max(1);
        self
    }

    #[inline]
    pub fn byte_length(&self, usage: BufferUse) -> usize {
        self.byte_lengths[usage.index()]
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            byte_lengths: [Self::DEFAULT_BYTE_LENGTH; 4],
            byte_align: Self::DEFAULT_BYTE_ALIGN,
        }
    }
}

/// One lazily allocated [Buffer] per [BufferUse], living for the whole session.
#[derive(Debug, Default)]
pub struct MemoryPools {
    config: PoolConfig,
    buffers: [Option<Buffer>; 4],
}

impl MemoryPools {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            buffers: Default::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// The pool for `usage`, allocating it on first use.
    pub fn buffer(&mut self, usage: BufferUse) -> &mut Buffer {
        let config = &self.config;
        self.buffers[usage.index()].get_or_insert_with(|| {
            let byte_length = config.byte_length(usage);
            tracing::debug!(pool = usage.name(), byte_length, "allocating memory pool");
            Buffer::allocate(byte_length, usage.name(), config.byte_align)
        })
    }

    /// The pool for `usage`, if it has been allocated.
    #[inline]
    pub fn get(&self, usage: BufferUse) -> Option<&Buffer> {
        self.buffers[usage.index()].as_ref()
    }
}

#[cfg(test)]
mod tests {
    use tessera_common::{ComponentType, CompositionType};

    use super::*;
    use crate::AccessorDesc;

    #[test]
    fn pools_are_lazy_and_persistent() {
        let config = PoolConfig::default()
            .with_byte_length(BufferUse::UboGeneric, 256)
            .with_byte_align(16);
        let mut pools = MemoryPools::new(config);
        assert!(pools.get(BufferUse::UboGeneric).is_none());

        let ubo = pools.buffer(BufferUse::UboGeneric);
        assert_eq!(ubo.byte_length(), 256);
        assert_eq!(ubo.byte_align(), 16);
        assert_eq!(ubo.name(), "ubo_generic");
        let mut view = ubo.take_buffer_view(64, 0).unwrap();
        view.take_accessor(AccessorDesc::new(
            CompositionType::Mat4,
            ComponentType::Float,
            1,
        ))
        .unwrap();

        assert_eq!(pools.buffer(BufferUse::UboGeneric).taken_bytes(), 64);
        assert_eq!(pools.get(BufferUse::UboGeneric).unwrap().taken_bytes(), 64);
        assert!(pools.get(BufferUse::CpuGeneric).is_none());
    }

    #[test]
    fn default_sizes() {
        let config = PoolConfig::default();
        for usage in BufferUse::ALL {
            assert_eq!(config.byte_length(usage), PoolConfig::DEFAULT_BYTE_LENGTH);
        }
        assert_eq!(config.byte_align, 8);
    }
}
