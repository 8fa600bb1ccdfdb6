//! Load every glTF buffer into a `tessera` arena and carve its views and accessors from it.

use std::path::Path;

use gltf::{accessor::Dimensions, Gltf};
use tessera::{
    Accessor, AccessorDesc, Buffer, BufferTarget, BufferView, ByteBlock, ComponentType,
    CompositionType,
};

use crate::source::{BufferSources, SourceError};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Gltf(#[from] gltf::Error),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Arena(#[from] tessera::Error),
    #[error("buffer {index} declares {expected} bytes, but its source only holds {actual}")]
    ShortBuffer {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

/// A glTF accessor loaded into an arena, together with the bounds its document declares.
#[derive(Debug)]
pub struct LoadedAccessor {
    pub index: usize,
    pub name: Option<String>,
    pub accessor: Accessor,
    pub declared_min: Option<Vec<f64>>,
    pub declared_max: Option<Vec<f64>>,
}

impl LoadedAccessor {
    /// Whether declared bounds (if any) match the data, within single-precision tolerance.
    ///
    /// Computes the data's bounds if they are stale.
    pub fn bounds_match(&mut self) -> bool {
        self.accessor.calc_min_max();
        let matches = |declared: &Option<Vec<f64>>, computed: &[f64]| match declared {
            None => true,
            Some(declared) => {
                declared.len() == computed.len()
                    && declared
                        .iter()
                        .zip(computed)
                        .all(|(d, c)| (d - c).abs() <= f32::EPSILON as f64 * d.abs().max(1.0))
            }
        };
        matches(&self.declared_min, self.accessor.min())
            && matches(&self.declared_max, self.accessor.max())
    }
}

#[derive(Debug)]
pub struct LoadedDocument {
    pub buffers: Vec<Buffer>,
    pub views: Vec<BufferView>,
    pub accessors: Vec<LoadedAccessor>,
}

#[tracing::instrument(skip(byte_align))]
pub fn load_document(path: &Path, byte_align: usize) -> Result<LoadedDocument, LoadError> {
    let doc = Gltf::open(path)?;
    let sources = BufferSources::new(&doc, path)?;

    let mut buffers = Vec::with_capacity(doc.buffers().len());
    for gbuf in doc.buffers() {
        let data = sources.load(&gbuf)?;
        if data.len() < gbuf.length() {
            return Err(LoadError::ShortBuffer {
                index: gbuf.index(),
                expected: gbuf.length(),
                actual: data.len(),
            });
        }
        let name = gbuf
            .name()
            .map_or_else(|| format!("buffer{}", gbuf.index()), str::to_owned);
        let block = ByteBlock::from(&data[..gbuf.length()]);
        buffers.push(Buffer::new(gbuf.length(), block, name, byte_align)?);
    }

    let mut views = Vec::with_capacity(doc.views().len());
    for gview in doc.views() {
        let buffer = &mut buffers[gview.buffer().index()];
        let mut view = buffer.take_buffer_view_with_byte_offset(
            gview.length(),
            gview.stride().unwrap_or(0),
            gview.offset(),
        )?;
        view.set_target(gview.target().map(|t| match t {
            gltf::buffer::Target::ArrayBuffer => BufferTarget::Array,
            gltf::buffer::Target::ElementArrayBuffer => BufferTarget::ElementArray,
        }));
        views.push(view);
    }

    let mut accessors = Vec::with_capacity(doc.accessors().len());
    for gacc in doc.accessors() {
        let Some(gview) = gacc.view() else {
            tracing::warn!(
                index = gacc.index(),
                "skipping accessor without a buffer view"
            );
            continue;
        };
        let desc = AccessorDesc::new(
            composition(gacc.dimensions()),
            ComponentType::from_gl(gacc.data_type().as_gl_enum()).map_err(tessera::Error::from)?,
            gacc.count(),
        )
        .normalized(gacc.normalized());
        let accessor = views[gview.index()].take_accessor_with_byte_offset(desc, gacc.offset())?;
        tracing::trace!(
            index = gacc.index(),
            composition = %accessor.composition(),
            component = %accessor.component(),
            count = accessor.count(),
            byte_offset = accessor.byte_offset_in_buffer(),
            byte_stride = accessor.byte_stride(),
            "loaded accessor"
        );
        accessors.push(LoadedAccessor {
            index: gacc.index(),
            name: gacc.name().map(str::to_owned),
            accessor,
            declared_min: gacc.min().as_ref().and_then(json_numbers),
            declared_max: gacc.max().as_ref().and_then(json_numbers),
        });
    }

    Ok(LoadedDocument {
        buffers,
        views,
        accessors,
    })
}

fn composition(dims: Dimensions) -> CompositionType {
    match dims {
        Dimensions::Scalar => CompositionType::Scalar,
        Dimensions::Vec2 => CompositionType::Vec2,
        Dimensions::Vec3 => CompositionType::Vec3,
        Dimensions::Vec4 => CompositionType::Vec4,
        Dimensions::Mat2 => CompositionType::Mat2,
        Dimensions::Mat3 => CompositionType::Mat3,
        Dimensions::Mat4 => CompositionType::Mat4,
    }
}

fn json_numbers(value: &gltf::json::Value) -> Option<Vec<f64>> {
    value
        .as_array()?
        .iter()
        .map(gltf::json::Value::as_f64)
        .collect()
}
