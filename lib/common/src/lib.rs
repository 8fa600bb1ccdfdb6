//! Component and composition metadata shared by `tessera` buffers and accessors.
//!
//! A [CompositionType] says how many components make up one element (`VEC3` = 3), and a
//! [ComponentType] says how each component is stored (`FLOAT` = 4-byte IEEE float). Together
//! they determine the natural size of an element and which read/write functions an accessor
//! uses to move numbers in and out of raw bytes.

pub mod macros;

mod component;
mod composition;

pub use component::*;
pub use composition::*;

/// Errors produced while decoding type metadata from external representations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("unknown component type code: {0}")]
    UnknownComponentType(u32),
    #[error("unknown composition type: {0:?}")]
    UnknownCompositionType(String),
}
