//! Arena-allocated byte buffers, buffer views, and typed accessors.
//!
//! A [Buffer] owns (a window of) one shared [ByteBlock] and hands out [BufferViews](BufferView)
//! by bumping a pointer. Each view hands out [Accessors](Accessor) the same way. Accessors
//! read and write typed elements (scalars, vectors, matrices) at any component width and either
//! endianness, with optional index indirection. Nothing is ever freed: an arena lives as long
//! as the longest-lived window into it.
//!
//! ```
//! use tessera::{AccessOptions, AccessorDesc, Buffer, ComponentType, CompositionType};
//!
//! let mut buffer = Buffer::allocate(64, "example", 4);
//! let mut view = buffer.take_buffer_view(64, 0)?;
//! let mut positions = view.take_accessor(AccessorDesc::new(
//!     CompositionType::Vec3,
//!     ComponentType::Float,
//!     2,
//! ))?;
//! positions.set_vec3(1, 1.0, 2.0, 3.0, AccessOptions::new());
//! assert_eq!(positions.get_vec3(1, AccessOptions::new()).z, 3.0);
//! # Ok::<(), tessera::Error>(())
//! ```
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

mod accessor;
mod block;
mod buffer;
mod buffer_view;
pub mod error;
pub mod pool;
mod value;

pub use accessor::{AccessOptions, Accessor, AccessorDesc};
pub use block::ByteBlock;
pub use buffer::{Buffer, WORD_SIZE};
pub use buffer_view::{AccessorLayout, BufferTarget, BufferView};
pub use error::Error;
pub use pool::{BufferUse, MemoryPools, PoolConfig};
pub use value::FlatValue;

pub use tessera_common::{
    ComponentType, ComponentValue, CompositionType, Endian, ReadFn, TypeError, WriteFn,
};
