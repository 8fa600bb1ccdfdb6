//! Helper macros shared across the workspace.

mod meta;
