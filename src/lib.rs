//! vkbindgen - A Vulkan registry to Python ctypes binding generator
//!
//! This crate provides the core library functionality for vkbindgen:
//! spec parsing, type translation, dispatch grouping, and module emission.

pub mod dispatch;
pub mod emit;
pub mod ops;
pub mod registry;
pub mod sources;
pub mod translate;
pub mod util;

pub use registry::ApiRegistry;
pub use sources::SpecSource;
pub use translate::{ForeignType, TypeToken};
pub use util::{GenerateConfig, SpecFormat};
