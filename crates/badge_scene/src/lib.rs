//! Badge Scene Model
//!
//! What the viewer knows about a loaded badge asset:
//!
//! - **Colors**: RGB with HSL conversion
//! - **Materials**: a closed set of variants (flat, textured) with a visitor
//! - **Scene graph**: named nodes, meshes, shadow flags
//! - **Post-processing**: the one-time saturation pass run after loading
//! - **Assets**: the [`AssetSource`] trait, in-memory and empty sources, a
//!   glTF source behind the `gltf` feature, and the caching [`AssetLibrary`]

pub mod asset;
pub mod color;
#[cfg(feature = "gltf")]
pub mod gltf_loader;
pub mod material;
pub mod postprocess;
pub mod scene;

pub use asset::{AssetError, AssetLibrary, AssetSource, EmptySource, MemorySource};
pub use color::{Color, Hsl};
#[cfg(feature = "gltf")]
pub use gltf_loader::GltfSource;
pub use material::{FlatMaterial, Material, MaterialVisitor, TextureRef, TexturedMaterial};
pub use postprocess::{PostProcess, PostProcessStats, SaturationBoost};
pub use scene::{Mesh, SceneGraph, SceneNode, SceneVisitor};
