//! glTF / GLB asset source
//!
//! Reads node hierarchy and per-primitive materials. Base color factors are
//! stored linear in glTF; they are encoded to sRGB so HSL adjustments operate
//! on display values.

use std::path::{Path, PathBuf};

use smallvec::SmallVec;

use crate::asset::{AssetError, AssetSource, Result};
use crate::color::Color;
use crate::material::{FlatMaterial, Material, TextureRef, TexturedMaterial};
use crate::scene::{Mesh, SceneGraph, SceneNode};

/// Loads `.glb` / `.gltf` files relative to an asset root directory
#[derive(Clone, Debug)]
pub struct GltfSource {
    root: PathBuf,
}

impl GltfSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Asset paths are URL-like (`/badge-food.glb`); resolve under the root
    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl AssetSource for GltfSource {
    fn load(&self, path: &str) -> Result<SceneGraph> {
        let file = self.resolve(path);
        if !file.exists() {
            return Err(AssetError::NotFound(file.display().to_string()));
        }
        let gltf = gltf::Gltf::open(&file).map_err(|e| parse_error(&file, e))?;

        let scene = gltf
            .document
            .default_scene()
            .or_else(|| gltf.document.scenes().next());
        let roots = match scene {
            Some(scene) => scene.nodes().map(|node| convert_node(&node)).collect(),
            None => Vec::new(),
        };
        Ok(SceneGraph::new(roots))
    }
}

fn parse_error(file: &Path, err: gltf::Error) -> AssetError {
    match err {
        gltf::Error::Io(io) => AssetError::Io(io),
        other => AssetError::Parse {
            path: file.display().to_string(),
            message: other.to_string(),
        },
    }
}

fn convert_node(node: &gltf::Node<'_>) -> SceneNode {
    let mesh = node.mesh().map(|mesh| {
        let materials: SmallVec<[Material; 1]> = mesh
            .primitives()
            .map(|primitive| convert_material(&primitive.material()))
            .collect();
        Mesh {
            materials,
            cast_shadow: false,
            receive_shadow: false,
        }
    });

    SceneNode {
        name: node.name().map(str::to_string),
        mesh,
        children: node.children().map(|child| convert_node(&child)).collect(),
    }
}

fn convert_material(material: &gltf::Material<'_>) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, a] = pbr.base_color_factor();
    let color = Color::new(linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b), a);
    let name = material.name().map(str::to_string);

    match pbr.base_color_texture() {
        Some(info) => {
            let texture = info.texture();
            Material::Textured(TexturedMaterial {
                name,
                color,
                texture: TextureRef {
                    index: texture.index(),
                    name: texture.name().map(str::to_string),
                },
            })
        }
        None => Material::Flat(FlatMaterial { name, color }),
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}
