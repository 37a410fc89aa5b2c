//! One-time color pass applied to freshly loaded badge assets
//!
//! Badge models look washed out under the viewer's bright lighting, so every
//! material color gets a saturation boost. Textured materials get a second,
//! stronger boost and are darkened so the texture reads through the tint.
//! Every mesh is also flagged to cast and receive shadows.

use crate::color::Color;
use crate::material::{FlatMaterial, MaterialVisitor, TexturedMaterial};
use crate::scene::{Mesh, SceneGraph, SceneVisitor};

/// Saturation and lightness adjustment per material variant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaturationBoost {
    /// Saturation multiplier applied to every material color
    pub base_factor: f32,
    /// Additional saturation multiplier for textured materials
    pub textured_factor: f32,
    /// Lightness multiplier for textured materials
    pub textured_lightness: f32,
    /// Lightness never drops below this for textured materials
    pub min_lightness: f32,
    pub max_saturation: f32,
}

impl Default for SaturationBoost {
    fn default() -> Self {
        Self {
            base_factor: 1.3,
            textured_factor: 1.8,
            textured_lightness: 0.8,
            min_lightness: 0.1,
            max_saturation: 1.0,
        }
    }
}

impl SaturationBoost {
    fn boost_base(&self, color: &mut Color) {
        let mut hsl = color.to_hsl();
        hsl.s = (hsl.s * self.base_factor).min(self.max_saturation);
        color.set_hsl(hsl);
    }
}

impl MaterialVisitor for SaturationBoost {
    fn visit_flat(&mut self, material: &mut FlatMaterial) {
        self.boost_base(&mut material.color);
    }

    fn visit_textured(&mut self, material: &mut TexturedMaterial) {
        self.boost_base(&mut material.color);

        let mut hsl = material.color.to_hsl();
        hsl.s = (hsl.s * self.textured_factor).min(self.max_saturation);
        hsl.l = (hsl.l * self.textured_lightness).max(self.min_lightness);
        material.color.set_hsl(hsl);
    }
}

/// Counts of what a post-processing run touched
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PostProcessStats {
    pub meshes: usize,
    pub flat_materials: usize,
    pub textured_materials: usize,
}

/// Scene pass: shadow flags plus [`SaturationBoost`] on every material
#[derive(Debug, Default)]
pub struct PostProcess {
    boost: SaturationBoost,
    stats: PostProcessStats,
}

impl PostProcess {
    pub fn new(boost: SaturationBoost) -> Self {
        Self {
            boost,
            stats: PostProcessStats::default(),
        }
    }

    /// Run the pass over a scene and report what it touched
    pub fn run(mut self, scene: &mut SceneGraph) -> PostProcessStats {
        scene.traverse_mut(&mut self);
        tracing::debug!(
            meshes = self.stats.meshes,
            flat = self.stats.flat_materials,
            textured = self.stats.textured_materials,
            "post-processed badge scene"
        );
        self.stats
    }
}

impl SceneVisitor for PostProcess {
    fn visit_mesh(&mut self, _node_name: Option<&str>, mesh: &mut Mesh) {
        mesh.cast_shadow = true;
        mesh.receive_shadow = true;
        mesh.visit_materials(&mut self.boost);

        self.stats.meshes += 1;
        for material in &mesh.materials {
            if material.is_textured() {
                self.stats.textured_materials += 1;
            } else {
                self.stats.flat_materials += 1;
            }
        }
    }
}
