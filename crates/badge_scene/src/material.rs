//! Surface materials
//!
//! Loaded assets carry one of a closed set of material variants. Code that
//! needs to treat variants differently implements [`MaterialVisitor`] instead
//! of probing material fields at runtime.

use crate::color::Color;

/// Reference to a texture owned by the loaded asset
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextureRef {
    /// Index of the texture within its asset
    pub index: usize,
    pub name: Option<String>,
}

/// A material whose surface color is a single flat color
#[derive(Clone, Debug, PartialEq)]
pub struct FlatMaterial {
    pub name: Option<String>,
    pub color: Color,
}

/// A material whose color tints a texture map
#[derive(Clone, Debug, PartialEq)]
pub struct TexturedMaterial {
    pub name: Option<String>,
    pub color: Color,
    pub texture: TextureRef,
}

/// Material variants found on badge meshes
#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    Flat(FlatMaterial),
    Textured(TexturedMaterial),
}

impl Material {
    pub fn flat(color: Color) -> Self {
        Material::Flat(FlatMaterial { name: None, color })
    }

    pub fn textured(color: Color, texture: TextureRef) -> Self {
        Material::Textured(TexturedMaterial {
            name: None,
            color,
            texture,
        })
    }

    pub fn color(&self) -> Color {
        match self {
            Material::Flat(m) => m.color,
            Material::Textured(m) => m.color,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Material::Flat(m) => m.name.as_deref(),
            Material::Textured(m) => m.name.as_deref(),
        }
    }

    pub fn is_textured(&self) -> bool {
        matches!(self, Material::Textured(_))
    }

    /// Dispatch to the visitor method for this variant
    pub fn accept<V: MaterialVisitor + ?Sized>(&mut self, visitor: &mut V) {
        match self {
            Material::Flat(m) => visitor.visit_flat(m),
            Material::Textured(m) => visitor.visit_textured(m),
        }
    }
}

/// Per-variant operation over materials
pub trait MaterialVisitor {
    fn visit_flat(&mut self, _material: &mut FlatMaterial) {}

    fn visit_textured(&mut self, _material: &mut TexturedMaterial) {}
}
