//! Scene graph of a loaded badge asset
//!
//! Only the structure the viewer touches is modeled: named nodes, their
//! children, and the shadow flags and materials of mesh nodes. Geometry stays
//! with the renderer that loaded the asset.

use smallvec::SmallVec;

use crate::material::{Material, MaterialVisitor};

/// Renderable part of a node
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// One material per primitive
    pub materials: SmallVec<[Material; 1]>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(materials: impl IntoIterator<Item = Material>) -> Self {
        Self {
            materials: materials.into_iter().collect(),
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    /// Apply a material visitor to every material of this mesh
    pub fn visit_materials<V: MaterialVisitor + ?Sized>(&mut self, visitor: &mut V) {
        for material in self.materials.iter_mut() {
            material.accept(visitor);
        }
    }
}

/// A node in the scene graph
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneNode {
    pub name: Option<String>,
    pub mesh: Option<Mesh>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// A node without a mesh
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// A node carrying a mesh
    pub fn with_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: Some(name.into()),
            mesh: Some(mesh),
            children: Vec::new(),
        }
    }

    pub fn child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    fn walk_mut<V: SceneVisitor + ?Sized>(&mut self, visitor: &mut V) {
        if let Some(mesh) = self.mesh.as_mut() {
            visitor.visit_mesh(self.name.as_deref(), mesh);
        }
        for child in self.children.iter_mut() {
            child.walk_mut(visitor);
        }
    }

    fn walk<'a>(&'a self, out: &mut Vec<&'a Mesh>) {
        if let Some(mesh) = self.mesh.as_ref() {
            out.push(mesh);
        }
        for child in &self.children {
            child.walk(out);
        }
    }
}

/// Operation applied to each mesh during traversal
pub trait SceneVisitor {
    fn visit_mesh(&mut self, node_name: Option<&str>, mesh: &mut Mesh);
}

/// The loaded scene of one badge asset
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneGraph {
    roots: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new(roots: Vec<SceneNode>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[SceneNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Visit every mesh depth-first, parents before children
    pub fn traverse_mut<V: SceneVisitor + ?Sized>(&mut self, visitor: &mut V) {
        for root in self.roots.iter_mut() {
            root.walk_mut(visitor);
        }
    }

    /// Every mesh in traversal order
    pub fn meshes(&self) -> Vec<&Mesh> {
        let mut out = Vec::new();
        for root in &self.roots {
            root.walk(&mut out);
        }
        out
    }
}
