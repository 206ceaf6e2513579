//! Typed scene-node tree for loaded 3D assets
//!
//! A GLTF-class loader hands over a tree of nodes; only mesh nodes carry
//! geometry payloads that the processing pipeline touches. The walk here is a
//! typed variant traversal, replacing dynamic dispatch on node type.

use osteoview_core::TriangleMesh;

/// What a scene node carries
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Structural node with no geometry of its own
    Group,
    /// Geometry-bearing node
    Mesh(MeshPayload),
}

/// Geometry and display payload of a mesh node
#[derive(Debug, Clone)]
pub struct MeshPayload {
    pub mesh: TriangleMesh,
    /// 1.0 is fully opaque
    pub opacity: f32,
}

/// One node in a loaded asset's tree
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn group(name: impl Into<String>, children: Vec<SceneNode>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Group,
            children,
        }
    }

    pub fn mesh(name: impl Into<String>, mesh: TriangleMesh) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Mesh(MeshPayload { mesh, opacity: 1.0 }),
            children: Vec::new(),
        }
    }

    /// Depth-first walk collecting references to every mesh payload
    pub fn collect_meshes(&self) -> Vec<&MeshPayload> {
        let mut found = Vec::new();
        self.visit_meshes(&mut |payload| found.push(payload));
        found
    }

    /// Depth-first walk invoking `f` on each mesh payload
    pub fn visit_meshes<'a>(&'a self, f: &mut impl FnMut(&'a MeshPayload)) {
        if let NodeKind::Mesh(payload) = &self.kind {
            f(payload);
        }
        for child in &self.children {
            child.visit_meshes(f);
        }
    }

    /// The first mesh payload in traversal order, typically the model root
    pub fn first_mesh(&self) -> Option<&MeshPayload> {
        let mut result = None;
        self.visit_meshes(&mut |payload| {
            if result.is_none() {
                result = Some(payload);
            }
        });
        result
    }
}
