use itertools::iproduct;
use nalgebra_glm as glm;

use crate::morph::MorphTargetSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Bone,
    Mesh,
    Other,
}

/// Axis-aligned box in the owning node's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: glm::Vec3,
    pub max: glm::Vec3,
}

impl Aabb {
    pub fn new(min: glm::Vec3, max: glm::Vec3) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> glm::Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> glm::Vec3 {
        self.max - self.min
    }

    pub fn corners(&self) -> [glm::Vec3; 8] {
        let mut corners = [glm::Vec3::zeros(); 8];
        for (i, (x, y, z)) in iproduct!(0..2, 0..2, 0..2).enumerate() {
            corners[i] = glm::vec3(
                if x == 0 { self.min.x } else { self.max.x },
                if y == 0 { self.min.y } else { self.max.y },
                if z == 0 { self.min.z } else { self.max.z },
            );
        }
        corners
    }

    pub fn merge_point(&mut self, point: &glm::Vec3) {
        self.min = glm::min2(&self.min, point);
        self.max = glm::max2(&self.max, point);
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,

    pub position: glm::Vec3,
    pub rotation: glm::Quat,
    pub scale: glm::Vec3,

    pub cast_shadow: bool,
    pub frustum_culled: bool,
    pub morph: Option<MorphTargetSet>,
    pub aabb: Option<Aabb>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            children: vec![],
            position: glm::Vec3::zeros(),
            rotation: glm::quat_identity(),
            scale: glm::vec3(1.0, 1.0, 1.0),
            cast_shadow: false,
            frustum_culled: true,
            morph: None,
            aabb: None,
        }
    }

    pub fn local_transform(&self) -> glm::Mat4 {
        glm::translate(&glm::Mat4::identity(), &self.position)
            * glm::quat_cast(&self.rotation)
            * glm::scaling(&self.scale)
    }
}

/// Arena-backed node tree of a loaded avatar. Bones and meshes never appear
/// or disappear after loading; animation only drives transform fields and
/// morph weights in place.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, mut node: Node, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = parent;
        self.nodes.push(node);
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Depth-first order starting from the roots, the graph's native order.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev());
        }
        order
    }

    pub fn world_transform(&self, id: NodeId) -> glm::Mat4 {
        let node = &self.nodes[id.0];
        let local = node.local_transform();
        match node.parent {
            Some(parent) => self.world_transform(parent) * local,
            None => local,
        }
    }

    /// World-space box around every mesh of the scene, None when no mesh
    /// carries bounds.
    pub fn world_aabb(&self) -> Option<Aabb> {
        let mut merged: Option<Aabb> = None;
        for id in self.walk() {
            let node = &self.nodes[id.0];
            let Some(aabb) = node.aabb else { continue };
            let world = self.world_transform(id);
            for corner in aabb.corners() {
                let p = world * glm::vec4(corner.x, corner.y, corner.z, 1.0);
                let p = glm::vec4_to_vec3(&p);
                match merged.as_mut() {
                    Some(merged) => merged.merge_point(&p),
                    None => merged = Some(Aabb::new(p, p)),
                }
            }
        }
        merged
    }
}
