//! Entity type
//!
//! An Entity represents an object in the scene with a transform, mesh, and material.

use std::collections::HashSet;
use std::sync::Arc;
use bitflags::bitflags;
use snowfall_math::{Quat, Vec3};
use snowfall_physics::BodyKey;
use crate::geometry::MeshData;
use crate::material::Material;
use crate::Transform;

bitflags! {
    /// Flags indicating which parts of an entity have changed and need updating
    ///
    /// The renderer re-uploads only the GPU resources whose flag is set.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE = 0;
        /// Transform (position, rotation, scale) has changed
        const TRANSFORM = 1 << 0;
        /// Mesh geometry has changed
        const MESH = 1 << 1;
        /// Material (including its texture) has changed
        const MATERIAL = 1 << 2;
        /// All flags set - entity needs full upload
        const ALL = Self::TRANSFORM.bits() | Self::MESH.bits() | Self::MATERIAL.bits();
    }
}

/// A drawable object: shared geometry placed by a transform
///
/// Spawned spheres and the terrain also carry the key of their body in the
/// physics world; the world copies body poses back onto them every step.
#[derive(Clone, Debug)]
pub struct Entity {
    pub name: Option<String>,
    /// e.g. "static" for the ground, "dynamic" for spawned spheres
    pub tags: HashSet<String>,
    pub transform: Transform,
    /// Geometry, shared between entities built from the same model
    pub mesh: Arc<MeshData>,
    pub material: Material,
    pub physics_body: Option<BodyKey>,
    /// What the renderer still has to re-upload
    dirty: DirtyFlags,
}

impl Entity {
    /// Create a new entity with the given mesh
    pub fn new(mesh: Arc<MeshData>) -> Self {
        Self::with_transform(mesh, Transform::identity(), Material::default())
    }

    /// Create a new entity with mesh and material
    pub fn with_material(mesh: Arc<MeshData>, material: Material) -> Self {
        Self::with_transform(mesh, Transform::identity(), material)
    }

    /// Create a new entity with mesh, transform, and material
    pub fn with_transform(mesh: Arc<MeshData>, transform: Transform, material: Material) -> Self {
        Self {
            name: None,
            tags: HashSet::new(),
            transform,
            mesh,
            material,
            physics_body: None,
            dirty: DirtyFlags::ALL, // New entities are dirty
        }
    }

    /// Set the name of this entity (for lookup)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a tag to this entity
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Add multiple tags to this entity
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for tag in tags {
            self.tags.insert(tag.into());
        }
        self
    }

    /// Check if this entity has a specific tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Attach a physics body to this entity
    pub fn with_physics_body(mut self, key: BodyKey) -> Self {
        self.physics_body = Some(key);
        self
    }

    // --- Dirty tracking methods ---

    /// Check if this entity has any dirty flags set
    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Get the current dirty flags
    #[inline]
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    /// Mark this entity as dirty with the given flags
    #[inline]
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    /// Clear all dirty flags
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }

    /// Set the position and mark the transform as dirty
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.mark_dirty(DirtyFlags::TRANSFORM);
    }

    /// Set position and rotation together, as a physics sync does
    pub fn set_pose(&mut self, position: Vec3, rotation: Quat) {
        self.transform.position = position;
        self.transform.rotation = rotation;
        self.mark_dirty(DirtyFlags::TRANSFORM);
    }

    /// Set the material and mark it as dirty
    pub fn set_material(&mut self, material: Material) {
        self.material = material;
        self.mark_dirty(DirtyFlags::MATERIAL);
    }

    /// Swap the material's texture map and mark the material dirty
    pub fn set_texture(&mut self, slot: Option<crate::material::TextureSlot>) {
        self.material.map = slot;
        self.mark_dirty(DirtyFlags::MATERIAL);
    }
}
