//! Authoritative scene: flat object storage with dense pick ids.
//!
//! Every drawable is a [`SceneObject`] that pairs its id, model transform,
//! and visibility with backend-specific GPU resources `R`. Ids are assigned
//! from 1 upward; [`ObjectId::NONE`] (0) is the pick-buffer clear value and
//! means "background".

/// Interleaved vertex data and built-in meshes.
pub mod mesh;
/// CPU-side RGBA8 texture data.
pub mod texture;

use glam::{Mat4, Vec3};
pub use mesh::{MeshData, Vertex};
use rustc_hash::FxHashMap;
pub use texture::TextureData;

/// Dense object identifier written into the pick buffer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Background / no object.
    pub const NONE: Self = Self(0);

    /// Wrap a raw pick value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw value as written by the pick shader.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this is the background id.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            f.write_str("none")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Model matrix from a per-axis scale followed by a translation.
#[must_use]
pub fn placement(scale: Vec3, location: Vec3) -> Mat4 {
    Mat4::from_translation(location) * Mat4::from_scale(scale)
}

/// One drawable object.
#[derive(Debug)]
pub struct SceneObject<R> {
    /// Pick id, unique within the scene.
    pub id: ObjectId,
    /// Object-to-world transform.
    pub model: Mat4,
    /// Hidden objects are skipped by both passes.
    pub visible: bool,
    /// Backend resources needed to draw this object.
    pub resources: R,
}

/// The authoritative scene. Owns all objects in insertion order.
#[derive(Debug)]
pub struct Scene<R> {
    objects: Vec<SceneObject<R>>,
    /// Object id → index into `objects`.
    index: FxHashMap<ObjectId, usize>,
    next_id: u32,
    /// Bumped whenever existing ids may stop referring to the same object.
    generation: u64,
}

impl<R> Default for Scene<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Scene<R> {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            index: FxHashMap::default(),
            next_id: 1,
            generation: 0,
        }
    }

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    fn reindex(&mut self) {
        self.index = self
            .objects
            .iter()
            .enumerate()
            .map(|(i, object)| (object.id, i))
            .collect();
    }

    /// Generation counter; pick results tagged with an older value are
    /// stale.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Add an object. `build` receives the assigned id so pick resources
    /// can embed it.
    pub fn add_object(
        &mut self,
        model: Mat4,
        build: impl FnOnce(ObjectId) -> R,
    ) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        let _ = self.index.insert(id, self.objects.len());
        self.objects.push(SceneObject {
            id,
            model,
            visible: true,
            resources: build(id),
        });
        id
    }

    /// Remove an object by id. Returns it, if present.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject<R>> {
        let idx = self.index.get(&id).copied()?;
        let object = self.objects.remove(idx);
        self.reindex();
        self.invalidate();
        Some(object)
    }

    /// Remove every object. Ids are not reused.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.index.clear();
        self.invalidate();
    }

    /// Read access to an object.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject<R>> {
        self.index.get(&id).map(|&i| &self.objects[i])
    }

    /// Mutable access to an object.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject<R>> {
        self.index.get(&id).map(|&i| &mut self.objects[i])
    }

    /// Replace an object's model matrix. Returns `false` for unknown ids.
    pub fn set_model(&mut self, id: ObjectId, model: Mat4) -> bool {
        let Some(object) = self.object_mut(id) else {
            return false;
        };
        object.model = model;
        true
    }

    /// Show or hide an object. Returns `false` for unknown ids.
    pub fn set_visible(&mut self, id: ObjectId, visible: bool) -> bool {
        let Some(object) = self.object_mut(id) else {
            return false;
        };
        object.visible = visible;
        true
    }

    /// All objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject<R>> {
        self.objects.iter()
    }

    /// Visible objects in insertion order.
    pub fn visible_objects(&self) -> impl Iterator<Item = &SceneObject<R>> {
        self.objects.iter().filter(|o| o.visible)
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene has no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Resolve a raw pick value to a live object id. Unknown values
    /// (including 0) resolve to [`ObjectId::NONE`].
    #[must_use]
    pub fn resolve(&self, raw: u32) -> ObjectId {
        let id = ObjectId(raw);
        if self.index.contains_key(&id) {
            id
        } else {
            ObjectId::NONE
        }
    }
}
