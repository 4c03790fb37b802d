//! Scene graph of renderable objects.
//!
//! The simulation talks to rendering only through this module: it creates
//! objects with a transform, moves them, and releases them. The renderer
//! reads a flattened [`DrawItem`] list once per frame. Storage is a
//! `hecs::World`, so an [`ObjectHandle`] is just an entity id.

use glam::{Mat4, Quat, Vec3, Vec4};
use hecs::World;
use thiserror::Error;

use crate::transform::Transform;

/// Opaque reference to a scene object.
pub type ObjectHandle = hecs::Entity;

/// Parent chains deeper than this are treated as cycles and cut off.
const MAX_HIERARCHY_DEPTH: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// The handle was never created or has already been released.
    #[error("scene object {0:?} does not exist")]
    UnknownObject(ObjectHandle),
}

/// Primitive geometry an object is drawn with. Dimensions are in local units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned box centred on the origin.
    Cuboid { size: Vec3 },
    /// Cylinder along local Y. Unequal radii give a tapered body.
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        segments: u32,
    },
    /// UV sphere.
    Sphere { radius: f32, segments: u32 },
    /// Flat disc in the local XY plane facing +Z.
    Disc { radius: f32, segments: u32 },
    /// Square in the local XY plane facing +Z.
    Plane { size: f32 },
}

impl Shape {
    pub fn cuboid(x: f32, y: f32, z: f32) -> Self {
        Self::Cuboid {
            size: Vec3::new(x, y, z),
        }
    }
}

/// Surface appearance. Unlit materials ignore scene lighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Vec4,
    pub lit: bool,
}

impl Material {
    /// Diffuse-lit material from a `0xRRGGBB` colour.
    pub fn lambert(hex: u32) -> Self {
        Self {
            color: hex_to_rgba(hex),
            lit: true,
        }
    }

    /// Flat colour that ignores lighting.
    pub fn unlit(hex: u32) -> Self {
        Self {
            color: hex_to_rgba(hex),
            lit: false,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.color.w = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.color.w < 1.0
    }
}

/// Convert `0xRRGGBB` to linear-ish RGBA in [0, 1] with full opacity.
pub fn hex_to_rgba(hex: u32) -> Vec4 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec4::new(r, g, b, 1.0)
}

/// Component: what to draw.
#[derive(Debug, Clone, Copy)]
pub struct Renderable {
    pub shape: Shape,
    pub material: Material,
}

/// Component: the object's transform is relative to this parent.
#[derive(Debug, Clone, Copy)]
struct Parent(ObjectHandle);

/// Component: objects attached to this one, released along with it.
#[derive(Debug, Clone, Default)]
struct Children(Vec<ObjectHandle>);

/// One object ready to draw, with its composed world matrix.
#[derive(Debug, Clone, Copy)]
pub struct DrawItem {
    pub shape: Shape,
    pub material: Material,
    pub model: Mat4,
}

/// All renderable objects in the world.
#[derive(Default)]
pub struct Scene {
    world: World,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a top-level object at the origin.
    pub fn create_object(&mut self, shape: Shape, material: Material) -> ObjectHandle {
        self.world
            .spawn((Transform::default(), Renderable { shape, material }, Children::default()))
    }

    /// Create an invisible node used to group children under one transform.
    pub fn create_group(&mut self) -> ObjectHandle {
        self.world.spawn((Transform::default(), Children::default()))
    }

    /// Create an object whose transform is relative to `parent`.
    pub fn create_child(
        &mut self,
        parent: ObjectHandle,
        shape: Shape,
        material: Material,
        local: Transform,
    ) -> Result<ObjectHandle, SceneError> {
        let child = self.world.spawn((
            local,
            Renderable { shape, material },
            Parent(parent),
            Children::default(),
        ));
        self.attach(parent, child)?;
        Ok(child)
    }

    /// Create an empty group nested under `parent`.
    pub fn create_child_group(
        &mut self,
        parent: ObjectHandle,
        local: Transform,
    ) -> Result<ObjectHandle, SceneError> {
        let child = self.world.spawn((local, Parent(parent), Children::default()));
        self.attach(parent, child)?;
        Ok(child)
    }

    fn attach(&mut self, parent: ObjectHandle, child: ObjectHandle) -> Result<(), SceneError> {
        let attached = match self.world.get::<&mut Children>(parent) {
            Ok(mut children) => {
                children.0.push(child);
                true
            }
            Err(_) => false,
        };
        if attached {
            Ok(())
        } else {
            self.world.despawn(child).ok();
            Err(SceneError::UnknownObject(parent))
        }
    }

    pub fn set_position(&mut self, handle: ObjectHandle, position: Vec3) -> Result<(), SceneError> {
        self.transform_mut(handle)?.position = position;
        Ok(())
    }

    pub fn set_orientation(&mut self, handle: ObjectHandle, rotation: Quat) -> Result<(), SceneError> {
        self.transform_mut(handle)?.rotation = rotation;
        Ok(())
    }

    pub fn set_transform(&mut self, handle: ObjectHandle, transform: Transform) -> Result<(), SceneError> {
        *self.transform_mut(handle)? = transform;
        Ok(())
    }

    fn transform_mut(&mut self, handle: ObjectHandle) -> Result<hecs::RefMut<'_, Transform>, SceneError> {
        self.world
            .get::<&mut Transform>(handle)
            .map_err(|_| SceneError::UnknownObject(handle))
    }

    /// Local transform of an object (relative to its parent, if any).
    pub fn transform(&self, handle: ObjectHandle) -> Option<Transform> {
        self.world.get::<&Transform>(handle).ok().map(|t| *t)
    }

    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.world.contains(handle)
    }

    /// Number of live nodes, groups included.
    pub fn object_count(&self) -> usize {
        self.world.len() as usize
    }

    /// Release an object and everything attached beneath it.
    /// Releasing the same handle twice is an error.
    pub fn destroy_object(&mut self, handle: ObjectHandle) -> Result<(), SceneError> {
        if !self.world.contains(handle) {
            return Err(SceneError::UnknownObject(handle));
        }

        let parent = self.world.get::<&Parent>(handle).ok().map(|p| p.0);
        if let Some(parent) = parent {
            if let Ok(mut siblings) = self.world.get::<&mut Children>(parent) {
                siblings.0.retain(|&c| c != handle);
            }
        }

        let mut pending = vec![handle];
        while let Some(entity) = pending.pop() {
            if let Ok(children) = self.world.get::<&Children>(entity) {
                pending.extend(children.0.iter().copied());
            }
            self.world.despawn(entity).ok();
        }
        Ok(())
    }

    /// Composed world matrix of an object.
    pub fn world_matrix(&self, handle: ObjectHandle) -> Option<Mat4> {
        let mut matrix = self.world.get::<&Transform>(handle).ok()?.to_matrix();
        let mut current = handle;
        for _ in 0..MAX_HIERARCHY_DEPTH {
            let parent = match self.world.get::<&Parent>(current) {
                Ok(p) => p.0,
                Err(_) => return Some(matrix),
            };
            let parent_matrix = self.world.get::<&Transform>(parent).ok()?.to_matrix();
            matrix = parent_matrix * matrix;
            current = parent;
        }
        log::warn!("Scene hierarchy deeper than {} levels at {:?}", MAX_HIERARCHY_DEPTH, handle);
        Some(matrix)
    }

    /// World-space position of an object's origin.
    pub fn world_position(&self, handle: ObjectHandle) -> Option<Vec3> {
        self.world_matrix(handle).map(|m| m.w_axis.truncate())
    }

    /// Flatten every renderable object into draw order: opaque first, then transparent.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let mut items: Vec<DrawItem> = self
            .world
            .query::<&Renderable>()
            .iter()
            .filter_map(|(entity, renderable)| {
                self.world_matrix(entity).map(|model| DrawItem {
                    shape: renderable.shape,
                    material: renderable.material,
                    model,
                })
            })
            .collect();
        items.sort_by_key(|item| item.material.is_transparent());
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> Shape {
        Shape::cuboid(1.0, 1.0, 1.0)
    }

    #[test]
    fn create_and_destroy_releases_exactly_once() {
        let mut scene = Scene::new();
        let handle = scene.create_object(cube(), Material::lambert(0xffffff));
        assert!(scene.contains(handle));
        assert_eq!(scene.destroy_object(handle), Ok(()));
        assert!(!scene.contains(handle));
        assert_eq!(scene.destroy_object(handle), Err(SceneError::UnknownObject(handle)));
    }

    #[test]
    fn set_position_on_released_handle_fails() {
        let mut scene = Scene::new();
        let handle = scene.create_object(cube(), Material::unlit(0xff0000));
        scene.destroy_object(handle).unwrap();
        assert!(scene.set_position(handle, Vec3::ONE).is_err());
    }

    #[test]
    fn children_follow_parent_transform() {
        let mut scene = Scene::new();
        let root = scene.create_group();
        let child = scene
            .create_child(root, cube(), Material::lambert(0x00ff00), Transform::from_position(Vec3::X))
            .unwrap();
        scene.set_position(root, Vec3::new(0.0, 10.0, 0.0)).unwrap();
        let p = scene.world_position(child).unwrap();
        assert!(p.abs_diff_eq(Vec3::new(1.0, 10.0, 0.0), 1.0e-5));
    }

    #[test]
    fn destroying_group_releases_descendants() {
        let mut scene = Scene::new();
        let root = scene.create_group();
        let mid = scene.create_child_group(root, Transform::default()).unwrap();
        let leaf = scene
            .create_child(mid, cube(), Material::lambert(0x123456), Transform::default())
            .unwrap();
        assert_eq!(scene.object_count(), 3);
        scene.destroy_object(root).unwrap();
        assert_eq!(scene.object_count(), 0);
        assert!(!scene.contains(leaf));
    }

    #[test]
    fn destroying_child_detaches_from_parent() {
        let mut scene = Scene::new();
        let root = scene.create_group();
        let child = scene
            .create_child(root, cube(), Material::lambert(0x123456), Transform::default())
            .unwrap();
        scene.destroy_object(child).unwrap();
        // Releasing the parent afterwards must not trip over the stale child.
        assert_eq!(scene.destroy_object(root), Ok(()));
    }

    #[test]
    fn draw_list_puts_transparent_last() {
        let mut scene = Scene::new();
        scene.create_object(cube(), Material::lambert(0x0077be).with_opacity(0.7));
        scene.create_object(cube(), Material::lambert(0x4caf50));
        let groups_are_skipped = scene.create_group();
        let items = scene.draw_list();
        assert_eq!(items.len(), 2);
        assert!(!items[0].material.is_transparent());
        assert!(items[1].material.is_transparent());
        assert!(scene.contains(groups_are_skipped));
    }

    #[test]
    fn hex_colors_decode() {
        let c = hex_to_rgba(0xff8000);
        assert!((c.x - 1.0).abs() < 1.0e-6);
        assert!((c.y - 128.0 / 255.0).abs() < 1.0e-6);
        assert_eq!(c.z, 0.0);
        assert_eq!(c.w, 1.0);
    }
}
