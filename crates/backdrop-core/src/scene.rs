//! Minimal 3D scene support: a perspective camera, pointer rays and a
//! sphere index for hit testing. Kept apart from the 2D distance checks.

use glam::{Mat4, Vec3};

use crate::geom::Vec2;

/// A half-line from `origin` along the unit vector `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Shortest distance from `point` to the ray (not the infinite line).
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        let t = (point - self.origin).dot(self.direction).max(0.0);
        self.at(t).distance(point)
    }

    /// Distance along the ray to the first intersection with a sphere.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.dot(oc) - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let near = -b - root;
        let far = -b + root;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            Some(far)
        } else {
            None
        }
    }
}

/// A point projected onto the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub screen: Vec2,
    /// Distance in front of the camera.
    pub depth: f32,
    /// Surface pixels per world unit at this depth.
    pub scale: f32,
}

/// Perspective camera looking at a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, fov: f32) -> Self {
        Self {
            position,
            target,
            fov,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Place the camera on a horizontal circle around the target.
    pub fn orbit(&mut self, angle: f32, radius: f32) {
        self.position = Vec3::new(
            self.target.x + angle.cos() * radius,
            self.position.y,
            self.target.z + angle.sin() * radius,
        );
    }

    /// World to camera transform.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Camera to clip transform for a surface of the given aspect ratio.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect.max(1e-6), self.near, self.far)
    }

    /// Project a world point onto a `width` x `height` surface, or `None`
    /// when it lies outside the near/far range.
    pub fn project(&self, point: Vec3, width: f32, height: f32) -> Option<Projected> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let projection = self.projection(width / height);
        let clip = projection * self.view() * point.extend(1.0);
        // w carries the view-space distance in front of the camera.
        let depth = clip.w;
        if !(self.near..=self.far).contains(&depth) {
            return None;
        }
        let ndc = clip.truncate() / depth;
        Some(Projected {
            screen: Vec2::new((ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height),
            depth,
            scale: projection.y_axis.y * height * 0.5 / depth,
        })
    }

    /// Ray through a point in normalized device coordinates
    /// (`-1..=1`, y up) for a surface of the given aspect ratio.
    pub fn ray_from_ndc(&self, ndc: Vec2, aspect: f32) -> Ray {
        let inverse = (self.projection(aspect) * self.view()).inverse();
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.position, far - near)
    }
}

/// Convert a surface position to normalized device coordinates.
pub fn surface_to_ndc(position: Vec2, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        position.x / width * 2.0 - 1.0,
        -(position.y / height) * 2.0 + 1.0,
    )
}

/// A bounding sphere registered for hit testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneEntry {
    pub position: Vec3,
    pub radius: f32,
}

/// Result of a successful ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub index: usize,
    pub point: Vec3,
    pub distance: f32,
}

/// Flat list of bounding spheres, rebuilt every tick from entity positions.
#[derive(Debug, Clone, Default)]
pub struct SceneIndex {
    entries: Vec<SceneEntry>,
}

impl SceneIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn push(&mut self, position: Vec3, radius: f32) -> usize {
        self.entries.push(SceneEntry { position, radius });
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SceneEntry] {
        &self.entries
    }

    /// Nearest sphere hit along the ray.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                ray.intersect_sphere(entry.position, entry.radius)
                    .map(|distance| Hit {
                        index,
                        point: ray.at(distance),
                        distance,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
