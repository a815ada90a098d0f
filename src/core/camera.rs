//! A pinhole camera. The image plane sits at the focal distance in
//! front of the eye and spans one unit vertically; its horizontal
//! extent follows the aspect ratio of the image.

// std
use std::f32::consts::PI;
// others
use eyre::{eyre, Result};
// rs_bsp
use crate::core::base::Float;
use crate::core::geometry::{vec3_cross_vec3, vec3_dot_vec3f};
use crate::core::geometry::{Bounds3f, Point2f, Point3f, Ray, Vector3f};
use crate::core::paramset::ParamSet;

#[derive(Debug, Copy, Clone)]
pub struct PinholeCamera {
    pub eye: Point3f,
    pub lookat: Point3f,
    pub up: Vector3f,
    pub focal_dist: Float,
    /// viewing direction scaled by the focal distance
    ip_normal: Vector3f,
    /// horizontal and vertical axes of the image plane
    ip_axes: [Vector3f; 2],
    /// vertical field of view in degrees
    fov: Float,
}

impl PinholeCamera {
    pub fn new(eye: Point3f, lookat: Point3f, up: Vector3f, focal_dist: Float) -> Result<Self> {
        let line_of_sight: Vector3f = lookat - eye;
        if line_of_sight.length() == 0.0 as Float {
            return Err(eyre!("camera eye and look-at point coincide at {:?}", eye));
        }
        if focal_dist <= 0.0 as Float {
            return Err(eyre!("focal distance must be positive, got {}", focal_dist));
        }
        let view: Vector3f = line_of_sight.normalize();
        if 1.0 as Float - vec3_dot_vec3f(&view, &up.normalize()).abs() < 1.0e-6 {
            return Err(eyre!(
                "line of sight {:?} and camera up direction {:?} are parallel",
                line_of_sight,
                up
            ));
        }
        let axis_x: Vector3f = vec3_cross_vec3(&view, &up).normalize();
        let axis_y: Vector3f = vec3_cross_vec3(&axis_x, &view).normalize();
        let fov: Float = 360.0 / PI * (0.5 / focal_dist).atan();
        Ok(PinholeCamera {
            eye,
            lookat,
            up,
            focal_dist,
            ip_normal: view * focal_dist,
            ip_axes: [axis_x, axis_y],
            fov,
        })
    }
    /// Reads `"eye"`, `"lookat"`, `"up"` (three floats each) and
    /// `"focal"`. Without an eye point the camera looks at the center
    /// of *bounds* from far enough along +z to see all of it.
    pub fn create(ps: &ParamSet, bounds: &Bounds3f) -> Result<Self> {
        let focal_dist: Float = ps.find_one_float("focal", 1.0);
        let (center, radius) = bounds.bounding_sphere();
        let lookat: Point3f = match point_param(ps, "lookat")? {
            Some(p) => p,
            None => center,
        };
        let eye: Point3f = match point_param(ps, "eye")? {
            Some(p) => p,
            None => {
                let half_fov: Float = (0.5 / focal_dist).atan();
                let distance: Float = radius.max(1.0) / half_fov.sin() * 1.1;
                lookat + Vector3f::new(0.0, 0.0, distance)
            }
        };
        let up: Vector3f = match point_param(ps, "up")? {
            Some(p) => Vector3f::from(p),
            None => Vector3f::new(0.0, 1.0, 0.0),
        };
        PinholeCamera::new(eye, lookat, up, focal_dist)
    }
    pub fn get_fov(&self) -> Float {
        self.fov
    }
    /// Unnormalized direction through image plane coordinates.
    pub fn get_ray_dir(&self, coords: &Point2f) -> Vector3f {
        self.ip_normal + self.ip_axes[0] * coords.x + self.ip_axes[1] * coords.y
    }
    pub fn get_ray(&self, coords: &Point2f) -> Ray {
        Ray::new(self.eye, self.get_ray_dir(coords).normalize())
    }
}

fn point_param(ps: &ParamSet, name: &str) -> Result<Option<Point3f>> {
    let values: Vec<Float> = ps.find_float(name);
    match values.len() {
        0 => Ok(None),
        3 => Ok(Some(Point3f::new(values[0], values[1], values[2]))),
        n => Err(eyre!("camera parameter \"{}\" needs 3 values, got {}", name, n)),
    }
}
