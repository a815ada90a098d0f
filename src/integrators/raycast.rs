//! The ray caster turns image pixels into camera rays and visualises
//! what the accelerator reports for them. There is no shading, each
//! mode simply maps one field of the hit record to a color.

// std
use std::fmt;
// others
use eyre::{eyre, Result};
// rs_bsp
use crate::core::base::{clamp_t, Float};
use crate::core::camera::PinholeCamera;
use crate::core::geometry::pnt3_distancef;
use crate::core::geometry::{Point2f, Ray, Vector3f};
use crate::core::paramset::ParamSet;
use crate::core::rng::Rng;
use crate::core::scene::Scene;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VisMode {
    /// surface normal mapped from [-1, 1] to [0, 1]
    Normal,
    /// distance along the ray, bright is close
    Depth,
    /// white wherever any geometry is hit
    Hits,
}

impl VisMode {
    pub fn from_name(name: &str) -> Option<VisMode> {
        match name {
            "normal" => Some(VisMode::Normal),
            "depth" => Some(VisMode::Depth),
            "hits" => Some(VisMode::Hits),
            _ => None,
        }
    }
}

impl fmt::Display for VisMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VisMode::Normal => write!(f, "normal"),
            VisMode::Depth => write!(f, "depth"),
            VisMode::Hits => write!(f, "hits"),
        }
    }
}

pub struct RayCaster {
    pub width: u32,
    pub height: u32,
    /// rays per pixel are subdivs * subdivs
    pub subdivs: u32,
    pub mode: VisMode,
    /// distance mapped to black in depth mode
    pub far: Float,
    win_to_vp: Point2f,
    lower_left: Point2f,
    step: Point2f,
}

impl RayCaster {
    pub fn new(width: u32, height: u32, subdivs: u32, mode: VisMode, far: Float) -> Self {
        let w: Float = width.max(1) as Float;
        let h: Float = height.max(1) as Float;
        let subdivs: u32 = subdivs.max(1);
        let aspect: Float = w / h;
        let win_to_vp: Point2f = Point2f {
            x: aspect / w,
            y: 1.0 / h,
        };
        RayCaster {
            width,
            height,
            subdivs,
            mode,
            far,
            win_to_vp,
            lower_left: Point2f {
                x: -0.5 * aspect,
                y: -0.5,
            },
            step: Point2f {
                x: win_to_vp.x / subdivs as Float,
                y: win_to_vp.y / subdivs as Float,
            },
        }
    }
    /// Reads `"subdivs"` (1), `"mode"` (`"normal"`) and `"far"`. Without
    /// a far distance the far side of the scene's bounding sphere, as
    /// seen from the camera, is used.
    pub fn create(
        ps: &ParamSet,
        width: u32,
        height: u32,
        scene: &Scene,
        camera: &PinholeCamera,
    ) -> Result<Self> {
        let subdivs: i32 = ps.find_one_int("subdivs", 1);
        if subdivs < 1 {
            return Err(eyre!("subdivs must be at least 1, got {}", subdivs));
        }
        let mode_name: String = ps.find_one_string("mode", String::from("normal"));
        let mode: VisMode = VisMode::from_name(&mode_name)
            .ok_or_else(|| eyre!("unknown visualisation mode {:?}", mode_name))?;
        let (center, radius) = scene.world_bound().bounding_sphere();
        let mut far: Float = ps.find_one_float("far", 0.0);
        if far <= 0.0 as Float {
            far = pnt3_distancef(&camera.eye, &center) + radius;
        }
        if far <= 0.0 as Float || !far.is_finite() {
            far = 1.0;
        }
        Ok(RayCaster::new(width, height, subdivs as u32, mode, far))
    }
    /// Offsets inside the pixel footprint, one per ray.
    fn jitters(&self, rng: &mut Rng) -> Vec<Point2f> {
        if self.subdivs == 1 {
            return vec![Point2f {
                x: 0.5 * self.win_to_vp.x,
                y: 0.5 * self.win_to_vp.y,
            }];
        }
        let mut jitter: Vec<Point2f> = Vec::with_capacity((self.subdivs * self.subdivs) as usize);
        for i in 0..self.subdivs {
            for j in 0..self.subdivs {
                jitter.push(Point2f {
                    x: rng.uniform_range(j as Float, j as Float + 1.0) * self.step.x,
                    y: rng.uniform_range(i as Float, i as Float + 1.0) * self.step.y,
                });
            }
        }
        jitter
    }
    /// Averaged color of pixel *(x, y)*, counting rows from the bottom
    /// of the image.
    pub fn compute_pixel(
        &self,
        scene: &Scene,
        camera: &PinholeCamera,
        x: u32,
        y: u32,
        rng: &mut Rng,
    ) -> Vector3f {
        let vp_pos: Point2f = Point2f {
            x: x as Float * self.win_to_vp.x + self.lower_left.x,
            y: y as Float * self.win_to_vp.y + self.lower_left.y,
        };
        let jitter: Vec<Point2f> = self.jitters(rng);
        let mut result: Vector3f = Vector3f::default();
        for offset in &jitter {
            let mut ray: Ray = camera.get_ray(&Point2f {
                x: vp_pos.x + offset.x,
                y: vp_pos.y + offset.y,
            });
            result += self.trace(scene, &mut ray);
        }
        result / jitter.len() as Float
    }
    fn trace(&self, scene: &Scene, ray: &mut Ray) -> Vector3f {
        match self.mode {
            VisMode::Hits => {
                if scene.occluded(ray) {
                    Vector3f::new(1.0, 1.0, 1.0)
                } else {
                    Vector3f::default()
                }
            }
            VisMode::Normal => {
                if scene.intersect(ray) {
                    ray.hit_normal * 0.5 as Float + Vector3f::new(0.5, 0.5, 0.5)
                } else {
                    Vector3f::default()
                }
            }
            VisMode::Depth => {
                if scene.intersect(ray) {
                    let d: Float = clamp_t(1.0 as Float - ray.dist / self.far, 0.0, 1.0);
                    Vector3f::new(d, d, d)
                } else {
                    Vector3f::default()
                }
            }
        }
    }
}

/// 8-bit channel value of a color component in [0, 1].
pub fn to_byte(v: Float) -> u8 {
    clamp_t(v * 255.0 + 0.5, 0.0, 255.0) as u8
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::Point3f;
    use crate::shapes::plane::Plane;
    use crate::shapes::triangle::create_cube;

    fn cube_scene(accelerator: &str) -> Scene {
        let mut ps = ParamSet::default();
        ps.add_string(String::from("accelerator"), String::from(accelerator));
        Scene::new(vec![create_cube(1.0)], Vec::new(), &ps)
    }

    fn front_camera() -> PinholeCamera {
        PinholeCamera::new(
            Point3f::new(0.0, 0.0, 5.0),
            Point3f::new(0.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn mode_names() {
        for mode in &[VisMode::Normal, VisMode::Depth, VisMode::Hits] {
            assert_eq!(VisMode::from_name(&mode.to_string()), Some(*mode));
        }
        assert_eq!(VisMode::from_name("shaded"), None);
    }

    #[test]
    fn center_pixel_sees_front_face() {
        let scene = cube_scene("bsp");
        let camera = front_camera();
        let caster = RayCaster::new(33, 33, 1, VisMode::Normal, 10.0);
        let mut rng = Rng::new(0);
        let c = caster.compute_pixel(&scene, &camera, 16, 16, &mut rng);
        assert!((c - Vector3f::new(0.5, 0.5, 1.0)).length() < 1.0e-4);
        // corner pixel looks past the cube
        let c = caster.compute_pixel(&scene, &camera, 0, 0, &mut rng);
        assert_eq!(c, Vector3f::default());
    }

    #[test]
    fn depth_and_hits() {
        let scene = cube_scene("linear");
        let camera = front_camera();
        let mut rng = Rng::new(7);
        let depth = RayCaster::new(33, 33, 2, VisMode::Depth, 9.0);
        let c = depth.compute_pixel(&scene, &camera, 16, 16, &mut rng);
        // the front face is 4.5 away, give or take the jitter
        assert!((c.x - 0.5).abs() < 0.01);
        let hits = RayCaster::new(33, 33, 3, VisMode::Hits, 1.0);
        let c = hits.compute_pixel(&scene, &camera, 16, 16, &mut rng);
        assert_eq!(c, Vector3f::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn jitter_stays_inside_pixel() {
        let caster = RayCaster::new(64, 32, 4, VisMode::Hits, 1.0);
        let mut rng = Rng::new(3);
        let jitter = caster.jitters(&mut rng);
        assert_eq!(jitter.len(), 16);
        for p in &jitter {
            assert!(p.x >= 0.0 && p.x <= caster.win_to_vp.x);
            assert!(p.y >= 0.0 && p.y <= caster.win_to_vp.y);
        }
        // the viewport is aspect wide and one unit high
        assert!((caster.win_to_vp.x * 64.0 - 2.0).abs() < 1.0e-6);
        assert!((caster.win_to_vp.y * 32.0 - 1.0).abs() < 1.0e-6);
    }

    #[test]
    fn create_reads_parameters() {
        let scene = Scene::new(
            vec![create_cube(2.0)],
            vec![Plane::new(
                Point3f::new(0.0, -1.0, 0.0),
                Vector3f::new(0.0, 1.0, 0.0),
            )],
            &ParamSet::default(),
        );
        let camera = front_camera();
        let caster = RayCaster::create(&ParamSet::default(), 16, 8, &scene, &camera).unwrap();
        assert_eq!(caster.subdivs, 1);
        assert_eq!(caster.mode, VisMode::Normal);
        assert!((caster.far - (5.0 + 3.0_f32.sqrt())).abs() < 1.0e-4);
        let mut ps = ParamSet::default();
        ps.add_string(String::from("mode"), String::from("depth"));
        ps.add_int(String::from("subdivs"), 3);
        ps.add_float(String::from("far"), 20.0);
        let caster = RayCaster::create(&ps, 16, 8, &scene, &camera).unwrap();
        assert_eq!((caster.subdivs, caster.mode, caster.far), (3, VisMode::Depth, 20.0));
        ps.add_string(String::from("mode"), String::from("shaded"));
        assert!(RayCaster::create(&ps, 16, 8, &scene, &camera).is_err());
        ps.add_string(String::from("mode"), String::from("hits"));
        ps.add_int(String::from("subdivs"), 0);
        assert!(RayCaster::create(&ps, 16, 8, &scene, &camera).is_err());
    }

    #[test]
    fn bytes_are_clamped() {
        assert_eq!(to_byte(-0.5), 0);
        assert_eq!(to_byte(0.5), 128);
        assert_eq!(to_byte(1.0), 255);
        assert_eq!(to_byte(3.0), 255);
    }
}
