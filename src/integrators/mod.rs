//! Rendering drives the ray caster over the whole image. The image is
//! cut into tiles which worker threads pick from a shared
//! [BlockQueue](../blockqueue/struct.BlockQueue.html); finished tiles
//! travel over a channel to a collector thread, which copies them into
//! the image and advances a progress bar.

pub mod raycast;

// others
use eyre::{eyre, Result};
use image::{Rgb, RgbImage};
use log::info;
// rs_bsp
use crate::blockqueue::BlockQueue;
use crate::core::camera::PinholeCamera;
use crate::core::geometry::Vector3f;
use crate::core::rng::Rng;
use crate::core::scene::Scene;
use crate::integrators::raycast::{to_byte, RayCaster};

/// Edge length of an image tile in pixels.
pub const TILE_SIZE: u32 = 16;

/// Pixels of one finished tile, rows counted from the bottom of the
/// image.
struct ImageTile {
    x0: u32,
    y0: u32,
    width: u32,
    pixels: Vec<Vector3f>,
}

/// **Main function** to **render** a scene multi-threaded. With
/// *num_threads* set to zero all available cores are used. The result
/// only depends on *seed*, not on the number of threads.
pub fn render(
    scene: &Scene,
    camera: &PinholeCamera,
    caster: &RayCaster,
    num_threads: usize,
    seed: u64,
) -> Result<RgbImage> {
    let (width, height) = (caster.width, caster.height);
    let num_cores: usize = if num_threads == 0 {
        num_cpus::get()
    } else {
        num_threads
    };
    info!(
        "Rendering {}x{} ({} mode, {} rays per pixel) with {} thread(s) ...",
        width,
        height,
        caster.mode,
        caster.subdivs * caster.subdivs,
        num_cores
    );
    let mut img: RgbImage = RgbImage::new(width, height);
    let block_queue = BlockQueue::new((width, height), (TILE_SIZE, TILE_SIZE));
    let bq = &block_queue;
    let img_ref = &mut img;
    let collected: usize = crossbeam::scope(|scope| {
        let (pixel_tx, pixel_rx) = crossbeam_channel::bounded::<ImageTile>(num_cores);
        // spawn worker threads
        for _ in 0..num_cores {
            let pixel_tx = pixel_tx.clone();
            scope.spawn(move |_| {
                let mut rng: Rng = Rng::default();
                while let Some((index, (tx, ty))) = bq.next() {
                    rng.set_sequence((seed << 32) | index as u64);
                    let (dx, dy) = bq.block_dim();
                    let x0: u32 = tx * dx;
                    let y0: u32 = ty * dy;
                    let x1: u32 = (x0 + dx).min(width);
                    let y1: u32 = (y0 + dy).min(height);
                    let mut pixels: Vec<Vector3f> =
                        Vec::with_capacity(((x1 - x0) * (y1 - y0)) as usize);
                    for y in y0..y1 {
                        for x in x0..x1 {
                            pixels.push(caster.compute_pixel(scene, camera, x, y, &mut rng));
                        }
                    }
                    let tile = ImageTile {
                        x0,
                        y0,
                        width: x1 - x0,
                        pixels,
                    };
                    // the collector is gone, nothing left to do
                    if pixel_tx.send(tile).is_err() {
                        break;
                    }
                }
            });
        }
        drop(pixel_tx);
        // collect pixels on this thread and write them into the image
        let mut collected: usize = 0;
        for _ in pbr::PbIter::new(0..bq.len()) {
            let tile: ImageTile = match pixel_rx.recv() {
                Ok(tile) => tile,
                Err(_) => break,
            };
            for (i, c) in tile.pixels.iter().enumerate() {
                let x: u32 = tile.x0 + i as u32 % tile.width;
                let y: u32 = tile.y0 + i as u32 / tile.width;
                img_ref.put_pixel(
                    x,
                    height - 1 - y,
                    Rgb([to_byte(c.x), to_byte(c.y), to_byte(c.z)]),
                );
            }
            collected += 1;
        }
        collected
    })
    .map_err(|_| eyre!("a render thread panicked"))?;
    if collected != block_queue.len() {
        return Err(eyre!(
            "only {} of {} image tiles were rendered",
            collected,
            block_queue.len()
        ));
    }
    Ok(img)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::{Point3f, Vector3f};
    use crate::core::paramset::ParamSet;
    use crate::integrators::raycast::VisMode;
    use crate::shapes::plane::Plane;
    use crate::shapes::triangle::create_cube;

    fn setup() -> (Scene, PinholeCamera) {
        let scene = Scene::new(
            vec![create_cube(1.0)],
            vec![Plane::new(
                Point3f::new(0.0, -0.5, 0.0),
                Vector3f::new(0.0, 1.0, 0.0),
            )],
            &ParamSet::default(),
        );
        let camera = PinholeCamera::new(
            Point3f::new(0.0, 0.0, 5.0),
            Point3f::new(0.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            1.0,
        )
        .unwrap();
        (scene, camera)
    }

    #[test]
    fn image_is_upright() {
        let (scene, camera) = setup();
        // size not a multiple of the tile size
        let caster = RayCaster::new(41, 23, 1, VisMode::Normal, 10.0);
        let img = render(&scene, &camera, &caster, 3, 0).unwrap();
        assert_eq!(img.dimensions(), (41, 23));
        // floor at the bottom, nothing above the cube
        assert_eq!(img.get_pixel(0, 22), &Rgb([128, 255, 128]));
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(20, 11), &Rgb([128, 128, 255]));
    }

    #[test]
    fn thread_count_does_not_change_the_image() {
        let (scene, camera) = setup();
        let caster = RayCaster::new(37, 29, 2, VisMode::Depth, 8.0);
        let one = render(&scene, &camera, &caster, 1, 42).unwrap();
        let many = render(&scene, &camera, &caster, 4, 42).unwrap();
        assert_eq!(one.as_raw(), many.as_raw());
    }
}
