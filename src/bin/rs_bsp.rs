// std
use std::convert::TryFrom;
use std::path::PathBuf;
// others
use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use log::info;
// rs_bsp
use rs_bsp::accelerators::Accelerator;
use rs_bsp::core::base::Float;
use rs_bsp::core::camera::PinholeCamera;
use rs_bsp::core::geometry::{Point3f, Vector3f};
use rs_bsp::core::paramset::ParamSet;
use rs_bsp::core::scene::Scene;
use rs_bsp::integrators::raycast::RayCaster;
use rs_bsp::integrators::render;
use rs_bsp::shapes::load_mesh;
use rs_bsp::shapes::plane::Plane;
use rs_bsp::shapes::triangle::TriangleMesh;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Load OBJ/PLY meshes, build an accelerator over them and render a
/// debug view of what the rays hit.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// mesh files (.obj or .ply)
    meshes: Vec<PathBuf>,
    /// infinite plane as x,y,z,nx,ny,nz (repeatable)
    #[arg(long, value_parser = parse_floats::<6>, allow_hyphen_values = true)]
    plane: Vec<[Float; 6]>,
    /// accelerator: bsp or linear
    #[arg(long, default_value = "bsp")]
    accel: String,
    /// maximum number of primitives in a BSP leaf
    #[arg(long, default_value_t = 4)]
    maxprims: i32,
    /// maximum depth of the BSP tree
    #[arg(long, default_value_t = 20)]
    maxdepth: i32,
    #[arg(long, default_value_t = 512)]
    width: u32,
    #[arg(long, default_value_t = 512)]
    height: u32,
    /// jitter grid per pixel, subdivs * subdivs rays
    #[arg(long, default_value_t = 1)]
    subdivs: i32,
    /// visualisation: normal, depth or hits
    #[arg(long, default_value = "normal")]
    mode: String,
    /// camera position as x,y,z
    #[arg(long, value_parser = parse_floats::<3>, allow_hyphen_values = true)]
    eye: Option<[Float; 3]>,
    /// point the camera looks at as x,y,z
    #[arg(long, value_parser = parse_floats::<3>, allow_hyphen_values = true)]
    lookat: Option<[Float; 3]>,
    /// camera up direction as x,y,z
    #[arg(long, value_parser = parse_floats::<3>, allow_hyphen_values = true)]
    up: Option<[Float; 3]>,
    /// distance from the eye to the image plane
    #[arg(long, default_value_t = 1.0)]
    focal: Float,
    /// use specified number of threads for rendering (0 = all cores)
    #[arg(short = 't', long, default_value_t = 0)]
    nthreads: usize,
    /// seed for the pixel jitter
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// output image, format chosen by extension
    #[arg(short, long, default_value = "out.png")]
    output: PathBuf,
}

fn parse_floats<const N: usize>(s: &str) -> std::result::Result<[Float; N], String> {
    let values: Vec<Float> = s
        .split(',')
        .map(|v| v.trim().parse::<Float>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("{:?} is not a list of numbers: {}", s, e))?;
    let n: usize = values.len();
    <[Float; N]>::try_from(values).map_err(|_| format!("expected {} values, got {}", N, n))
}

fn param_set(args: &Cli) -> ParamSet {
    let mut ps = ParamSet::default();
    ps.add_string(String::from("accelerator"), args.accel.clone());
    ps.add_int(String::from("maxprims"), args.maxprims);
    ps.add_int(String::from("maxdepth"), args.maxdepth);
    ps.add_int(String::from("subdivs"), args.subdivs);
    ps.add_string(String::from("mode"), args.mode.clone());
    ps.add_float(String::from("focal"), args.focal);
    for (name, value) in &[("eye", args.eye), ("lookat", args.lookat), ("up", args.up)] {
        if let Some(v) = value {
            ps.add_floats(String::from(*name), v.to_vec());
        }
    }
    ps
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();
    // handle command line options
    let args = Cli::parse();
    let num_cores = num_cpus::get();
    info!("rs_bsp version {} [Detected {} cores]", VERSION, num_cores);
    if args.meshes.is_empty() && args.plane.is_empty() {
        return Err(eyre!("nothing to render, give at least one mesh or --plane"));
    }
    let mut meshes: Vec<TriangleMesh> = Vec::with_capacity(args.meshes.len());
    for path in &args.meshes {
        let mesh = load_mesh(path).wrap_err_with(|| format!("cannot use mesh {:?}", path))?;
        meshes.push(mesh);
    }
    let planes: Vec<Plane> = args
        .plane
        .iter()
        .map(|p| {
            Plane::new(
                Point3f::new(p[0], p[1], p[2]),
                Vector3f::new(p[3], p[4], p[5]),
            )
        })
        .collect();
    let ps: ParamSet = param_set(&args);
    let scene = Scene::new(meshes, planes, &ps);
    if let Accelerator::BspTree(tree) = &scene.accelerator {
        info!("{:?}", tree.stats());
    }
    let camera = PinholeCamera::create(&ps, &scene.world_bound())?;
    info!(
        "Camera at {:?} looking at {:?} (fov {} degrees)",
        camera.eye,
        camera.lookat,
        camera.get_fov()
    );
    let caster = RayCaster::create(&ps, args.width, args.height, &scene, &camera)?;
    let img = render(&scene, &camera, &caster, args.nthreads, args.seed)?;
    img.save(&args.output)
        .wrap_err_with(|| format!("failed to write image {:?}", args.output))?;
    info!("Wrote {:?}", args.output);
    Ok(())
}
