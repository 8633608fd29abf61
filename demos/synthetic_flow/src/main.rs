use argh::FromArgs;
use glam::DVec3;
use kornia::{
    eval::{evaluate, BoundingBox, EvalParams},
    image::{Image, ImageSize},
    k3d::{
        camera::PinholeIntrinsics,
        flow::dense_flow_from_motion,
        motion::{CameraMotion, ObjectMotion},
        transforms::euler_to_rotation,
    },
};
use std::path::PathBuf;

#[derive(FromArgs)]
/// Synthesize the flow of a moving box in front of a moving camera and
/// evaluate a perturbed prediction of its motion
struct Args {
    /// the image width
    #[argh(option, default = "320")]
    width: usize,

    /// the image height
    #[argh(option, default = "96")]
    height: usize,

    /// the focal length in pixels
    #[argh(option, default = "200.0")]
    focal: f64,

    /// the depth of the background plane
    #[argh(option, default = "20.0")]
    depth: f32,

    /// the object yaw in degrees
    #[argh(option, default = "5.0")]
    yaw: f64,

    /// the camera forward motion
    #[argh(option, default = "0.5")]
    forward: f64,

    /// path to a json file with the evaluation parameters
    #[argh(option)]
    params: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let params = match &args.params {
        Some(path) => serde_json::from_str::<EvalParams>(&std::fs::read_to_string(path)?)?,
        None => EvalParams::default(),
    };

    let size = ImageSize {
        width: args.width,
        height: args.height,
    };
    let intrinsics = PinholeIntrinsics::new(
        args.focal,
        size.width as f64 / 2.0,
        size.height as f64 / 2.0,
    );

    // object box covering the central third of the image, closer than the background
    let bbox = BoundingBox::from_array([
        size.height as f64 / 3.0,
        size.width as f64 / 3.0,
        2.0 * size.height as f64 / 3.0,
        2.0 * size.width as f64 / 3.0,
    ]);
    let object_depth = args.depth / 2.0;

    let inside = |x: usize, y: usize| {
        let (x, y) = (x as f64, y as f64);
        y >= bbox.ymin && y < bbox.ymax && x >= bbox.xmin && x < bbox.xmax
    };
    let depth = Image::<f32, 1>::from_fn(size, |x, y| {
        [if inside(x, y) { object_depth } else { args.depth }]
    });
    let mask = Image::<f32, 1>::from_fn(size, |x, y| [if inside(x, y) { 1.0 } else { 0.0 }]);

    let gt_motion = ObjectMotion::new(
        euler_to_rotation(0.0, args.yaw.to_radians(), 0.0),
        DVec3::new(0.3, 0.0, 0.0),
        DVec3::new(0.0, 0.0, object_depth as f64),
    );
    let camera_motion = CameraMotion::new(
        euler_to_rotation(0.0, 0.5f64.to_radians(), 0.0),
        DVec3::new(0.0, 0.0, -args.forward),
    );

    let flow = dense_flow_from_motion(&depth, &[gt_motion], &[mask], &camera_motion, &intrinsics)?;

    let (mut max_mag, mut sum_mag) = (0f32, 0f32);
    for uv in flow.as_slice().chunks_exact(2) {
        let mag = (uv[0] * uv[0] + uv[1] * uv[1]).sqrt();
        max_mag = max_mag.max(mag);
        sum_mag += mag;
    }
    log::info!(
        "flow {}: mean magnitude {:.3} px, max {:.3} px",
        size,
        sum_mag / size.num_pixels() as f32,
        max_mag
    );

    // a prediction slightly off in rotation and translation
    let pred_motion = ObjectMotion::new(
        euler_to_rotation(0.0, (args.yaw * 0.9).to_radians(), 0.0),
        gt_motion.translation + DVec3::new(0.02, 0.0, -0.05),
        gt_motion.pivot + DVec3::new(0.0, 0.0, 0.1),
    );
    let pred_box = BoundingBox::from_array([bbox.ymin + 1.0, bbox.xmin, bbox.ymax, bbox.xmax - 2.0]);

    let report = evaluate(
        &[bbox][..],
        &[gt_motion],
        &[pred_box][..],
        &[pred_motion],
        &params,
    )?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
