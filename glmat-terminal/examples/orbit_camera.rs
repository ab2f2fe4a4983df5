/// Example: orbit a camera around a cube instead of spinning the model
///
/// Usage: cargo run --example orbit_camera -- [radius]
use glmat_core::{Mesh, OrbitCamera, SceneParams};
use glmat_terminal::TerminalApp;
use std::env;
use std::io;

fn main() -> io::Result<()> {
    let radius = env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<f32>().ok())
        .unwrap_or(300.0);

    let params = SceneParams {
        angle_x: 0.0,
        angle_y: 0.0,
        angle_z: 0.0,
        animate: false,
        camera: Some(OrbitCamera::new(0.0, radius)),
        ..SceneParams::default()
    };

    println!("Orbit radius {radius}; use [ and ] to circle the cube, Q to quit");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(Mesh::cube(100.0), params)?;
    app.run()
}
