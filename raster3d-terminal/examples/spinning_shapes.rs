/// Example: a cube and a cut pyramid spinning side by side
///
/// Usage: cargo run --example spinning_shapes
use raster3d_core::{Mesh, Pose, RotationState};
use raster3d_terminal::{AppConfig, AppError, TerminalApp};

fn main() -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let cube = Mesh::cube(2.0).with_pose(Pose {
        position: [100.0, 0.0, -400.0],
        angular_velocity: RotationState::new(0.0, 1.0, 1.0),
        scale: 25.0,
        ..Pose::default()
    });
    let pyramid = Mesh::cut_pyramid().with_pose(Pose {
        position: [-100.0, 0.0, -400.0],
        angular_velocity: RotationState::new(0.0, 1.0, 0.0),
        scale: 50.0,
        ..Pose::default()
    });

    let mut app = TerminalApp::new(vec![cube, pyramid], &config)?;
    app.run()
}
