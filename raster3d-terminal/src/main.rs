/// raster3d terminal renderer
///
/// Spins a mesh in the terminal using the software pipeline.
/// Controls:
///   - W/S: Move forward/backward
///   - A/D: Move left/right
///   - Space/C: Move up/down
///   - Q/ESC: Quit
use clap::Parser;
use log::info;
use raster3d_core::RenderMode;
use raster3d_terminal::{render_to_ppm, AppConfig, AppError, TerminalApp};
use std::path::PathBuf;

/// raster3d - software 3D rendering in the terminal
#[derive(Parser, Debug)]
#[command(name = "raster3d-terminal")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// OBJ file to render instead of the configured scene
    #[arg(short, long)]
    mesh: Option<PathBuf>,

    /// Directory holding default.toml and user.toml
    #[arg(short, long, default_value = "config")]
    config: PathBuf,

    /// Draw triangle edges only
    #[arg(short, long)]
    wireframe: bool,

    /// Render to a PPM image instead of the terminal
    #[arg(long, value_name = "FILE")]
    ppm: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("raster3d: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let mut config = AppConfig::load_from(&args.config)?;
    if args.mesh.is_some() {
        config.scene.mesh = args.mesh;
    }
    if args.wireframe {
        config.render.mode = RenderMode::Wireframe;
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();

    let mesh = config.scene.build_mesh()?;
    info!("scene ready: {} triangles", mesh.len());

    match args.ppm {
        Some(path) => {
            let stats = render_to_ppm(&mut [mesh], &config, args.frames.unwrap_or(1), &path)?;
            info!("{} triangles drawn, {} culled", stats.drawn, stats.culled);
        }
        None => {
            let mut app = TerminalApp::new(vec![mesh], &config)?.with_frame_limit(args.frames);
            app.run()?;
        }
    }
    Ok(())
}
