/// Terminal front end for the raster3d software renderer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, info};
use raster3d_core::{
    Camera, FrameStats, LoadError, MathError, Mesh, PixelCanvas, Renderer, Surface, Vector3D,
};
use std::fs::File;
use std::io::{self, stdout, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

pub mod config;
pub mod renderer;

pub use config::{AppConfig, ConfigError};
pub use renderer::AsciiRenderer;

/// Anything that can stop the application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to load mesh: {0}")]
    Load(#[from] LoadError),
    #[error("invalid camera: {0}")]
    Camera(#[from] MathError),
}

/// Camera displacement for a movement key, or `None` for any other key
pub fn key_motion(code: KeyCode, step: f64) -> Option<Vector3D> {
    let KeyCode::Char(c) = code else {
        return None;
    };
    let (x, y, z) = match c.to_ascii_lowercase() {
        'w' => (0.0, 0.0, -step),
        's' => (0.0, 0.0, step),
        'a' => (-step, 0.0, 0.0),
        'd' => (step, 0.0, 0.0),
        ' ' => (0.0, step, 0.0),
        'c' => (0.0, -step, 0.0),
        _ => return None,
    };
    Some(Vector3D::direction(x, y, z))
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    meshes: Vec<Mesh>,
    camera: Camera,
    renderer: Renderer,
    output: AsciiRenderer,
    step: f64,
    frame_time: Duration,
    show_status: bool,
    frame_limit: Option<u64>,
    frames_drawn: u64,
    stats: FrameStats,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Size the canvas to the current terminal
    pub fn new(meshes: Vec<Mesh>, config: &AppConfig) -> Result<Self, AppError> {
        let (width, height) = terminal::size()?;
        Self::with_size(meshes, config, width, height)
    }

    pub fn with_size(
        meshes: Vec<Mesh>,
        config: &AppConfig,
        width: u16,
        height: u16,
    ) -> Result<Self, AppError> {
        let (width, height) = (width.max(1), height.max(1));
        let camera = config.camera.build(width as f64 / height as f64)?;

        Ok(Self {
            meshes,
            camera,
            renderer: config.render.renderer(),
            output: AsciiRenderer::new(width as usize, height as usize),
            step: config.input.step,
            frame_time: Duration::from_millis(config.render.frame_time_ms),
            show_status: config.debug.show_status,
            frame_limit: None,
            frames_drawn: 0,
            stats: FrameStats::default(),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    /// Stop after `frames` frames; `None` runs until quit
    pub fn with_frame_limit(mut self, frames: Option<u64>) -> Self {
        self.frame_limit = frames;
        self
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn output(&self) -> &AsciiRenderer {
        &self.output
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        info!("stopped after {} frames", self.frames_drawn);
        result
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                    if kind != KeyEventKind::Release {
                        self.handle_key(code)?;
                    }
                }
            }

            let (width, height) = terminal::size()?;
            self.resize(width, height)?;

            self.render()?;

            if self.frame_limit.is_some_and(|limit| self.frames_drawn >= limit) {
                self.running = false;
            }

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Apply one key press: movement keys move the camera, Q/Esc quit
    pub fn handle_key(&mut self, code: KeyCode) -> Result<(), MathError> {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.running = false;
            }
            _ => {
                if let Some(delta) = key_motion(code, self.step) {
                    self.camera.move_by(delta)?;
                }
            }
        }
        Ok(())
    }

    /// Follow a terminal size change: new canvas size and aspect ratio
    pub fn resize(&mut self, width: u16, height: u16) -> Result<(), MathError> {
        let (width, height) = (width as usize, height as usize);
        if width == 0 || height == 0 || (width, height) == (self.output.width(), self.output.height()) {
            return Ok(());
        }
        debug!("terminal resized to {}x{}", width, height);
        self.camera.set_aspect_ratio(width as f64 / height as f64)?;
        self.output.resize(width, height);
        Ok(())
    }

    /// Clear the canvas and draw every mesh once, advancing their poses
    pub fn render_frame(&mut self) -> FrameStats {
        self.output.clear();
        let mut stats = FrameStats::default();
        for mesh in &mut self.meshes {
            stats += self.renderer.draw(mesh, &self.camera, self.output.canvas_mut());
        }
        self.frames_drawn += 1;
        self.stats = stats;
        stats
    }

    fn render(&mut self) -> io::Result<()> {
        self.render_frame();

        let mut stdout = stdout();
        self.output.draw(&mut stdout)?;

        if self.show_status {
            let status: String = self.status_line().chars().take(self.output.width()).collect();
            queue!(
                stdout,
                cursor::MoveTo(0, 0),
                SetForegroundColor(Color::Yellow),
                Print(status),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn status_line(&self) -> String {
        let eye = self.camera.eye();
        format!(
            "raster3d | FPS: {:.1} | drawn {} culled {} | eye ({:.0}, {:.0}, {:.0}) | WASD move, Space/C up/down, Q quit",
            self.fps, self.stats.drawn, self.stats.culled, eye.x, eye.y, eye.z
        )
    }
}

/// Render `frames` frames off-screen and write the last one as a PPM image
pub fn render_to_ppm<P: AsRef<Path>>(
    meshes: &mut [Mesh],
    config: &AppConfig,
    frames: u64,
    path: P,
) -> Result<FrameStats, AppError> {
    let (width, height) = (config.render.image_width.max(1), config.render.image_height.max(1));
    let camera = config.camera.build(width as f64 / height as f64)?;
    let mut renderer = config.render.renderer();
    let mut canvas = PixelCanvas::new(width, height);

    let mut stats = FrameStats::default();
    for _ in 0..frames.max(1) {
        canvas.clear();
        stats = FrameStats::default();
        for mesh in meshes.iter_mut() {
            stats += renderer.draw(mesh, &camera, &mut canvas);
        }
    }

    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    canvas.write_ppm(&mut writer)?;
    writer.flush()?;
    info!("wrote {}x{} image to {}", width, height, path.display());
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster3d_core::CharCanvas;

    fn app() -> TerminalApp {
        let config = AppConfig::default();
        let mesh = config.scene.build_mesh().unwrap();
        TerminalApp::with_size(vec![mesh], &config, 80, 24).unwrap()
    }

    #[test]
    fn test_key_motion() {
        assert_eq!(key_motion(KeyCode::Char('w'), 2.0), Some(Vector3D::direction(0.0, 0.0, -2.0)));
        assert_eq!(key_motion(KeyCode::Char('D'), 1.0), Some(Vector3D::direction(1.0, 0.0, 0.0)));
        assert_eq!(key_motion(KeyCode::Char(' '), 2.0), Some(Vector3D::direction(0.0, 2.0, 0.0)));
        assert_eq!(key_motion(KeyCode::Char('c'), 2.0), Some(Vector3D::direction(0.0, -2.0, 0.0)));
        assert_eq!(key_motion(KeyCode::Char('x'), 2.0), None);
        assert_eq!(key_motion(KeyCode::Up, 2.0), None);
    }

    #[test]
    fn test_keys_move_camera_and_keep_direction() {
        let mut app = app();
        app.handle_key(KeyCode::Char('w')).unwrap();
        app.handle_key(KeyCode::Char('w')).unwrap();
        app.handle_key(KeyCode::Char('d')).unwrap();

        assert_eq!(app.camera().eye(), Vector3D::new(2.0, 0.0, -4.0));
        assert_eq!(app.camera().target(), Vector3D::new(2.0, 0.0, -5.0));
        assert!(app.is_running());

        app.handle_key(KeyCode::Esc).unwrap();
        assert!(!app.is_running());
    }

    #[test]
    fn test_resize_updates_canvas_and_aspect() {
        let mut app = app();
        assert_eq!(app.camera().frustum().aspect, 80.0 / 24.0);

        app.resize(100, 50).unwrap();
        assert_eq!((app.output().width(), app.output().height()), (100, 50));
        assert_eq!(app.camera().frustum().aspect, 2.0);

        // A collapsed terminal keeps the last usable size
        app.resize(0, 50).unwrap();
        assert_eq!(app.output().width(), 100);
    }

    #[test]
    fn test_render_frame_draws_and_advances() {
        let mut app = app();
        let stats = app.render_frame();

        assert_eq!(stats.total(), 12);
        assert!(stats.drawn > 0);
        let canvas: &CharCanvas = app.output().canvas();
        assert!(canvas.rows().flatten().any(|&c| c != CharCanvas::BLANK));
        assert_eq!(app.meshes()[0].pose.rotation.y, 0.3);
    }

    #[test]
    fn test_render_to_ppm() {
        let mut config = AppConfig::default();
        config.render.image_width = 40;
        config.render.image_height = 30;
        let mut meshes = vec![config.scene.build_mesh().unwrap()];
        let path = std::env::temp_dir().join(format!("raster3d-frame-{}.ppm", std::process::id()));

        let stats = render_to_ppm(&mut meshes, &config, 3, &path).unwrap();
        assert!(stats.drawn > 0);
        assert!((meshes[0].pose.rotation.y - 0.9).abs() < 1e-12);

        let header = b"P6\n40 30\n255\n".len();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6\n40 30\n255\n"));
        assert_eq!(bytes.len(), header + 40 * 30 * 3);
        // Each frame starts from a cleared canvas: corners stay background
        assert_eq!(&bytes[header..header + 3], &[0, 0, 0]);
        assert_eq!(&bytes[bytes.len() - 3..], &[0, 0, 0]);
        assert!(bytes[header..].iter().any(|&b| b != 0));
        std::fs::remove_file(&path).unwrap();
    }
}
