/// Terminal front end: drives a scene frame by frame and rasterizes it
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use glmat_core::{Mesh, ProjectionMode, Scene, SceneParams};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Radians per key press.
const ROTATE_STEP: f32 = 0.1;
/// World units per key press along Z.
const MOVE_STEP: f32 = 10.0;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    mesh: Mesh,
    scene: Scene,
    renderer: AsciiRenderer,
    running: bool,
    started: Instant,
    status: Option<String>,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, params: SceneParams) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(mesh, params, width, height))
    }

    /// Build the app for a fixed-size surface. The top row is reserved
    /// for the status line.
    pub fn with_size(mesh: Mesh, params: SceneParams, width: u16, height: u16) -> Self {
        Self {
            mesh,
            scene: Scene::new(params),
            renderer: AsciiRenderer::new(width as usize, height.saturating_sub(1) as usize),
            running: true,
            started: Instant::now(),
            status: None,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        info!(
            width = self.renderer.width(),
            height = self.renderer.height(),
            triangles = self.mesh.triangles.len(),
            "terminal renderer started"
        );

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;
        info!("terminal renderer stopped");

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
            self.scene.tick(now_ms);

            self.render()?;

            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                debug!(width, height, "terminal resized");
                self.renderer = AsciiRenderer::new(width as usize, height.saturating_sub(1) as usize);
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        let params = &mut self.scene.params;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => params.rotate(ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => params.rotate(-ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => params.rotate(0.0, -ROTATE_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => params.rotate(0.0, ROTATE_STEP, 0.0),
            KeyCode::Char('e') => params.rotate(0.0, 0.0, ROTATE_STEP),
            KeyCode::Char('r') => params.rotate(0.0, 0.0, -ROTATE_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => params.translate(0.0, 0.0, MOVE_STEP),
            KeyCode::Char('-') => params.translate(0.0, 0.0, -MOVE_STEP),
            KeyCode::Char(' ') => params.animate = !params.animate,
            KeyCode::Char('c') => params.toggle_camera(),
            KeyCode::Char('[') => {
                if let Some(camera) = params.camera.as_mut() {
                    camera.rotate(-ROTATE_STEP);
                }
            }
            KeyCode::Char(']') => {
                if let Some(camera) = params.camera.as_mut() {
                    camera.rotate(ROTATE_STEP);
                }
            }
            KeyCode::Char('p') => {
                let mode = match params.lens.mode {
                    ProjectionMode::Perspective => ProjectionMode::Orthographic,
                    ProjectionMode::Orthographic => ProjectionMode::Perspective,
                };
                params.set_projection_mode(mode);
            }
            _ => {}
        }
    }

    /// Rasterize the current frame into the renderer's buffers.
    pub fn draw_frame(&mut self) {
        self.renderer.clear();

        match self.scene.frame_matrix(self.renderer.aspect()) {
            Ok(frame) => {
                let model = self.scene.params.model_matrix();
                self.renderer.render_mesh(&self.mesh, &model, &frame);
                self.status = None;
            }
            Err(err) => {
                // Leave the frame blank until the parameters are usable again.
                if self.status.is_none() {
                    warn!(error = %err, "skipping frame");
                }
                self.status = Some(err.to_string());
            }
        }
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    fn render(&mut self) -> io::Result<()> {
        self.draw_frame();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let params = &self.scene.params;
        let line = match &self.status {
            Some(error) => format!("glmat | {error}"),
            None => format!(
                "glmat | FPS: {:.1} | rot {:.2} {:.2} {:.2} | z {:.0} | {:?}{} | WASD/Arrows/E/R rotate, +/- move, Space spin, C camera, P projection, Q quit",
                self.scene.fps(),
                params.angle_x,
                params.angle_y,
                params.angle_z,
                params.z,
                params.lens.mode,
                if params.camera.is_some() { " + orbit camera" } else { "" },
            ),
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(line),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> TerminalApp {
        TerminalApp::with_size(Mesh::letter_f(), SceneParams::default(), 80, 25)
    }

    #[test]
    fn test_keys_update_scene() {
        let mut app = app();
        let before = app.scene().params;

        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Char('e'));
        app.handle_key(KeyCode::Char('-'));
        app.handle_key(KeyCode::Char(' '));

        let after = app.scene().params;
        assert!((after.angle_x - before.angle_x - ROTATE_STEP).abs() < 1e-6);
        assert!((after.angle_z - before.angle_z - ROTATE_STEP).abs() < 1e-6);
        assert_eq!(after.z, before.z - MOVE_STEP);
        assert_eq!(after.animate, !before.animate);
    }

    #[test]
    fn test_camera_and_projection_toggles() {
        let mut app = app();
        app.handle_key(KeyCode::Char('c'));
        app.handle_key(KeyCode::Char(']'));
        let camera = app.scene().params.camera.unwrap();
        assert!((camera.angle - ROTATE_STEP).abs() < 1e-6);

        app.handle_key(KeyCode::Char('p'));
        assert_eq!(app.scene().params.lens.mode, ProjectionMode::Orthographic);
    }

    #[test]
    fn test_quit_key_stops_loop() {
        let mut app = app();
        app.handle_key(KeyCode::Char('q'));
        assert!(!app.is_running());
    }

    #[test]
    fn test_draw_frame_renders_default_scene() {
        let mut app = app();
        app.draw_frame();
        assert!(app.renderer().covered() > 0);
        assert!(app.status.is_none());
    }

    #[test]
    fn test_invalid_projection_blanks_frame() {
        let mut params = SceneParams::default();
        params.lens.fov = 0.0;
        let mut app = TerminalApp::with_size(Mesh::letter_f(), params, 80, 25);
        app.draw_frame();
        assert_eq!(app.renderer().covered(), 0);
        assert!(app.status.as_deref().unwrap_or_default().contains("fov"));
    }

    #[test]
    fn test_bundled_scenes_render() {
        for text in [
            include_str!("../scenes/orbit.params"),
            include_str!("../scenes/flipped.params"),
        ] {
            let params: SceneParams = text.parse().unwrap();
            let mut app = TerminalApp::with_size(Mesh::letter_f(), params, 80, 25);
            app.draw_frame();
            assert!(app.renderer().covered() > 0);
        }
    }

    #[test]
    fn test_resize_rebuilds_renderer() {
        let mut app = app();
        app.handle_event(Event::Resize(120, 41));
        assert_eq!(app.renderer().width(), 120);
        assert_eq!(app.renderer().height(), 40);
    }
}
