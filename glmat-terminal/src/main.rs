/// glmat Terminal Demo - the WebGL "F" scene rendered as ASCII
///
/// Controls:
///   - WASD / Arrow Keys: Rotate about X / Y
///   - E/R: Rotate about Z
///   - +/-: Move along Z
///   - Space: Toggle the Y spin
///   - C, [ and ]: Toggle and orbit the camera
///   - P: Switch perspective / orthographic
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glmat_core::{Mesh, SceneParams};
use glmat_terminal::TerminalApp;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glmat-terminal")]
#[command(author, version, about = "Render the WebGL transform demos in a terminal")]
struct Cli {
    /// Scene parameter file (`name = value` per line)
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Geometry to draw
    #[arg(short, long, value_enum, default_value_t = MeshKind::F)]
    mesh: MeshKind,

    /// Print the combined frame matrix for this aspect ratio and exit
    #[arg(long, value_name = "ASPECT")]
    print_matrix: Option<f32>,

    /// Log file (the terminal itself is taken by the renderer)
    #[arg(long, default_value = "glmat-terminal.log")]
    log_file: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum MeshKind {
    /// The extruded letter F
    F,
    /// A colour cube
    Cube,
}

impl MeshKind {
    fn build(self) -> Mesh {
        match self {
            MeshKind::F => Mesh::letter_f(),
            MeshKind::Cube => Mesh::cube(100.0),
        }
    }
}

fn init_logging(path: &Path, verbose: bool) -> Result<WorkerGuard> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file = path
        .file_name()
        .with_context(|| format!("log path {} has no file name", path.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file));
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(&cli.log_file, cli.verbose)?;

    let params = match &cli.params {
        Some(path) => SceneParams::load(path)
            .with_context(|| format!("Failed to load scene parameters from {}", path.display()))?,
        None => SceneParams::default(),
    };

    if let Some(aspect) = cli.print_matrix {
        let matrix = params
            .frame_matrix(aspect)
            .context("Failed to build frame matrix")?;
        for row in matrix.as_slice().chunks(4) {
            println!("{:>12.6} {:>12.6} {:>12.6} {:>12.6}", row[0], row[1], row[2], row[3]);
        }
        return Ok(());
    }

    let mesh = cli.mesh.build();
    info!(triangles = mesh.triangles.len(), "starting terminal renderer");
    println!("glmat terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_millis(500));

    let mut app = TerminalApp::new(mesh, params)?;
    app.run()?;

    println!("Thank you for using the glmat terminal renderer!");
    Ok(())
}
