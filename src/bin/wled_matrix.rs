//! Push a screenshot (or a corner test pattern) to a 64x16 WLED matrix.
//!
//! Run with: `wled-matrix --host 10.0.0.221 --image screenshot.png --loop`

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;
use log::{error, info, warn};
use wled_matrix::image_input::{load_png, show_image};
use wled_matrix::to_png::write_frame_png;
use wled_matrix::transport::{DryRun, Transport};
use wled_matrix::{WledConfig, WledMatrix};

const PREVIEW_MAX_DIMENSION: u32 = 640;

#[derive(Parser)]
#[command(name = "wled-matrix")]
#[command(about = "Show a PNG on a 64x16 WLED matrix", long_about = None)]
struct Cli {
    /// WLED controller address, optionally with :port
    #[arg(long, env = "WLED_HOST", default_value = WledConfig::DEFAULT_HOST)]
    host: String,
    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,
    /// PNG to display; shows the corner test pattern when omitted
    #[arg(long)]
    image: Option<PathBuf>,
    /// Keep re-reading and re-sending the image until interrupted
    #[arg(short = 'l', long = "loop")]
    repeat: bool,
    /// Send once and exit (the default)
    #[arg(short, long, conflicts_with = "repeat")]
    once: bool,
    /// Seconds between refreshes in loop mode
    #[arg(short, long, default_value_t = 1.0)]
    interval: f64,
    /// Also write a preview PNG of the frame
    #[arg(long)]
    preview: Option<PathBuf>,
    /// Build the frame but do not contact the controller
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let Ok(interval) = Duration::try_from_secs_f64(cli.interval) else {
        error!("--interval must be a non-negative number of seconds");
        return ExitCode::FAILURE;
    };
    let config = WledConfig::new(&cli.host).with_timeout(Duration::from_millis(cli.timeout_ms));

    if cli.dry_run {
        run(&cli, WledMatrix::with_transport(DryRun), interval)
    } else {
        info!("sending to {}", config.json_url());
        run(&cli, WledMatrix::new(&config), interval)
    }
}

fn run<T: Transport>(cli: &Cli, mut matrix: WledMatrix<T>, interval: Duration) -> ExitCode {
    if cli.once || !cli.repeat {
        return if refresh(cli, &mut matrix) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    info!(
        "refreshing every {:.1}s; press Ctrl+C to stop",
        interval.as_secs_f64()
    );
    loop {
        if !refresh(cli, &mut matrix) {
            warn!("refresh failed; retrying next cycle");
        }
        thread::sleep(interval);
    }
}

fn refresh<T: Transport>(cli: &Cli, matrix: &mut WledMatrix<T>) -> bool {
    let sent = match &cli.image {
        Some(path) => match load_png(path) {
            Ok(image) => show_image(matrix, &image),
            Err(err) => {
                error!("could not load {}: {err}", path.display());
                return false;
            }
        },
        None => show_corners(matrix),
    };
    if let Some(preview) = &cli.preview {
        write_preview(matrix, preview);
    }
    sent
}

fn show_corners<T: Transport>(matrix: &mut WledMatrix<T>) -> bool {
    matrix.clear(true);
    matrix.set_pixel(0, 0, 255, 0, 0);
    matrix.set_pixel(63, 0, 0, 255, 0);
    matrix.set_pixel(0, 15, 0, 0, 255);
    matrix.set_pixel(63, 15, 255, 255, 0);
    matrix.show()
}

fn write_preview<T: Transport>(matrix: &WledMatrix<T>, path: &Path) {
    if let Err(err) = write_frame_png(matrix.frame(), path, PREVIEW_MAX_DIMENSION) {
        warn!("could not write preview {}: {err}", path.display());
    }
}
