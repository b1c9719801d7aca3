//! Face Pulse CLI
//!
//! Command-line demonstration of the pulse estimation pipeline using
//! the synthetic mock camera as its frame source.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use face_pulse::{
    capture::{FileConfig, FrameSource, MockFaceCamera},
    pipeline::PulsePipeline,
};

#[derive(Parser, Debug)]
#[command(name = "face-pulse", version, about = "rPPG pulse estimation demo")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to process (overrides the config file).
    #[arg(short = 'n', long)]
    frames: Option<u32>,

    /// Keep processing frames until interrupted.
    #[arg(long)]
    continuous: bool,

    /// Simulated heart rate of the mock camera in BPM.
    #[arg(long, default_value_t = 75.0)]
    bpm: f64,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Face Pulse v{}", face_pulse::VERSION);
    info!("This is a demonstration using mock camera input");

    let config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };

    let mut camera = MockFaceCamera::with_bpm(args.bpm);
    if let Err(e) = camera.open(&config.capture) {
        eprintln!("Failed to open camera: {}", e);
        std::process::exit(1);
    }

    let mut pipeline = match PulsePipeline::new(&config.capture, &config.pulse) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Invalid pipeline configuration: {}", e);
            std::process::exit(1);
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    let continuous = args.continuous || config.output.continuous;
    if continuous {
        let running = Arc::clone(&running);
        if let Err(e) = ctrlc::set_handler(move || running.store(false, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    }

    let frame_count = args.frames.unwrap_or(config.output.frame_count);
    let frame_pacing = std::time::Duration::from_secs(1) / config.capture.fps;

    info!("Processing frames...");

    let mut processed = 0u32;
    while running.load(Ordering::SeqCst) && (continuous || processed < frame_count) {
        let frame = match camera.capture() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Frame capture failed: {}", e);
                continue;
            }
        };

        let result = pipeline.tick(frame);
        if let Some(beat) = result.beat {
            match beat.interval {
                Some(interval) => info!(
                    "beat at {:.2} s (interval {:.3} s)",
                    beat.timestamp, interval
                ),
                None => info!("beat at {:.2} s", beat.timestamp),
            }
            if let Some(report) = pipeline.report() {
                info!("current estimate: {}", report);
            }
        }

        processed += 1;
        if continuous {
            std::thread::sleep(frame_pacing);
        }
    }

    info!(
        "Processed {} frames: {} beats confirmed",
        processed,
        pipeline.beats().len()
    );

    match pipeline.report() {
        Some(report) => {
            println!("Estimated pulse: {}", report);
            for pattern in pipeline.patterns() {
                println!(
                    "  {:<10} count={:<3} mean={:.3}s spread={:.3}s",
                    pattern.name(),
                    pattern.count(),
                    pattern.mean_ibi(),
                    pattern.variability()
                );
            }
        }
        None => println!("No pulse detected."),
    }
}
