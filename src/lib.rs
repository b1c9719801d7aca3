//! Face Pulse Library
//!
//! Contact-free pulse rate estimation from face-region video frames
//! (remote photoplethysmography, rPPG). Consumes cropped RGB frames
//! from a capture collaborator and produces beat events and a
//! confidence-tiered BPM estimate.
//!
//! # Architecture
//!
//! The system follows an explicit per-frame data flow:
//!
//! ```text
//! capture → motion accumulation → pulse reduction → beat detection → BPM clustering
//!                 ↓                      ↓                 ↓                ↓
//!                        presentation surface (read between ticks)
//! ```
//!
//! # Design Principles
//!
//! - **Motion-gated**: frames dominated by gross motion (head turns,
//!   camera shake) contribute exactly zero pulse signal
//! - **Policy, not faults**: implausible samples and refractory
//!   violations are rejected with retained reasons, never raised
//! - **Single-threaded, frame-driven**: one tick per frame runs the
//!   whole chain in strict sequence; state is read between ticks
//! - **No clinical claims**: estimates are best-effort, not medical
//!
//! # Example
//!
//! ```no_run
//! use face_pulse::{
//!     capture::{CaptureConfig, FrameSource, MockFaceCamera, PulseConfig},
//!     pipeline::PulsePipeline,
//! };
//!
//! let capture = CaptureConfig::default();
//! let mut camera = MockFaceCamera::new();
//! camera.open(&capture).unwrap();
//!
//! let mut pipeline = PulsePipeline::new(&capture, &PulseConfig::default()).unwrap();
//!
//! // Drive the pipeline one frame at a time.
//! for _ in 0..300 {
//!     let frame = camera.capture().unwrap();
//!     if let Some(beat) = pipeline.tick(frame).beat {
//!         println!("beat at {:.2} s", beat.timestamp);
//!     }
//! }
//!
//! if let Some(report) = pipeline.report() {
//!     println!("{report}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod cluster;
pub mod detect;
pub mod metrics;
pub mod motion;
pub mod pipeline;
pub mod signal;

// Re-export commonly used types at crate root
pub use capture::{CaptureConfig, FrameBuffer, FrameSource, MockFaceCamera, PulseConfig};
pub use cluster::{BpmReport, Confidence, Pattern, PatternClusterer};
pub use detect::{BeatDetector, BeatEvent, SampleRejection};
pub use motion::{AccumulationMap, MotionAccumulator};
pub use pipeline::{FrameAnnotation, PulsePipeline, TickResult};
pub use signal::{PulseHistory, PulseReducer, PulseSample};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
