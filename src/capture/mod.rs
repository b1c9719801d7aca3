//! Frame input and configuration.
//!
//! This module defines the boundary to the capture collaborator: the
//! frame buffer type the core consumes, the trait frame sources
//! implement, and the full configuration surface of the pipeline.

mod camera;
mod config;
mod frame;

pub use camera::{CaptureError, FrameSource, MockFaceCamera};
pub use config::{CaptureConfig, ConfigError, FileConfig, OutputConfig, PulseConfig};
pub use frame::{FrameBuffer, BYTES_PER_PIXEL};
