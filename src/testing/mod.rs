//! Headless testing doubles for the native and drawing boundaries.
//!
//! [`HeadlessDocument`] is an in-memory [`NativeBackend`](crate::ui::native::NativeBackend)
//! with an op log for asserting side-effect ordering; [`RecordingRenderer`]
//! is a [`RenderBackend`](crate::render::RenderBackend) that records every
//! drawing call instead of rasterizing.

pub mod headless;
pub mod recording;

pub use headless::{ElementRecord, HeadlessDocument};
pub use recording::{RecordingRenderer, RenderOp};
