//! # stagehand
//!
//! A scene-graph and CSS-themed control toolkit for 2D game clients.
//!
//! stagehand keeps two parallel retained trees in sync: a 2D display scene
//! graph rendered through an opaque drawing backend, and a control tree
//! bound one-to-one to native document elements with CSS-driven theming.
//! Both trees share one arena, one path grammar, and one mutation contract.
//!
//! ## Core Systems
//!
//! - **[`tree`]** — Slotmap-backed ordered tree arena with path resolution
//! - **[`display`]** — Display objects and the stage: fit modes, attach
//!   lifecycle, recursive bottom-up rendering
//! - **[`render`]** — The opaque drawing boundary ([`render::RenderBackend`])
//! - **[`ui`]** — Control tree, theme cascade, focus neighbors, native event
//!   dispatch, and the document boundary ([`ui::native::NativeBackend`])
//! - **[`input`]** — Logical input actions resolved against live key state
//! - **[`event`]** — Listener registries used by controls and loaders
//! - **[`ticker`]** — Fixed-period tick pacing for game loops
//! - **[`loader`]** — Image preloading with progress events
//! - **[`physics`]** — Minimal rigid-body shell (no solver)
//! - **[`testing`]** — Headless document and recording renderer
//! - **[`geometry`]** — The `Vector` primitive and angle conversions

// Foundation
pub mod geometry;
pub mod tree;

// Events and input
pub mod event;
pub mod input;

// Rendering
pub mod display;
pub mod render;

// User interface
pub mod ui;

// Utilities
pub mod loader;
pub mod ticker;

// Physics
pub mod physics;

// Testing doubles
pub mod testing;
