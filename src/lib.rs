// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Interactive 3D scene viewer built on wgpu, with orbit and fly cameras and
//! GPU object picking.
//!
//! Every frame is drawn twice: once into the swapchain for display, and once
//! into an `R32Uint` id buffer where each object writes its integer id. The
//! pixel under the pointer is copied into a staging buffer and mapped
//! asynchronously; when the map lands (usually a frame later) the id becomes
//! the hovered object.
//!
//! # Key entry points
//!
//! - [`engine::ViewerEngine`] - scene, input, cameras, and the per-frame
//!   pipeline, generic over a [`renderer::RenderBackend`]
//! - [`input::InputAggregator`] - folds window events into per-frame
//!   [`input::InputSample`]s
//! - [`camera::OrbitCamera`] / [`camera::FlyCamera`] - the two
//!   [`camera::CameraModel`]s, switched at runtime by [`camera::CameraRig`]
//! - [`picking::PickingTarget`] - dual-pass frame orchestration and pick
//!   readback
//! - [`engine::FrameScheduler`] - request-next-frame loop control
//! - [`options::Options`] - TOML configuration
//!
//! With the `viewer` feature, [`Viewer`] opens a winit window around all of
//! the above.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod picking;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use error::ViewerError;
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
