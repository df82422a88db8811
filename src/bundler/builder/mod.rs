//! Bundle orchestration.
//!
//! [`Bundler`] drives the MSI pipeline for one [`Settings`] value and
//! reports the produced installer as a [`BundledArtifact`].
//!
//! - [`checksum`] - SHA-256 of artifacts
//! - [`orchestrator`] - the [`Bundler`] itself
//! - [`tool_detection`] - cached WiX availability
//!
//! [`Settings`]: crate::bundler::Settings
//! [`BundledArtifact`]: crate::bundler::BundledArtifact

pub mod checksum;
mod orchestrator;
pub mod tool_detection;

pub use orchestrator::Bundler;
