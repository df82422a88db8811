//! Configuration structures for bundling operations.
//!
//! This module provides the configuration types for MSI authoring: package
//! metadata, Windows signing and installer options, and a builder that
//! assembles them into [`Settings`].

mod arch;
mod builder;
mod core;
mod package;
mod windows;

// Re-export all public types
pub use arch::Arch;
pub use builder::SettingsBuilder;
pub use self::core::Settings;
pub use package::PackageSettings;
pub use windows::{
    AutoLaunchSettings, FeatureSettings, InstallMode, MsiSettings, UiImages, UiOptions,
    UiSettings, WindowsSettings,
};
