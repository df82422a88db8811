//! MSI installer builder library.
//!
//! Turns a prebuilt Windows application directory into a WiX source
//! document and, with the WiX Toolset installed, into a signed `.msi`.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
