//! Error types for bundling operations.
//!
//! Every failure in the MSI pipeline surfaces as an [`Error`]. Filesystem
//! failures carry the path and the operation that was attempted, external
//! tool failures carry the exit code and captured output.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Result alias for bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while authoring, compiling or signing an installer.
#[derive(Error, Debug)]
pub enum Error {
    /// Free-form error with a message.
    #[error("{0}")]
    GenericError(String),

    /// Raw IO error without additional context.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// IO error annotated with the operation and path involved.
    #[error("{context} ({}): {error}", path.display())]
    Fs {
        /// What was being done when the error happened
        context: String,
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying error
        error: std::io::Error,
    },

    /// Spawning an external command failed.
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Command name
        command: String,
        /// Underlying spawn error
        error: std::io::Error,
    },

    /// Architecture not representable in a Windows Installer package.
    #[error("architecture error: {0}")]
    ArchError(String),

    /// The version string cannot be turned into a Windows Installer version.
    #[error("could not parse semantic version input string `{0}`")]
    InvalidVersion(String),

    /// The tree handed to the populator or compiler is structurally invalid.
    #[error("malformed installation tree: {0}")]
    MalformedTree(String),

    /// The authored fragment and the emitted references disagree.
    #[error("authored {components} components but emitted {references} component references")]
    ComponentMismatch {
        /// Number of `</Component>` closings in the directory fragment
        components: usize,
        /// Number of references across all features
        references: usize,
    },

    /// Two registry entries share an id.
    #[error("duplicate registry component id `{0}`")]
    DuplicateRegistryId(String),

    /// WiX toolset binaries are not installed.
    #[error("could not find light.exe or candle.exe")]
    WixNotFound,

    /// `candle` or `light` ran but did not produce its output.
    #[error("could not create {stage} file. Code: {code} StdErr: {stderr} StdOut: {stdout}")]
    CompileFailed {
        /// Output kind (`wixobj` or `msi`)
        stage: String,
        /// Exit code, `-1` when terminated by a signal
        code: i32,
        /// Captured standard error
        stderr: String,
        /// Captured standard output
        stdout: String,
    },

    /// The signing tool exited unsuccessfully.
    #[error("{tool} exited with code {code}. Stderr: {stderr}. Stdout: {stdout}")]
    SignFailed {
        /// Signing tool name
        tool: String,
        /// Exit code
        code: i32,
        /// Captured standard error
        stderr: String,
        /// Captured standard output
        stdout: String,
    },

    /// Handlebars template registration failed.
    #[error("template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    /// Handlebars rendering failed.
    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Directory traversal failed.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Adds path context to filesystem results.
pub trait ErrorExt<T> {
    /// Wraps an IO error with the operation being performed and its path.
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Attaches a message to a failure or a missing value.
pub trait Context<T> {
    /// Converts into a bundler result, prefixing the message.
    fn context<C: Display>(self, context: C) -> Result<T>;
}

impl<T, E: Display> Context<T> for std::result::Result<T, E> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

impl From<handlebars::TemplateError> for Error {
    fn from(error: handlebars::TemplateError) -> Self {
        Error::Template(Box::new(error))
    }
}

/// Returns early with a formatted [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
