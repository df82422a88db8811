#![allow(dead_code)]

use kodegen_bundler_msi::bundler::{
    Arch, PackageSettings, Settings, SettingsBuilder, WindowsSettings,
};
use std::path::{Path, PathBuf};

/// Directories of the mock Slack application, relative to its root.
pub const MOCK_FOLDERS: &[&str] = &[
    "resources",
    "resources/app.asar.unpacked",
    "resources/app.asar.unpacked/node_modules",
    "resources/app.asar.unpacked/src",
    "locales",
];

/// Files of the mock Slack application, relative to its root.
pub const MOCK_FILES: &[&str] = &[
    "slack.exe",
    "resources/text.txt",
    "resources/app.asar.unpacked/image.png",
    "resources/app.asar.unpacked/node_modules/package.json",
    "resources/app.asar.unpacked/src/package.json",
    "locales/de-DE.json",
    "locales/en-US.json",
];

pub fn join_all(root: &Path, relative: &[&str]) -> Vec<PathBuf> {
    relative.iter().map(|r| root.join(r)).collect()
}

/// Writes the mock application and a stub launcher below `base`.
///
/// Returns `(app_dir, stub)`.
pub fn write_mock_app(base: &Path) -> (PathBuf, PathBuf) {
    let app = base.join("slack");
    for dir in MOCK_FOLDERS {
        std::fs::create_dir_all(app.join(dir)).unwrap();
    }
    for file in MOCK_FILES {
        std::fs::write(app.join(file), b"hello").unwrap();
    }
    let stub = base.join("StubExecutable.exe");
    std::fs::write(&stub, b"MZ").unwrap();
    (app, stub)
}

pub fn package() -> PackageSettings {
    PackageSettings {
        product_name: "Slack".into(),
        version: "1.0.0".into(),
        description: "Slack is the best".into(),
        manufacturer: "Slack Technologies".into(),
        exe: "slack".into(),
        ..Default::default()
    }
}

pub fn settings(app: &Path, out: &Path, windows: WindowsSettings) -> Settings {
    SettingsBuilder::new()
        .app_directory(app)
        .project_out_directory(out)
        .package_settings(package())
        .windows_settings(windows)
        .arch(Arch::X86)
        .build()
        .unwrap()
}

pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
