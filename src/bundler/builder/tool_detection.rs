//! External tool detection.

use crate::bundler::msi::{find_version, locate};
use std::sync::LazyLock;

/// Whether candle and light are both available.
///
/// Cached result to avoid repeated lookups and subprocess calls.
pub static HAS_WIX: LazyLock<bool> = LazyLock::new(|| {
    let (Some(candle), Some(light)) = (locate("candle"), locate("light")) else {
        log::debug!("candle or light not found on PATH or under $WIX/bin");
        return false;
    };

    match std::process::Command::new(&candle).arg("-?").output() {
        Ok(output) => {
            let banner = String::from_utf8_lossy(&output.stdout);
            log::debug!(
                "Found candle at {} and light at {} (version {})",
                candle.display(),
                light.display(),
                find_version(&banner).as_deref().unwrap_or("unknown")
            );
            true
        }
        Err(e) => {
            log::warn!(
                "candle found at {} but failed to execute: {}. Check file permissions.",
                candle.display(),
                e
            );
            false
        }
    }
});
