//! Desktop shell seam
//!
//! The desktop shell owns update checks and the native window theme. The
//! service only calls through this trait.

use halcyon_core::ThemeMode;

/// Calls into the desktop shell
pub trait ShellBridge: Send + Sync {
    /// Newer release available, if any
    fn check_for_update(&self) -> Option<String>;

    /// Apply the theme to native window chrome
    fn set_native_theme(&self, theme: ThemeMode);
}

/// Shell that does nothing, for headless use
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopShell;

impl ShellBridge for NoopShell {
    fn check_for_update(&self) -> Option<String> {
        None
    }

    fn set_native_theme(&self, theme: ThemeMode) {
        tracing::debug!("Native theme {:?} ignored (no shell)", theme);
    }
}
