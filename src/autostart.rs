//! Run-at-login registration
//!
//! Only Windows has a backend (the per-user `Run` registry key). The
//! capability is resolved once at startup so callers ask
//! [`Autostart::is_supported`] instead of checking the platform.

use tracing::info;

/// Errors changing the run-at-login registration
#[derive(Debug, thiserror::Error)]
pub enum AutostartError {
    #[error("start at login is not supported on this platform")]
    Unsupported,

    #[error("failed to locate the running executable: {0}")]
    Executable(#[source] std::io::Error),

    #[error("failed to update the login registration: {0}")]
    Registry(#[source] std::io::Error),
}

/// Run-at-login capability for one app
#[derive(Debug, Clone)]
pub enum Autostart {
    /// Registration is available under the given entry name
    Supported { entry: String },
    /// No backend on this platform
    Unsupported,
}

impl Autostart {
    /// Resolve the capability for the current platform
    pub fn detect(entry: &str) -> Self {
        if cfg!(windows) {
            Self::Supported {
                entry: entry.to_string(),
            }
        } else {
            Self::Unsupported
        }
    }

    /// Check if the menu toggle should be enabled
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Supported { .. })
    }

    /// Menu label for the toggle
    pub fn label(&self) -> &'static str {
        "Start with Windows"
    }

    /// Check if the app is currently registered
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Supported { entry } => backend::is_enabled(entry),
            Self::Unsupported => false,
        }
    }

    /// Register or unregister the app
    pub fn set_enabled(&self, enable: bool) -> Result<(), AutostartError> {
        match self {
            Self::Supported { entry } => {
                backend::set_enabled(entry, enable)?;
                info!(entry = %entry, enable, "start at login updated");
                Ok(())
            }
            Self::Unsupported => Err(AutostartError::Unsupported),
        }
    }
}

#[cfg(windows)]
mod backend {
    use winreg::enums::{HKEY_CURRENT_USER, KEY_READ, KEY_SET_VALUE};
    use winreg::RegKey;

    use super::AutostartError;

    const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";

    pub(super) fn is_enabled(entry: &str) -> bool {
        RegKey::predef(HKEY_CURRENT_USER)
            .open_subkey_with_flags(RUN_KEY, KEY_READ)
            .and_then(|key| key.get_value::<String, _>(entry))
            .is_ok()
    }

    pub(super) fn set_enabled(entry: &str, enable: bool) -> Result<(), AutostartError> {
        let key = RegKey::predef(HKEY_CURRENT_USER)
            .open_subkey_with_flags(RUN_KEY, KEY_READ | KEY_SET_VALUE)
            .map_err(AutostartError::Registry)?;

        if enable {
            let exe = std::env::current_exe().map_err(AutostartError::Executable)?;
            let command = format!("\"{}\"", exe.display());
            key.set_value(entry, &command)
                .map_err(AutostartError::Registry)
        } else {
            match key.delete_value(entry) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(AutostartError::Registry(e)),
            }
        }
    }
}

#[cfg(not(windows))]
mod backend {
    use super::AutostartError;

    pub(super) fn is_enabled(_entry: &str) -> bool {
        false
    }

    pub(super) fn set_enabled(_entry: &str, _enable: bool) -> Result<(), AutostartError> {
        Err(AutostartError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_is_inert() {
        let autostart = Autostart::Unsupported;
        assert!(!autostart.is_supported());
        assert!(!autostart.is_enabled());
        assert!(matches!(
            autostart.set_enabled(true),
            Err(AutostartError::Unsupported)
        ));
    }

    #[test]
    fn test_detect_matches_platform() {
        assert_eq!(Autostart::detect("ChatGPTShortcut").is_supported(), cfg!(windows));
    }
}
