//! Platform abstraction layer for cross-platform support.
//!
//! This module defines the `Platform` trait: the OS execution primitive every
//! plugin launches through. Plugins never spawn processes themselves, which
//! keeps them testable with a recording implementation.

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

use std::path::Path;
use std::sync::Arc;

/// Result of executing a platform operation; the error carries the OS message.
pub type CommandResult = Result<(), String>;

/// System commands that can be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemCommand {
    /// Lock the screen/session
    Lock,
    /// Put the computer to sleep/suspend
    Sleep,
    /// Log out of the current session
    Logout,
    /// Restart the computer
    Restart,
    /// Shut down the computer
    Shutdown,
}

impl SystemCommand {
    pub const ALL: [SystemCommand; 5] = [
        SystemCommand::Lock,
        SystemCommand::Sleep,
        SystemCommand::Logout,
        SystemCommand::Restart,
        SystemCommand::Shutdown,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SystemCommand::Lock => "lock",
            SystemCommand::Sleep => "sleep",
            SystemCommand::Logout => "logout",
            SystemCommand::Restart => "restart",
            SystemCommand::Shutdown => "shutdown",
        }
    }
}

impl std::str::FromStr for SystemCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SystemCommand::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| format!("Unknown system command: {}", s))
    }
}

/// Platform-specific operations trait.
///
/// All methods are blocking; the engine calls them from
/// `tokio::task::spawn_blocking`.
pub trait Platform: Send + Sync {
    /// Launch a program from its exec line or bundle/shortcut path.
    ///
    /// Desktop-entry field codes (`%f`, `%u`, ...) are stripped by the caller.
    fn launch_app(&self, exec: &str, privileged: bool) -> CommandResult;

    /// Open a URL in the default browser.
    fn open_url(&self, url: &str) -> CommandResult;

    /// Open a file or directory with the default application.
    fn open_file(&self, path: &str) -> CommandResult;

    /// Reveal a file in the system file manager.
    ///
    /// The default opens the containing folder.
    fn open_location(&self, path: &str) -> CommandResult {
        let parent = Path::new(path)
            .parent()
            .ok_or_else(|| format!("{} has no parent folder", path))?;
        self.open_file(&parent.to_string_lossy())
    }

    /// Run an arbitrary shell command.
    fn run_shell_command(&self, command: &str, privileged: bool) -> CommandResult;

    /// Open the settings panel identified by a platform-neutral key such as `display`.
    fn open_system_setting(&self, key: &str) -> CommandResult;

    /// Execute a system command (lock, sleep, logout, restart, shutdown).
    fn system_command(&self, command: SystemCommand) -> CommandResult;
}

/// Get the platform implementation for the current OS.
pub fn current() -> Arc<dyn Platform> {
    #[cfg(target_os = "linux")]
    {
        Arc::new(linux::LinuxPlatform::new())
    }

    #[cfg(target_os = "macos")]
    {
        Arc::new(macos::MacOSPlatform::new())
    }

    #[cfg(target_os = "windows")]
    {
        Arc::new(windows::WindowsPlatform::new())
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        compile_error!("Unsupported platform")
    }
}

/// Platform name as a string (for logging/display).
pub fn name() -> &'static str {
    #[cfg(target_os = "linux")]
    {
        "Linux"
    }

    #[cfg(target_os = "macos")]
    {
        "macOS"
    }

    #[cfg(target_os = "windows")]
    {
        "Windows"
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        "Unknown"
    }
}

/// Strip desktop-entry field codes from an exec line (%f, %u, %F, %U, etc.)
pub fn strip_field_codes(exec: &str) -> String {
    ["%f", "%F", "%u", "%U", "%i", "%c", "%k"]
        .iter()
        .fold(exec.to_string(), |acc, code| acc.replace(code, ""))
        .trim()
        .to_string()
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording platform used by plugin and engine tests.

    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    pub struct RecordingPlatform {
        pub calls: Mutex<Vec<String>>,
        pub fail: bool,
    }

    impl RecordingPlatform {
        pub fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }

        fn record(&self, call: String) -> CommandResult {
            self.calls.lock().push(call.clone());
            if self.fail {
                Err(format!("{} failed: permission denied", call))
            } else {
                Ok(())
            }
        }
    }

    impl Platform for RecordingPlatform {
        fn launch_app(&self, exec: &str, privileged: bool) -> CommandResult {
            self.record(format!("launch:{}:{}", exec, privileged))
        }

        fn open_url(&self, url: &str) -> CommandResult {
            self.record(format!("url:{}", url))
        }

        fn open_file(&self, path: &str) -> CommandResult {
            self.record(format!("file:{}", path))
        }

        fn run_shell_command(&self, command: &str, privileged: bool) -> CommandResult {
            self.record(format!("shell:{}:{}", command, privileged))
        }

        fn open_system_setting(&self, key: &str) -> CommandResult {
            self.record(format!("setting:{}", key))
        }

        fn system_command(&self, command: SystemCommand) -> CommandResult {
            self.record(format!("system:{}", command.key()))
        }
    }
}
