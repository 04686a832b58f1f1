//! Result execution module - the typed action behind an execution argument.
//!
//! Plugins translate a result's opaque execution argument into an
//! `ExecutionAction`; performing it is the only place that touches the
//! `Platform` primitive, always off the async executor.

use std::sync::Arc;

use crate::error::{OrbitError, OrbitResult};
use crate::platform::{CommandResult, Platform, SystemCommand};

/// The action to perform when a result is executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionAction {
    /// Launch a program by its exec line or shortcut path
    LaunchApp { exec: String },

    /// Open a URL in the default browser
    OpenUrl { url: String },

    /// Open a file or directory with the default application
    OpenFile { path: String },

    /// Reveal a file in the file manager
    OpenLocation { path: String },

    /// Run a shell command
    RunShellCommand { command: String },

    /// Open an operating-system settings panel
    OpenSystemSetting { key: String },

    /// Execute a system command (lock, sleep, logout, restart, shutdown)
    SystemCommand { command: SystemCommand },
}

impl ExecutionAction {
    /// Perform the action synchronously.
    pub fn perform_blocking(&self, platform: &dyn Platform, privileged: bool) -> CommandResult {
        match self {
            ExecutionAction::LaunchApp { exec } => platform.launch_app(exec, privileged),
            ExecutionAction::OpenUrl { url } => platform.open_url(url),
            ExecutionAction::OpenFile { path } => platform.open_file(path),
            ExecutionAction::OpenLocation { path } => platform.open_location(path),
            ExecutionAction::RunShellCommand { command } => {
                platform.run_shell_command(command, privileged)
            }
            ExecutionAction::OpenSystemSetting { key } => platform.open_system_setting(key),
            ExecutionAction::SystemCommand { command } => platform.system_command(*command),
        }
    }

    /// Perform the action on the blocking pool and wait for it to settle.
    pub async fn perform(self, platform: Arc<dyn Platform>, privileged: bool) -> OrbitResult<()> {
        log::debug!("Performing {:?} (privileged: {})", self, privileged);

        tokio::task::spawn_blocking(move || self.perform_blocking(platform.as_ref(), privileged))
            .await
            .map_err(|e| OrbitError::ExecutionFailed(format!("Execution task panicked: {}", e)))?
            .map_err(OrbitError::ExecutionFailed)
    }
}
