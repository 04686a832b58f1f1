//! macOS platform implementation.
//!
//! Uses `open` for apps, URLs and files, `osascript` for privileged shell
//! commands and `x-apple.systempreferences:` URLs for settings panes.

use super::{CommandResult, Platform, SystemCommand};
use std::process::Command;

/// macOS platform implementation.
pub struct MacOSPlatform;

impl MacOSPlatform {
    /// Create a new macOS platform instance.
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacOSPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for MacOSPlatform {
    fn launch_app(&self, exec: &str, _privileged: bool) -> CommandResult {
        Command::new("open")
            .arg(exec)
            .spawn()
            .map_err(|e| format!("Failed to launch {}: {}", exec, e))?;
        Ok(())
    }

    fn open_url(&self, url: &str) -> CommandResult {
        Command::new("open")
            .arg(url)
            .spawn()
            .map_err(|e| format!("Failed to open URL: {}", e))?;
        Ok(())
    }

    fn open_file(&self, path: &str) -> CommandResult {
        Command::new("open")
            .arg(path)
            .spawn()
            .map_err(|e| format!("Failed to open file: {}", e))?;
        Ok(())
    }

    fn open_location(&self, path: &str) -> CommandResult {
        Command::new("open")
            .args(["-R", path])
            .spawn()
            .map_err(|e| format!("Failed to reveal {}: {}", path, e))?;
        Ok(())
    }

    fn run_shell_command(&self, command: &str, privileged: bool) -> CommandResult {
        let mut cmd = if privileged {
            let script = format!(
                r#"do shell script "{}" with administrator privileges"#,
                command.replace('"', "\\\"")
            );
            let mut cmd = Command::new("osascript");
            cmd.args(["-e", &script]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        };

        cmd.spawn()
            .map_err(|e| format!("Failed to run command: {}", e))?;
        Ok(())
    }

    fn open_system_setting(&self, key: &str) -> CommandResult {
        let pane = match key {
            "display" => "com.apple.preference.displays",
            "sound" => "com.apple.preference.sound",
            "network" | "wifi" => "com.apple.preference.network",
            "bluetooth" => "com.apple.preferences.Bluetooth",
            "power" => "com.apple.preference.battery",
            "notifications" => "com.apple.preference.notifications",
            "privacy" => "com.apple.preference.security",
            "datetime" => "com.apple.preference.datetime",
            "keyboard" => "com.apple.preference.keyboard",
            "mouse" => "com.apple.preference.trackpad",
            "printers" => "com.apple.preference.printfax",
            "users" => "com.apple.preferences.users",
            "wallpaper" => "com.apple.preference.desktopscreeneffect",
            _ => "com.apple.preference.general",
        };
        self.open_url(&format!("x-apple.systempreferences:{}", pane))
    }

    fn system_command(&self, command: SystemCommand) -> CommandResult {
        let (cmd, args): (&str, Vec<&str>) = match command {
            SystemCommand::Lock => ("pmset", vec!["displaysleepnow"]),
            SystemCommand::Sleep => ("pmset", vec!["sleepnow"]),
            SystemCommand::Logout => (
                "osascript",
                vec!["-e", r#"tell application "System Events" to log out"#],
            ),
            SystemCommand::Restart => (
                "osascript",
                vec!["-e", r#"tell application "System Events" to restart"#],
            ),
            SystemCommand::Shutdown => (
                "osascript",
                vec!["-e", r#"tell application "System Events" to shut down"#],
            ),
        };

        match Command::new(cmd).args(&args).status() {
            Ok(s) if s.success() => Ok(()),
            Ok(_) => Err(format!("Command {} failed", cmd)),
            Err(e) => Err(format!("Failed to execute {}: {}", cmd, e)),
        }
    }
}
