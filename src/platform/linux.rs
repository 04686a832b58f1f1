//! Linux platform implementation.
//!
//! Implements the Platform trait for Linux systems using:
//! - xdg-open for opening URLs and files
//! - pkexec for privileged launches
//! - gnome-control-center for settings panels
//! - systemctl/loginctl for system commands

use super::{strip_field_codes, CommandResult, Platform, SystemCommand};
use std::process::Command;

/// Linux platform implementation.
pub struct LinuxPlatform;

impl LinuxPlatform {
    /// Create a new Linux platform instance.
    pub fn new() -> Self {
        Self
    }

    /// Build a command, wrapping it in pkexec when privileged.
    fn command(program: &str, privileged: bool) -> Command {
        if privileged {
            let mut cmd = Command::new("pkexec");
            cmd.arg(program);
            cmd
        } else {
            Command::new(program)
        }
    }

    fn logout_fallback() -> CommandResult {
        let user = std::env::var("USER").unwrap_or_default();
        Command::new("loginctl")
            .args(["terminate-user", &user])
            .status()
            .map_err(|e| format!("Logout fallback failed: {}", e))?;
        Ok(())
    }
}

impl Default for LinuxPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for LinuxPlatform {
    fn launch_app(&self, exec: &str, privileged: bool) -> CommandResult {
        let exec = strip_field_codes(exec);
        let parts: Vec<&str> = exec.split_whitespace().collect();

        let Some((program, args)) = parts.split_first() else {
            return Err("Empty exec command".to_string());
        };

        Self::command(program, privileged)
            .args(args)
            .spawn()
            .map_err(|e| format!("Failed to launch {}: {}", program, e))?;

        Ok(())
    }

    fn open_url(&self, url: &str) -> CommandResult {
        Command::new("xdg-open")
            .arg(url)
            .spawn()
            .map_err(|e| format!("Failed to open URL: {}", e))?;
        Ok(())
    }

    fn open_file(&self, path: &str) -> CommandResult {
        Command::new("xdg-open")
            .arg(path)
            .spawn()
            .map_err(|e| format!("Failed to open file: {}", e))?;
        Ok(())
    }

    fn run_shell_command(&self, command: &str, privileged: bool) -> CommandResult {
        Self::command("sh", privileged)
            .args(["-c", command])
            .spawn()
            .map_err(|e| format!("Failed to run command: {}", e))?;
        Ok(())
    }

    fn open_system_setting(&self, key: &str) -> CommandResult {
        let panel = match key {
            "datetime" => "datetime",
            "applications" => "default-apps",
            "about" => "info-overview",
            "wallpaper" => "background",
            other => other,
        };

        Command::new("gnome-control-center")
            .arg(panel)
            .spawn()
            .map_err(|e| format!("Failed to open settings panel {}: {}", panel, e))?;
        Ok(())
    }

    fn system_command(&self, command: SystemCommand) -> CommandResult {
        let (cmd, args): (&str, Vec<&str>) = match command {
            SystemCommand::Lock => ("loginctl", vec!["lock-session"]),
            SystemCommand::Sleep => ("systemctl", vec!["suspend"]),
            SystemCommand::Logout => ("gnome-session-quit", vec!["--logout", "--no-prompt"]),
            SystemCommand::Restart => ("systemctl", vec!["reboot"]),
            SystemCommand::Shutdown => ("systemctl", vec!["poweroff"]),
        };

        match Command::new(cmd).args(&args).status() {
            Ok(s) if s.success() => Ok(()),
            Ok(_) if command == SystemCommand::Logout => Self::logout_fallback(),
            Ok(_) => Err(format!("Command {} failed", cmd)),
            Err(_) if command == SystemCommand::Logout => Self::logout_fallback(),
            Err(e) => Err(format!("Failed to execute {}: {}", cmd, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_rejects_empty_exec() {
        let platform = LinuxPlatform::new();
        assert_eq!(
            platform.launch_app("%U", false),
            Err("Empty exec command".to_string())
        );
    }

    #[test]
    fn test_privileged_command_uses_pkexec() {
        let cmd = LinuxPlatform::command("sh", true);
        assert_eq!(cmd.get_program(), "pkexec");
        assert_eq!(cmd.get_args().collect::<Vec<_>>(), vec!["sh"]);
    }
}
