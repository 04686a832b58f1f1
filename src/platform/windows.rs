//! Windows platform implementation.
//!
//! Uses `cmd /C start` for shortcuts, URLs and files, PowerShell
//! `Start-Process -Verb RunAs` for privileged launches and `ms-settings:`
//! URIs for settings pages.

use super::{CommandResult, Platform, SystemCommand};
use std::process::Command;

/// Windows platform implementation.
pub struct WindowsPlatform;

impl WindowsPlatform {
    /// Create a new Windows platform instance.
    pub fn new() -> Self {
        Self
    }

    fn start(target: &str) -> CommandResult {
        Command::new("cmd")
            .args(["/C", "start", "", target])
            .spawn()
            .map_err(|e| format!("Failed to start {}: {}", target, e))?;
        Ok(())
    }

    fn start_elevated(target: &str, arguments: Option<&str>) -> CommandResult {
        let mut script = format!("Start-Process -Verb RunAs -FilePath '{}'", target.replace('\'', "''"));
        if let Some(arguments) = arguments {
            script.push_str(&format!(" -ArgumentList '{}'", arguments.replace('\'', "''")));
        }

        Command::new("powershell")
            .args(["-NoProfile", "-Command", &script])
            .spawn()
            .map_err(|e| format!("Failed to start {} elevated: {}", target, e))?;
        Ok(())
    }
}

impl Default for WindowsPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for WindowsPlatform {
    fn launch_app(&self, exec: &str, privileged: bool) -> CommandResult {
        if privileged {
            Self::start_elevated(exec, None)
        } else {
            Self::start(exec)
        }
    }

    fn open_url(&self, url: &str) -> CommandResult {
        Self::start(url)
    }

    fn open_file(&self, path: &str) -> CommandResult {
        Self::start(path)
    }

    fn open_location(&self, path: &str) -> CommandResult {
        Command::new("explorer")
            .arg(format!("/select,{}", path))
            .spawn()
            .map_err(|e| format!("Failed to reveal {}: {}", path, e))?;
        Ok(())
    }

    fn run_shell_command(&self, command: &str, privileged: bool) -> CommandResult {
        if privileged {
            return Self::start_elevated("cmd", Some(&format!("/K {}", command)));
        }

        Command::new("cmd")
            .args(["/C", command])
            .spawn()
            .map_err(|e| format!("Failed to run command: {}", e))?;
        Ok(())
    }

    fn open_system_setting(&self, key: &str) -> CommandResult {
        let page = match key {
            "wifi" => "network-wifi",
            "power" => "powersleep",
            "datetime" => "dateandtime",
            "mouse" => "mousetouchpad",
            "users" => "otherusers",
            "wallpaper" => "personalization-background",
            "applications" => "defaultapps",
            "sound" => "sound",
            other => other,
        };
        Self::start(&format!("ms-settings:{}", page))
    }

    fn system_command(&self, command: SystemCommand) -> CommandResult {
        let (cmd, args): (&str, Vec<&str>) = match command {
            SystemCommand::Lock => ("rundll32.exe", vec!["user32.dll,LockWorkStation"]),
            SystemCommand::Sleep => (
                "rundll32.exe",
                vec!["powrprof.dll,SetSuspendState", "0", "1", "0"],
            ),
            SystemCommand::Logout => ("shutdown", vec!["/l"]),
            SystemCommand::Restart => ("shutdown", vec!["/r", "/t", "0"]),
            SystemCommand::Shutdown => ("shutdown", vec!["/s", "/t", "0"]),
        };

        match Command::new(cmd).args(&args).status() {
            Ok(s) if s.success() => Ok(()),
            Ok(_) => Err(format!("Command {} failed", cmd)),
            Err(e) => Err(format!("Failed to execute {}: {}", cmd, e)),
        }
    }
}
