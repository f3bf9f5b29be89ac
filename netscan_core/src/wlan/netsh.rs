//! `WlanBackend` implementation that shells out to `netsh wlan`.
//!
//! Every invocation is a blocking subprocess awaited to completion. Exit status
//! is checked; `netsh` prints its diagnostics on stdout, so that is what ends up
//! in `WlanError::CommandFailed` when stderr is empty.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use tokio::process::Command;

use super::{WirelessNetwork, WlanBackend, WlanError, WlanInterface};

const NETSH: &str = "netsh";

/// `CREATE_NO_WINDOW` from winbase.h: keep the console window hidden.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

lazy_static! {
    /// `    Key name         : value` with the separator being the first colon.
    /// Only the single space after the colon is dropped; SSIDs may start or
    /// end with blanks.
    static ref KEY_VALUE: Regex = Regex::new(r"^\s*([^:]+?)\s*: ?(.*)$").unwrap();
    /// Network header inside `show networks`: `SSID 3`.
    static ref SSID_HEADER: Regex = Regex::new(r"^SSID \d+$").unwrap();
}

#[derive(Debug, Clone, Default)]
pub struct NetshBackend;

impl NetshBackend {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, args: &[String]) -> Result<String, WlanError> {
        let rendered = format!("{} {}", NETSH, args.join(" "));
        debug!("Running {}", rendered);

        let mut command = Command::new(NETSH);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        push_args(&mut command, args);
        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        let output = command.output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostics = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(WlanError::CommandFailed {
                command: rendered,
                code: output.status.code(),
                output: diagnostics,
            });
        }
        debug!("{} finished ({} bytes of output)", rendered, stdout.len());
        Ok(stdout)
    }
}

/// netsh wants `name="My Net"` verbatim; the default Windows argument quoting
/// would escape the inner quotes and netsh would then see them literally.
#[cfg(windows)]
fn push_args(command: &mut Command, args: &[String]) {
    for arg in args {
        command.raw_arg(arg);
    }
}

#[cfg(not(windows))]
fn push_args(command: &mut Command, args: &[String]) {
    command.args(args);
}

fn quoted(key: &str, value: &str) -> String {
    format!("{key}=\"{value}\"")
}

#[async_trait]
impl WlanBackend for NetshBackend {
    async fn interfaces(&self) -> Result<Vec<WlanInterface>, WlanError> {
        let output = self
            .run(&["wlan".into(), "show".into(), "interfaces".into()])
            .await?;
        Ok(parse_interfaces(&output))
    }

    async fn visible_networks(
        &self,
        interface: &WlanInterface,
    ) -> Result<Vec<WirelessNetwork>, WlanError> {
        let output = self
            .run(&[
                "wlan".into(),
                "show".into(),
                "networks".into(),
                quoted("interface", &interface.name),
            ])
            .await?;
        Ok(parse_networks(&output, &interface.name))
    }

    async fn add_profile(&self, path: &Path) -> Result<(), WlanError> {
        let path = path
            .to_str()
            .ok_or_else(|| WlanError::Other(format!("profile path {:?} is not UTF-8", path)))?;
        self.run(&[
            "wlan".into(),
            "add".into(),
            "profile".into(),
            quoted("filename", path),
        ])
        .await
        .map(|_| ())
    }

    async fn connect(&self, profile_name: &str, ssid: &str) -> Result<(), WlanError> {
        self.run(&[
            "wlan".into(),
            "connect".into(),
            quoted("name", profile_name),
            quoted("ssid", ssid),
        ])
        .await
        .map(|_| ())
    }

    async fn delete_profile(&self, profile_name: &str) -> Result<(), WlanError> {
        self.run(&[
            "wlan".into(),
            "delete".into(),
            "profile".into(),
            quoted("name", profile_name),
        ])
        .await
        .map(|_| ())
    }
}

fn split_kv(line: &str) -> Option<(&str, &str)> {
    let caps = KEY_VALUE.captures(line.trim_end_matches('\r'))?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Parse `netsh wlan show interfaces`.
///
/// Each adapter block starts with a `Name` line; unknown keys are ignored.
pub fn parse_interfaces(output: &str) -> Vec<WlanInterface> {
    let mut interfaces = Vec::new();
    let mut current: Option<WlanInterface> = None;

    for line in output.lines() {
        let Some((key, value)) = split_kv(line) else {
            continue;
        };
        if key == "Name" {
            if let Some(done) = current.take() {
                interfaces.push(done);
            }
            current = Some(WlanInterface {
                name: value.trim().to_string(),
                ..Default::default()
            });
            continue;
        }
        let Some(iface) = current.as_mut() else {
            continue;
        };
        match key {
            "Description" => iface.description = value.trim().to_string(),
            "GUID" => iface.guid = value.trim().to_string(),
            "Physical address" => iface.mac = value.trim().to_string(),
            "State" => iface.state = value.trim().to_string(),
            "SSID" if !value.is_empty() => iface.ssid = Some(value.to_string()),
            _ => {}
        }
    }
    if let Some(done) = current.take() {
        interfaces.push(done);
    }
    interfaces
}

/// Parse `netsh wlan show networks interface="…"`.
///
/// Hidden networks keep their empty SSID; nothing is deduplicated.
pub fn parse_networks(output: &str, interface: &str) -> Vec<WirelessNetwork> {
    output
        .lines()
        .filter_map(split_kv)
        .filter(|(key, _)| SSID_HEADER.is_match(key))
        .map(|(_, ssid)| WirelessNetwork {
            ssid: ssid.to_string(),
            interface: interface.to_string(),
        })
        .collect()
}
