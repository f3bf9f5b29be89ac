use std::borrow::Cow;
use std::fmt;

use uuid::Uuid;

/// Every generated profile name and file starts with this.
pub const PROFILE_PREFIX: &str = "WiFiProfile_";

/// A throw-away WLAN profile used for exactly one join attempt.
///
/// Rendered as a WPA2-Personal / AES profile; open, WEP, WPA3 and enterprise
/// networks are not expressible here.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    pub profile_name: String,
    pub ssid: String,
    pub passphrase: String,
}

impl ConnectionProfile {
    /// Creates a profile with a fresh `WiFiProfile_<uuid>` name.
    pub fn new(ssid: impl Into<String>, passphrase: impl Into<String>) -> Self {
        Self {
            profile_name: format!("{PROFILE_PREFIX}{}", Uuid::new_v4()),
            ssid: ssid.into(),
            passphrase: passphrase.into(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.xml", self.profile_name)
    }

    /// The WLANProfile v1 document handed to `netsh wlan add profile`.
    pub fn to_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0"?>
<WLANProfile xmlns="http://www.microsoft.com/networking/WLAN/profile/v1">
    <name>{name}</name>
    <SSIDConfig>
        <SSID>
            <name>{ssid}</name>
        </SSID>
    </SSIDConfig>
    <connectionType>ESS</connectionType>
    <connectionMode>manual</connectionMode>
    <MSM>
        <security>
            <authEncryption>
                <authentication>WPA2PSK</authentication>
                <encryption>AES</encryption>
                <useOneX>false</useOneX>
            </authEncryption>
            <sharedKey>
                <keyType>passPhrase</keyType>
                <protected>false</protected>
                <keyMaterial>{key}</keyMaterial>
            </sharedKey>
        </security>
    </MSM>
</WLANProfile>
"#,
            name = escape_xml(&self.profile_name),
            ssid = escape_xml(&self.ssid),
            key = escape_xml(&self.passphrase),
        )
    }
}

// Keep the passphrase out of logs.
impl fmt::Debug for ConnectionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionProfile")
            .field("profile_name", &self.profile_name)
            .field("ssid", &self.ssid)
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

fn escape_xml(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(raw);
    }
    let mut escaped = String::with_capacity(raw.len() + 8);
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
