use std::fmt::{self, Display};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{debug, info};
use netscan_core::settings::SettingsError;
use netscan_core::vendor::VendorError;
use netscan_core::wlan::WlanError;
use netscan_core::{
    JoinError, Manufacturer, NetshBackend, Settings, VendorClient, WifiManager, WirelessNetwork,
};

use super::prompt::read_passphrase;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "netscan", version, subcommand_required = true)]
pub struct Args {
    /// Settings file (defaults to config.json in the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Debug logging (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List visible networks on every wireless adapter
    Scan,
    /// Join a network through a temporary WPA2-Personal profile
    Join {
        /// SSID to join
        #[arg(long, required_unless_present = "index", conflicts_with = "index")]
        ssid: Option<String>,
        /// Pick the N-th network (1-based) from a fresh scan instead
        #[arg(long)]
        index: Option<usize>,
        /// Passphrase; prompted for without echo when omitted
        #[arg(long)]
        password: Option<String>,
        /// Skip the manufacturer lookup after joining
        #[arg(long)]
        no_vendor: bool,
        /// Directory for the temporary profile XML
        #[arg(long)]
        profile_dir: Option<PathBuf>,
        /// Seconds to wait for the adapter to report the network
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Look up the manufacturer of a MAC address
    Vendor {
        mac: String,
        /// Endpoint template; `{mac}` is replaced by the address
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Show wireless adapters and their association
    Status,
    /// Remove profile files left behind by interrupted joins
    Cleanup {
        #[arg(long)]
        profile_dir: Option<PathBuf>,
    },
}

/// Everything that can end a CLI run, rendered once at the top level.
#[derive(Debug)]
pub enum CliError {
    Settings(SettingsError),
    Wlan(WlanError),
    Join(JoinError),
    Vendor(VendorError),
    IoError(std::io::Error),
    Usage(String),
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        CliError::Settings(err)
    }
}

impl From<WlanError> for CliError {
    fn from(err: WlanError) -> Self {
        CliError::Wlan(err)
    }
}

impl From<JoinError> for CliError {
    fn from(err: JoinError) -> Self {
        CliError::Join(err)
    }
}

impl From<VendorError> for CliError {
    fn from(err: VendorError) -> Self {
        CliError::Vendor(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError(err)
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Settings(e) => write!(f, "{}", e),
            CliError::Wlan(e) => write!(f, "{}", e),
            CliError::Join(e) => write!(f, "Could not join: {}", e),
            CliError::Vendor(e) => write!(f, "{}", e),
            CliError::IoError(e) => write!(f, "IO error: {}", e),
            CliError::Usage(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CliError {}

pub async fn run_cli(args: Args) -> Result<(), CliError> {
    let settings = match &args.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    debug!("Effective settings: {:?}", settings);

    match args.command {
        Command::Scan => run_scan(&settings).await,
        Command::Join {
            ssid,
            index,
            password,
            no_vendor,
            profile_dir,
            timeout,
        } => {
            let mut settings = settings;
            if profile_dir.is_some() {
                settings.profile_dir = profile_dir;
            }
            if let Some(secs) = timeout {
                settings.association_timeout_secs = secs;
            }
            run_join(&settings, ssid, index, password, !no_vendor).await
        }
        Command::Vendor { mac, endpoint } => {
            let mut settings = settings;
            if let Some(endpoint) = endpoint {
                settings.vendor_endpoint = endpoint;
            }
            run_vendor(&settings, &mac).await
        }
        Command::Status => run_status(&settings).await,
        Command::Cleanup { profile_dir } => {
            let mut settings = settings;
            if profile_dir.is_some() {
                settings.profile_dir = profile_dir;
            }
            run_cleanup(&settings)
        }
    }
}

fn manager(settings: &Settings) -> Result<WifiManager, CliError> {
    Ok(WifiManager::from_settings(
        Arc::new(NetshBackend::new()),
        settings,
    )?)
}

async fn run_scan(settings: &Settings) -> Result<(), CliError> {
    let networks = manager(settings)?.scan().await?;
    if networks.is_empty() {
        println!("No networks visible.");
    }
    for (i, network) in networks.iter().enumerate() {
        let ssid = if network.ssid.is_empty() {
            "<hidden>"
        } else {
            network.ssid.as_str()
        };
        println!("{:>3}. {}  [{}]", i + 1, ssid, network.interface);
    }
    Ok(())
}

async fn run_join(
    settings: &Settings,
    ssid: Option<String>,
    index: Option<usize>,
    password: Option<String>,
    lookup_vendor: bool,
) -> Result<(), CliError> {
    let manager = manager(settings)?;

    let ssid = match (ssid, index) {
        (Some(ssid), _) => ssid,
        (None, Some(index)) => {
            let picked = pick_network(manager.scan().await?, index)?;
            info!("Selected network #{}: {}", index, picked.ssid);
            picked.ssid
        }
        (None, None) => {
            return Err(CliError::Usage(
                "Please select an SSID with --ssid or --index.".into(),
            ))
        }
    };

    let passphrase = match password {
        Some(password) => password,
        None => tokio::task::spawn_blocking(|| read_passphrase("Passphrase: "))
            .await
            .map_err(|e| CliError::Usage(format!("Passphrase prompt failed: {e}")))??,
    };

    let adapter = manager.join(&ssid, &passphrase).await?;
    let manufacturer = if lookup_vendor {
        Some(
            VendorClient::from_settings(settings)?
                .lookup_vendor(&adapter.mac)
                .await,
        )
    } else {
        None
    };
    println!("{}", joined_message(&adapter.mac, manufacturer.as_ref()));
    Ok(())
}

/// `None` means no lookup ran, which is not the same as `Unknown`.
fn joined_message(mac: &str, manufacturer: Option<&Manufacturer>) -> String {
    match manufacturer {
        Some(m) => format!("Connected to network. MAC Address: {}, Manufacturer: {}", mac, m),
        None => format!("Connected to network. MAC Address: {}", mac),
    }
}

/// The `index`-th (1-based) network of a scan, as numbered by `netscan scan`.
fn pick_network(
    networks: Vec<WirelessNetwork>,
    index: usize,
) -> Result<WirelessNetwork, CliError> {
    index
        .checked_sub(1)
        .and_then(|i| networks.into_iter().nth(i))
        .ok_or_else(|| CliError::Usage(format!("No network #{} in the current scan", index)))
}

async fn run_vendor(settings: &Settings, mac: &str) -> Result<(), CliError> {
    let manufacturer = VendorClient::from_settings(settings)?
        .lookup_vendor(mac)
        .await;
    println!("{}", manufacturer);
    Ok(())
}

async fn run_status(settings: &Settings) -> Result<(), CliError> {
    let interfaces = manager(settings)?.status().await?;
    if interfaces.is_empty() {
        println!("No wireless adapters found.");
    }
    for iface in interfaces {
        println!("{} ({})", iface.name, iface.description);
        println!("    MAC:   {}", iface.mac);
        println!("    State: {}", iface.state);
        if let Some(ssid) = iface.ssid {
            println!("    SSID:  {}", ssid);
        }
    }
    Ok(())
}

fn run_cleanup(settings: &Settings) -> Result<(), CliError> {
    let store = settings.profile_store()?;
    let removed = store.purge()?;
    println!("Removed {} leftover profile file(s) from {:?}", removed, store.dir());
    Ok(())
}
