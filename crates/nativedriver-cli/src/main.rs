//! NativeDriver CLI - drive native Android apps over an ADB tunnel
//!
//! Usage:
//!     nativedriver [OPTIONS] <COMMAND>
//!
//! Environment Variables:
//!     NATIVE_DRIVER_SERVER: Server URL (default: http://localhost:54129/hub)
//!     NATIVE_DRIVER_DEVICE_ID: ADB device serial for multi-device setups
//!     NATIVE_DRIVER_PACKAGE: Package of the app under test
//!     RUST_LOG: Log filter (default: info)

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use native_driver::{
    list_devices, AdbConnection, AdbTunnel, AndroidNativeDriver, AndroidNativeDriverBuilder,
    FindsByText, HasSetText, DEFAULT_REMOTE_PORT, DEFAULT_SERVER_URL,
};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;
use url::Url;

/// NativeDriver - WebDriver for native Android apps
#[derive(Parser, Debug)]
#[command(name = "nativedriver")]
#[command(about = "NativeDriver - WebDriver for native Android apps")]
#[command(after_help = r#"Examples:
    # List connected devices
    nativedriver devices

    # Forward the default server port
    nativedriver forward

    # Find views whose text contains "Sign"
    nativedriver --package com.example.app find --text Sign --partial --all

    # Replace the text of the view labelled "Search"
    nativedriver --package com.example.app set-text --target Search --value "hello"

    # Server already reachable, skip ADB setup
    nativedriver --no-adb find --text OK
"#)]
struct Cli {
    /// Server URL
    #[arg(long, env = "NATIVE_DRIVER_SERVER", default_value = DEFAULT_SERVER_URL)]
    server: Url,

    /// ADB device ID
    #[arg(short = 'd', long, env = "NATIVE_DRIVER_DEVICE_ID")]
    device_id: Option<String>,

    /// Package of the app under test (needed to start the instrumentation)
    #[arg(short = 'p', long, env = "NATIVE_DRIVER_PACKAGE")]
    package: Option<String>,

    /// Device port the in-app server listens on
    #[arg(long, default_value_t = DEFAULT_REMOTE_PORT)]
    remote_port: u16,

    /// Skip instrumentation and port forwarding
    #[arg(long)]
    no_adb: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List connected devices
    Devices,

    /// Forward a local port to the device
    Forward {
        /// Local port (defaults to the server URL's port)
        #[arg(long)]
        local: Option<u16>,

        /// Remove the forward instead of creating it
        #[arg(long)]
        remove: bool,
    },

    /// Find views by text and print their ids
    Find {
        /// Text to look for
        #[arg(long)]
        text: String,

        /// Match views whose text contains the value
        #[arg(long)]
        partial: bool,

        /// Print every match instead of the first
        #[arg(long)]
        all: bool,
    },

    /// Replace the text of the view showing TARGET
    SetText {
        /// Current text of the view
        #[arg(long)]
        target: String,

        /// New text
        #[arg(long)]
        value: String,
    },
}

impl Cli {
    fn adb_connection(&self) -> AdbConnection {
        let mut conn = AdbConnection::new();
        if let Some(id) = &self.device_id {
            conn = conn.with_device_id(id);
        }
        if let Some(package) = &self.package {
            conn = conn.with_target_package(package);
        }
        conn
    }
}

/// Check that adb is installed and a device is online
async fn check_system_requirements(conn: &AdbConnection) -> bool {
    print!("Checking ADB installation... ");
    io::stdout().flush().ok();

    if which::which("adb").is_err() {
        println!("\u{274C} FAILED");
        println!("   Error: adb is not installed or not in PATH.");
        println!("   Solution: Install Android platform tools:");
        println!("     - macOS: brew install android-platform-tools");
        println!("     - Linux: sudo apt install android-tools-adb");
        return false;
    }
    println!("\u{2705} OK");

    print!("Checking connected devices... ");
    io::stdout().flush().ok();

    match conn.is_connected().await {
        Ok(true) => {
            println!("\u{2705} OK");
            true
        }
        Ok(false) => {
            println!("\u{274C} FAILED");
            println!("   Error: No online device.");
            println!("   Solution: Enable USB debugging and authorize this computer.");
            false
        }
        Err(e) => {
            println!("\u{274C} FAILED");
            println!("   Error: {}", e);
            false
        }
    }
}

async fn connect(args: &Cli) -> Result<AndroidNativeDriver> {
    let mut builder = AndroidNativeDriverBuilder::new()
        .with_server(args.server.clone())
        .with_remote_port(args.remote_port);

    if !args.no_adb {
        let conn = args.adb_connection();
        if !check_system_requirements(&conn).await {
            std::process::exit(1);
        }
        if args.package.is_none() {
            return Err(anyhow!(
                "--package is required to start the server instrumentation (or pass --no-adb)"
            ));
        }
        builder = builder.with_adb_connection(conn);
    }

    Ok(builder.build().await?)
}

async fn find(driver: &AndroidNativeDriver, text: &str, partial: bool, all: bool) -> Result<()> {
    let found = match (partial, all) {
        (false, false) => vec![driver.find_element_by_text(text).await?],
        (true, false) => vec![driver.find_element_by_partial_text(text).await?],
        (false, true) => driver.find_elements_by_text(text).await?,
        (true, true) => driver.find_elements_by_partial_text(text).await?,
    };
    if found.is_empty() {
        println!("No matches for {:?}", text);
    }
    for element in &found {
        println!("{}\t{}", element.id(), element.text().await?);
    }
    Ok(())
}

async fn set_text(driver: &AndroidNativeDriver, target: &str, value: &str) -> Result<()> {
    let element = driver.find_element_by_text(target).await?;
    element.set_text(value).await?;
    println!("Set text of {} to {:?}", element.id(), value);
    Ok(())
}

async fn run(args: &Cli) -> Result<()> {
    match &args.command {
        Commands::Devices => {
            let devices = list_devices().await?;
            if devices.is_empty() {
                println!("No devices connected");
            }
            for device in devices {
                println!(
                    "  - {} ({}){}",
                    device.device_id,
                    device.status,
                    device
                        .model
                        .map(|m| format!(" model: {}", m))
                        .unwrap_or_default()
                );
            }
        }
        Commands::Forward { local, remove } => {
            let conn = args.adb_connection();
            let local = local
                .or_else(|| args.server.port_or_known_default())
                .ok_or_else(|| anyhow!("cannot derive a local port from {}", args.server))?;
            if *remove {
                conn.remove_forward(local).await?;
                println!("Removed forward tcp:{}", local);
            } else {
                conn.forward(local, args.remote_port).await?;
                println!("Forwarding tcp:{} -> tcp:{}", local, args.remote_port);
            }
        }
        Commands::Find { text, partial, all } => {
            let driver = connect(args).await?;
            let outcome = find(&driver, text, *partial, *all).await;
            let quit = driver.quit().await;
            outcome?;
            quit?;
        }
        Commands::SetText { target, value } => {
            let driver = connect(args).await?;
            let outcome = set_text(&driver, target, value).await;
            let quit = driver.quit().await;
            outcome?;
            quit?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();
    run(&args).await
}
