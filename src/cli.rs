use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// setupkit - run installer modules against JSON inputs
#[derive(Parser, Debug)]
#[command(name = "setupkit")]
#[command(about = "Locale and partition-report modules for a modular OS installer")]
#[command(version)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish the partition layout into global storage
    Partitions {
        /// JSON file with the device list decided by the partitioning step
        #[arg(short, long)]
        devices: PathBuf,

        /// Bootloader target: a device path or a mount point
        #[arg(short, long)]
        bootloader: Option<String>,

        /// Installer settings file
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Global storage file to update (printed to stdout if omitted)
        #[arg(long)]
        state: Option<PathBuf>,

        /// Print the job description before running it
        #[arg(long)]
        describe: bool,
    },
    /// Choose a timezone and apply it
    Locale {
        /// Installer settings file
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// zone.tab to read instead of the system one
        #[arg(long)]
        zone_tab: Option<PathBuf>,

        /// locale.gen to read instead of /etc/locale.gen
        #[arg(long)]
        locale_gen: Option<PathBuf>,

        /// Region, e.g. Europe
        #[arg(short, long)]
        region: Option<String>,

        /// Zone within the region, e.g. Berlin
        #[arg(short, long)]
        zone: Option<String>,

        /// List regions (or the zones of --region) and exit
        #[arg(long)]
        list: bool,

        /// Global storage file to update (printed to stdout if omitted)
        #[arg(long)]
        state: Option<PathBuf>,
    },
    /// Validate a settings file
    Validate {
        /// Path to the settings file
        settings: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
