//! setupkit - command-line entry point
//!
//! Runs one installer module against JSON inputs and writes the resulting
//! global storage to a file or stdout.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use setupkit::cli::{Cli, Commands};
use setupkit::partition::validate_devices;
use setupkit::{
    Device, FillGlobalStorageJob, GlobalStorage, InstallerSettings, Job, JobQueue, LocaleConfig,
    ProcessGuard, process_guard,
};

/// Initialize tracing; RUST_LOG overrides the default level.
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    debug!(?cli, "arguments parsed");

    if let Err(e) = process_guard::init_signal_handlers() {
        warn!("Failed to initialize signal handlers: {}", e);
    }
    let _guard = ProcessGuard::new();

    match cli.command {
        Commands::Partitions {
            devices,
            bootloader,
            settings,
            state,
            describe,
        } => {
            let settings = load_settings(settings.as_deref())?;
            run_partitions(&devices, bootloader, &settings, state.as_deref(), describe)
        }
        Commands::Locale {
            settings,
            zone_tab,
            locale_gen,
            region,
            zone,
            list,
            state,
        } => {
            let mut settings = load_settings(settings.as_deref())?;
            if zone_tab.is_some() {
                settings.locale.zone_tab_path = zone_tab;
            }
            if locale_gen.is_some() {
                settings.locale.locale_gen_path = locale_gen;
            }
            let config = LocaleConfig::from_settings(&settings.locale)
                .context("Failed to load locale data")?;
            if list {
                list_locations(&config, region.as_deref());
                return Ok(());
            }
            run_locale(config, region, zone, state.as_deref())
        }
        Commands::Validate { settings } => {
            let loaded = InstallerSettings::load_from_file(&settings)?;
            loaded.validate()?;
            info!("Settings validation successful");
            println!("✓ Settings file is valid: {}", settings.display());
            Ok(())
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<InstallerSettings> {
    let settings = match path {
        Some(p) => InstallerSettings::load_from_file(p)?,
        None => InstallerSettings::default(),
    };
    settings.validate()?;
    Ok(settings)
}

fn run_partitions(
    devices_path: &Path,
    bootloader: Option<String>,
    settings: &InstallerSettings,
    state: Option<&Path>,
    describe: bool,
) -> Result<()> {
    let text = fs::read_to_string(devices_path)
        .with_context(|| format!("Failed to read device list from {:?}", devices_path))?;
    let devices: Vec<Device> =
        serde_json::from_str(&text).context("Failed to parse device list JSON")?;
    validate_devices(&devices)?;
    info!(devices = devices.len(), "loaded device topology");

    let bootloader = bootloader.or_else(|| settings.partition.boot_loader_path.clone());
    let job = FillGlobalStorageJob::new(devices, bootloader).with_branding(settings.branding.clone());
    if describe {
        println!("{}", job.pretty_description());
    }

    let mut queue = JobQueue::new();
    queue.enqueue(Box::new(job));
    run_queue(queue, state)
}

fn list_locations(config: &LocaleConfig, region: Option<&str>) {
    match region {
        Some(region) => {
            for zone in config.timezone_data().zones_in_region(region) {
                println!("{}", zone.zone());
            }
        }
        None => {
            for region in config.region_model().items() {
                println!("{}", region);
            }
        }
    }
}

fn run_locale(
    mut config: LocaleConfig,
    region: Option<String>,
    zone: Option<String>,
    state: Option<&Path>,
) -> Result<()> {
    match (region, zone) {
        (Some(region), Some(zone)) => {
            if !config.set_current_location(&region, &zone) {
                bail!("Unknown location {}/{}", region, zone);
            }
        }
        (None, None) => {}
        _ => bail!("--region and --zone must be given together"),
    }
    match config.current_location() {
        Some(loc) => info!(timezone = %loc.tz_name(), "selected location"),
        None => warn!("no location selected, nothing to apply"),
    }

    let mut queue = JobQueue::new();
    queue.enqueue_all(config.create_jobs());
    run_queue(queue, state)
}

/// Run `queue` against the storage in `state` (if it exists) and write it back.
fn run_queue(mut queue: JobQueue<'_>, state: Option<&Path>) -> Result<()> {
    let mut storage = match state {
        Some(p) if p.exists() => GlobalStorage::load_json(p)
            .with_context(|| format!("Failed to load global storage from {:?}", p))?,
        _ => GlobalStorage::new(),
    };

    let report = queue.run(&mut storage);
    if let Some((index, err)) = report.failure {
        bail!("Job {} of {} failed: {} ({})", index + 1, report.total, err, err.details);
    }

    match state {
        Some(p) => {
            storage
                .save_json(p)
                .with_context(|| format!("Failed to save global storage to {:?}", p))?;
            info!(path = %p.display(), "global storage saved");
        }
        None => println!("{}", serde_json::to_string_pretty(&storage.to_json())?),
    }
    Ok(())
}
