//! Property-based tests for setupkit
//!
//! These tests verify:
//! - FillGlobalStorageJob writes the same storage however often it runs
//! - Root partitions are always described as system partitions
//! - Device-path bootloader targets are never rewritten
//! - Enum names round-trip and zone.tab parsing never panics

use proptest::prelude::*;
use setupkit::{
    CommandOutput, CommandRunner, Device, FileSystem, FileSystemType, FillGlobalStorageJob,
    GlobalStorage, Job, Partition, PartitionRole, PartitionState, TimezoneData, keys,
};

/// Every lookup fails, the way blkid behaves for partitions it cannot read.
struct NoHelpers;

impl CommandRunner for NoHelpers {
    fn run(&self, _program: &str, _args: &[&str]) -> setupkit::Result<CommandOutput> {
        Ok(CommandOutput {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: Some(2),
        })
    }
}

// =============================================================================
// Strategies
// =============================================================================

fn filesystem_type_strategy() -> impl Strategy<Value = FileSystemType> {
    prop_oneof![
        Just(FileSystemType::Ext4),
        Just(FileSystemType::Btrfs),
        Just(FileSystemType::Xfs),
        Just(FileSystemType::Fat32),
        Just(FileSystemType::LinuxSwap),
        Just(FileSystemType::Ntfs),
    ]
}

fn state_strategy() -> impl Strategy<Value = PartitionState> {
    prop_oneof![Just(PartitionState::Existing), Just(PartitionState::New)]
}

fn mount_point_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("/".to_string()),
        Just("/home".to_string()),
        Just("/boot/efi".to_string()),
        "/[a-z]{1,8}",
    ]
}

fn partition_strategy() -> impl Strategy<Value = Partition> {
    (
        "(/dev/sd[a-d][1-9])?",
        mount_point_strategy(),
        filesystem_type_strategy(),
        state_strategy(),
    )
        .prop_map(|(path, mount_point, fs, state)| Partition {
            path,
            mount_point,
            file_system: FileSystem::Plain(fs),
            state,
            roles: vec![PartitionRole::Primary],
            children: Vec::new(),
        })
}

fn devices_strategy() -> impl Strategy<Value = Vec<Device>> {
    prop::collection::vec(
        ("/dev/sd[a-d]", prop::collection::vec(partition_strategy(), 0..5)).prop_map(
            |(device_node, partitions)| Device {
                device_node,
                name: String::new(),
                partitions,
            },
        ),
        0..3,
    )
}

// =============================================================================
// FillGlobalStorageJob
// =============================================================================

proptest! {
    /// Running the job twice leaves storage exactly as one run does
    #[test]
    fn fill_job_is_idempotent(
        devices in devices_strategy(),
        target in prop::option::of(prop_oneof![Just("/boot/efi".to_string()), "/dev/sd[a-d]"]),
    ) {
        let job = FillGlobalStorageJob::with_runner(devices, target, NoHelpers);
        let mut once = GlobalStorage::new();
        job.exec(&mut once).unwrap();
        let mut twice = once.clone();
        job.exec(&mut twice).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// One record per partition, in order, with `new` set only for new partitions
    #[test]
    fn fill_job_records_every_partition(devices in devices_strategy()) {
        let expected: Vec<(String, bool)> = devices
            .iter()
            .flat_map(|d| d.partitions.iter())
            .map(|p| (p.path.clone(), p.state == PartitionState::New))
            .collect();
        let job = FillGlobalStorageJob::with_runner(devices, None, NoHelpers);
        let actual: Vec<(String, bool)> = job
            .create_partition_list()
            .into_iter()
            .map(|r| (r.device, r.new))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    /// Every partition mounted at "/" gets a "system partition" line
    #[test]
    fn root_is_described_as_system_partition(devices in devices_strategy()) {
        let roots = devices
            .iter()
            .flat_map(|d| d.partitions.iter())
            .filter(|p| p.mount_point == "/")
            .count();
        let job = FillGlobalStorageJob::with_runner(devices, None, NoHelpers);
        let description = job.pretty_description();
        let system_lines = description
            .lines()
            .filter(|l| l.contains("system partition"))
            .count();
        prop_assert_eq!(system_lines, roots);
        for line in description.lines().filter(|l| l.contains("system partition")) {
            prop_assert!(line.starts_with("Install Generic on "));
        }
    }

    /// A target starting with /dev/ is written as given
    #[test]
    fn device_path_target_passes_through(
        devices in devices_strategy(),
        target in "/dev/[a-z]{2,6}[0-9]{0,2}",
    ) {
        let job = FillGlobalStorageJob::with_runner(devices, Some(target.clone()), NoHelpers);
        let mut gs = GlobalStorage::new();
        job.exec(&mut gs).unwrap();
        let record = gs.get::<keys::BootLoader>().unwrap().flatten();
        prop_assert_eq!(record.map(|r| r.install_path), Some(target));
    }
}

// =============================================================================
// Enum and parser robustness
// =============================================================================

proptest! {
    /// FileSystemType: to_string → parse round-trip is identity
    #[test]
    fn filesystem_type_roundtrip(fs in filesystem_type_strategy()) {
        let parsed: FileSystemType = fs.to_string().parse().expect("Should parse");
        prop_assert_eq!(fs, parsed);
    }

    /// Parsing arbitrary strings doesn't panic
    #[test]
    fn filesystem_type_parse_doesnt_crash(s in ".*") {
        let _ = s.parse::<FileSystemType>();
    }

    /// Arbitrary zone.tab content is either rejected or yields sorted regions
    #[test]
    fn zone_tab_parse_doesnt_crash(s in "[A-Za-z0-9+\\-/_#\t\n ]{0,200}") {
        if let Ok(data) = TimezoneData::parse_zone_tab(&s) {
            let names: Vec<&str> = data.regions().iter().map(|r| r.name()).collect();
            let mut sorted = names.clone();
            sorted.sort();
            prop_assert_eq!(names, sorted);
        }
    }
}
