//! FillGlobalStorageJob: publish the partition layout for later steps.
//!
//! The job snapshots the decided partition layout into `partitions` and the
//! bootloader placement into `bootLoader`. Metadata collection is best-effort:
//! missing UUIDs and an unresolvable bootloader target degrade to empty or
//! absent values, and the job always succeeds.

use super::device::{Device, Partition, all_partitions, find_partition_by_mount_point};
use super::record::{BootLoaderRecord, LuksRecord, PartitionRecord};
use super::uuid::UuidProbe;
use crate::command_runner::{CommandRunner, SystemCommandRunner};
use crate::config_file::Branding;
use crate::global_storage::{GlobalStorage, keys};
use crate::job::{Job, JobResult};
use std::collections::HashMap;
use tracing::debug;

pub struct FillGlobalStorageJob<R: CommandRunner = SystemCommandRunner> {
    devices: Vec<Device>,
    boot_loader_path: Option<String>,
    branding: Branding,
    runner: R,
}

impl FillGlobalStorageJob<SystemCommandRunner> {
    pub fn new(devices: Vec<Device>, boot_loader_path: Option<String>) -> Self {
        Self::with_runner(devices, boot_loader_path, SystemCommandRunner)
    }
}

impl<R: CommandRunner> FillGlobalStorageJob<R> {
    /// An empty `boot_loader_path` means no bootloader target.
    pub fn with_runner(devices: Vec<Device>, boot_loader_path: Option<String>, runner: R) -> Self {
        Self {
            devices,
            boot_loader_path: boot_loader_path.filter(|p| !p.is_empty()),
            branding: Branding::default(),
            runner,
        }
    }

    pub fn with_branding(mut self, branding: Branding) -> Self {
        self.branding = branding;
        self
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn boot_loader_path(&self) -> Option<&str> {
        self.boot_loader_path.as_deref()
    }

    /// Partition path to filesystem UUID, for partitions that report one.
    pub fn partition_uuids(&self) -> HashMap<String, String> {
        let probe = UuidProbe::new(&self.runner);
        let uuids: HashMap<String, String> = all_partitions(&self.devices)
            .filter_map(|p| probe.filesystem_uuid(p).map(|uuid| (p.path.clone(), uuid)))
            .collect();
        if uuids.is_empty() {
            debug!("No UUIDs found for existing partitions.");
        }
        uuids
    }

    /// One record per partition, in device order.
    pub fn create_partition_list(&self) -> Vec<PartitionRecord> {
        let uuids = self.partition_uuids();
        let probe = UuidProbe::new(&self.runner);

        debug!("Building partition information map");
        let mut records = Vec::new();
        for device in &self.devices {
            debug!(device = %device.device_node, "partitions on device");
            for p in device.iter_partitions() {
                let uuid = uuids.get(&p.path).cloned().unwrap_or_default();
                records.push(record_for_partition(p, uuid, &probe));
            }
        }
        records
    }

    /// Bootloader placement, or `None` if there is no target or it cannot be resolved.
    pub fn create_boot_loader_record(&self) -> Option<BootLoaderRecord> {
        let target = self.boot_loader_path.as_deref()?;
        if target.starts_with("/dev/") {
            return Some(BootLoaderRecord {
                install_path: target.to_string(),
            });
        }
        match find_partition_by_mount_point(&self.devices, target) {
            Some(p) if p.path.is_empty() => {
                debug!(mount_point = target, "bootloader target is not created yet, no device path");
                None
            }
            Some(p) => Some(BootLoaderRecord {
                install_path: p.path.clone(),
            }),
            None => {
                debug!(mount_point = target, "no partition mounted at bootloader target");
                None
            }
        }
    }

    fn describe_partition(&self, p: &Partition) -> Option<String> {
        let fs = p.file_system.canonical_name();
        if p.mount_point.is_empty() || fs.is_empty() {
            return None;
        }
        let product = &self.branding.short_product_name;
        let is_root = p.mount_point == "/";
        let line = match (p.path.is_empty(), is_root) {
            (true, true) => format!("Install {} on new {} system partition.", product, fs),
            (true, false) => format!(
                "Set up new {} partition with mount point {}.",
                fs, p.mount_point
            ),
            (false, true) => format!(
                "Install {} on {} system partition {}.",
                product, fs, p.path
            ),
            (false, false) => format!(
                "Set up {} partition {} with mount point {}.",
                fs, p.path, p.mount_point
            ),
        };
        Some(line)
    }
}

fn record_for_partition(p: &Partition, uuid: String, probe: &UuidProbe<'_>) -> PartitionRecord {
    let luks = p.luks_container().map(|c| LuksRecord {
        luks_mapper_name: c.mapper_basename().to_string(),
        luks_uuid: probe.luks_uuid(&p.path).unwrap_or_default(),
        luks_passphrase: c.passphrase.clone(),
    });
    let record = PartitionRecord {
        device: p.path.clone(),
        mount_point: p.mount_point.clone(),
        fs_name: p.file_system.display_name(),
        fs: p.file_system.canonical_name(),
        uuid,
        new: p.is_new(),
        luks,
    };
    debug!(
        path = %record.device,
        mount_point = %record.mount_point,
        fs = %record.fs,
        fs_name = %record.fs_name,
        uuid = %record.uuid,
        luks_mapper = record.luks.as_ref().map(|l| l.luks_mapper_name.as_str()),
        "  mapping for partition"
    );
    record
}

impl<R: CommandRunner> Job for FillGlobalStorageJob<R> {
    fn pretty_name(&self) -> String {
        "Set partition information".to_string()
    }

    /// Describes the layout without running any helper commands.
    fn pretty_description(&self) -> String {
        let mut lines: Vec<String> = all_partitions(&self.devices)
            .filter_map(|p| self.describe_partition(p))
            .collect();
        if let Some(target) = &self.boot_loader_path {
            lines.push(format!("Install boot loader on {}.", target));
        }
        lines.join("\n")
    }

    fn pretty_status_message(&self) -> String {
        "Setting up mount points.".to_string()
    }

    fn exec(&self, storage: &mut GlobalStorage) -> JobResult {
        let partitions = self.create_partition_list();
        debug!(count = partitions.len(), "Saving partition information map to GlobalStorage[\"partitions\"]");
        storage.insert::<keys::Partitions>(&partitions)?;

        let boot_loader = if self.boot_loader_path.is_some() {
            let record = self.create_boot_loader_record();
            if record.is_none() {
                debug!("Failed to find path for boot loader");
            }
            debug!(?record, "writing bootLoader path");
            record
        } else {
            debug!("writing empty bootLoader value");
            None
        };
        storage.insert::<keys::BootLoader>(&boot_loader)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_runner::CommandOutput;
    use crate::error::Result;
    use crate::partition::device::{FileSystem, LuksContainer};
    use crate::types::{FileSystemType, PartitionRole, PartitionState};

    /// Every helper exits non-zero.
    struct NothingKnown;

    impl CommandRunner for NothingKnown {
        fn run(&self, _: &str, _: &[&str]) -> Result<CommandOutput> {
            Ok(CommandOutput {
                stdout: String::new(),
                stderr: String::new(),
                exit_code: Some(2),
            })
        }
    }

    fn devices() -> Vec<Device> {
        vec![Device {
            device_node: "/dev/sda".into(),
            name: "disk".into(),
            partitions: vec![
                Partition {
                    path: "/dev/sda1".into(),
                    mount_point: "/boot/efi".into(),
                    file_system: FileSystem::Plain(FileSystemType::Fat32),
                    ..Default::default()
                },
                Partition {
                    path: String::new(),
                    mount_point: "/".into(),
                    file_system: FileSystem::Luks(LuksContainer {
                        inner: Some(FileSystemType::Ext4),
                        mapper_name: "/dev/mapper/luks-root".into(),
                        passphrase: "secret".into(),
                        ..Default::default()
                    }),
                    state: PartitionState::New,
                    roles: vec![PartitionRole::Primary, PartitionRole::Luks],
                    children: Vec::new(),
                },
            ],
        }]
    }

    #[test]
    fn test_records_without_uuids() {
        let job = FillGlobalStorageJob::with_runner(devices(), None, NothingKnown);
        let records = job.create_partition_list();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.uuid.is_empty()));

        let root = &records[1];
        assert_eq!(root.fs, "ext4");
        assert!(root.new);
        let luks = root.luks.as_ref().expect("luks fields");
        assert_eq!(luks.luks_mapper_name, "luks-root");
        assert_eq!(luks.luks_uuid, "");
        assert_eq!(luks.luks_passphrase, "secret");
    }

    #[test]
    fn test_description_lines() {
        let job = FillGlobalStorageJob::with_runner(devices(), Some("/dev/sda".into()), NothingKnown)
            .with_branding(Branding {
                short_product_name: "Acme".into(),
            });
        assert_eq!(
            job.pretty_description(),
            "Set up fat32 partition /dev/sda1 with mount point /boot/efi.\n\
             Install Acme on new ext4 system partition.\n\
             Install boot loader on /dev/sda."
        );
    }

    #[test]
    fn test_empty_bootloader_path_is_none() {
        let job = FillGlobalStorageJob::with_runner(devices(), Some(String::new()), NothingKnown);
        assert_eq!(job.boot_loader_path(), None);
        assert_eq!(job.create_boot_loader_record(), None);
    }

    #[test]
    fn test_bootloader_mount_point_resolves() {
        let job = FillGlobalStorageJob::with_runner(devices(), Some("/boot/efi".into()), NothingKnown);
        assert_eq!(
            job.create_boot_loader_record(),
            Some(BootLoaderRecord {
                install_path: "/dev/sda1".into()
            })
        );
    }

    #[test]
    fn test_exec_writes_both_keys() {
        let mut gs = GlobalStorage::new();
        let job = FillGlobalStorageJob::with_runner(devices(), None, NothingKnown);
        job.exec(&mut gs).unwrap();
        assert_eq!(gs.get::<keys::Partitions>().unwrap().map(|p| p.len()), Some(2));
        assert_eq!(gs.get::<keys::BootLoader>().unwrap(), Some(None));
    }
}
