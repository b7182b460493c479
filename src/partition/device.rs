//! Device and partition topology as decided by the partitioning step.
//!
//! This is a snapshot handed to us, usually as JSON; nothing here touches a
//! disk. Extended partitions carry their logical partitions as `children`,
//! and iteration walks them depth-first in on-disk order.

use crate::error::{Result, SetupError};
use crate::types::{FileSystemType, LuksVersion, PartitionRole, PartitionState};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A LUKS container and what is (or will be) inside it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LuksContainer {
    #[serde(default)]
    pub version: LuksVersion,
    /// Filesystem inside the container, when one was detected or planned.
    #[serde(default)]
    pub inner: Option<FileSystemType>,
    /// Mapper device, e.g. `/dev/mapper/luks-1234`.
    #[serde(default)]
    pub mapper_name: String,
    #[serde(default)]
    pub passphrase: String,
}

impl LuksContainer {
    /// Last path segment of the mapper device.
    pub fn mapper_basename(&self) -> &str {
        self.mapper_name.rsplit('/').next().unwrap_or_default()
    }
}

/// What a partition is formatted with.
///
/// In JSON, a plain filesystem is its canonical name (`"ext4"`). A LUKS container
/// is an object: `{"version": "luks2", "inner": "ext4", "mapperName": ..., "passphrase": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileSystem {
    Plain(FileSystemType),
    Luks(LuksContainer),
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::Plain(FileSystemType::Unformatted)
    }
}

impl FileSystem {
    pub fn luks(&self) -> Option<&LuksContainer> {
        match self {
            Self::Luks(c) => Some(c),
            Self::Plain(_) => None,
        }
    }

    /// The filesystem the installed system will mount: the inner one for a LUKS
    /// container that has one.
    pub fn effective_type(&self) -> Option<FileSystemType> {
        match self {
            Self::Plain(t) => Some(*t),
            Self::Luks(c) => c.inner,
        }
    }

    /// Canonical name, e.g. `ext4`, or `luks2` for a container with no inner filesystem.
    pub fn canonical_name(&self) -> String {
        match self {
            Self::Luks(LuksContainer { inner: None, version, .. }) => version.to_string(),
            _ => self.effective_type().unwrap_or_default().to_string(),
        }
    }

    /// Name shown to the user.
    pub fn display_name(&self) -> String {
        match self {
            Self::Luks(LuksContainer { inner: None, version, .. }) => {
                version.display_name().to_string()
            }
            _ => self.effective_type().unwrap_or_default().display_name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partition {
    /// Device node, e.g. `/dev/sda1`. Empty while the partition does not exist yet.
    #[serde(default)]
    pub path: String,
    /// Where the installed system mounts it; empty when unmounted.
    #[serde(default)]
    pub mount_point: String,
    #[serde(default)]
    pub file_system: FileSystem,
    #[serde(default)]
    pub state: PartitionState,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<PartitionRole>,
    /// Logical partitions inside an extended partition.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Partition>,
}

impl Partition {
    pub fn is_new(&self) -> bool {
        self.state == PartitionState::New
    }

    pub fn has_role(&self, role: PartitionRole) -> bool {
        self.roles.contains(&role)
    }

    /// The LUKS container, if the partition has the LUKS role and is one.
    pub fn luks_container(&self) -> Option<&LuksContainer> {
        if !self.has_role(PartitionRole::Luks) {
            return None;
        }
        self.file_system.luks()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Disk node, e.g. `/dev/sda`.
    pub device_node: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub partitions: Vec<Partition>,
}

impl Device {
    /// All partitions, depth-first, children right after their parent.
    pub fn iter_partitions(&self) -> PartitionIter<'_> {
        PartitionIter {
            stack: self.partitions.iter().rev().collect(),
        }
    }
}

/// Depth-first walk over a device's partition tree.
pub struct PartitionIter<'a> {
    stack: Vec<&'a Partition>,
}

impl<'a> Iterator for PartitionIter<'a> {
    type Item = &'a Partition;

    fn next(&mut self) -> Option<Self::Item> {
        let p = self.stack.pop()?;
        self.stack.extend(p.children.iter().rev());
        Some(p)
    }
}

/// Every partition on every device, in device order.
pub fn all_partitions(devices: &[Device]) -> impl Iterator<Item = &Partition> {
    devices.iter().flat_map(Device::iter_partitions)
}

/// First partition, across all devices, that will be mounted at `mount_point`.
pub fn find_partition_by_mount_point<'a>(
    devices: &'a [Device],
    mount_point: &str,
) -> Option<&'a Partition> {
    all_partitions(devices).find(|p| p.mount_point == mount_point)
}

/// Reject topologies that later steps could not make sense of.
///
/// Checks: device nodes are `/dev/` paths, partition paths are `/dev/` paths
/// (or empty for new partitions), mount points are absolute, and neither paths
/// nor mount points repeat.
pub fn validate_devices(devices: &[Device]) -> Result<()> {
    let mut paths = HashSet::new();
    let mut mounts = HashSet::new();

    for device in devices {
        if !device.device_node.starts_with("/dev/") {
            return Err(SetupError::topology(format!(
                "device node {:?} is not under /dev/",
                device.device_node
            )));
        }
        for p in device.iter_partitions() {
            if p.path.is_empty() {
                if !p.is_new() {
                    return Err(SetupError::topology(format!(
                        "partition on {} has no path but is not new",
                        device.device_node
                    )));
                }
            } else if !p.path.starts_with("/dev/") {
                return Err(SetupError::topology(format!(
                    "partition path {:?} is not under /dev/",
                    p.path
                )));
            } else if !paths.insert(p.path.as_str()) {
                return Err(SetupError::topology(format!("partition {} listed twice", p.path)));
            }

            if p.mount_point.is_empty() {
                continue;
            }
            if !p.mount_point.starts_with('/') {
                return Err(SetupError::topology(format!(
                    "mount point {:?} is not absolute",
                    p.mount_point
                )));
            }
            if !mounts.insert(p.mount_point.as_str()) {
                return Err(SetupError::topology(format!(
                    "mount point {} used by more than one partition",
                    p.mount_point
                )));
            }
        }
    }
    Ok(())
}
