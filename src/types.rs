//! Type-safe vocabulary shared by the partition modules.
//!
//! Filesystem kinds and partition states are plain enums with strum-derived
//! string forms. The strum form is the canonical (untranslated) name that later
//! installation steps match on, such as "ext4" or "linuxswap".

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Filesystem kinds a partition can carry, excluding encryption containers.
///
/// LUKS is not listed here: an encrypted partition is
/// `partition::FileSystem::Luks`, which wraps one of these as its inner filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum FileSystemType {
    #[default]
    #[strum(serialize = "unknown")]
    #[serde(rename = "unknown")]
    Unknown,
    #[strum(serialize = "unformatted")]
    #[serde(rename = "unformatted")]
    Unformatted,
    /// Container for logical partitions on MBR disks
    #[strum(serialize = "extended")]
    #[serde(rename = "extended")]
    Extended,
    #[strum(serialize = "ext2")]
    #[serde(rename = "ext2")]
    Ext2,
    #[strum(serialize = "ext3")]
    #[serde(rename = "ext3")]
    Ext3,
    #[strum(serialize = "ext4")]
    #[serde(rename = "ext4")]
    Ext4,
    #[strum(serialize = "linuxswap")]
    #[serde(rename = "linuxswap")]
    LinuxSwap,
    #[strum(serialize = "fat16")]
    #[serde(rename = "fat16")]
    Fat16,
    #[strum(serialize = "fat32")]
    #[serde(rename = "fat32")]
    Fat32,
    #[strum(serialize = "exfat")]
    #[serde(rename = "exfat")]
    Exfat,
    #[strum(serialize = "ntfs")]
    #[serde(rename = "ntfs")]
    Ntfs,
    #[strum(serialize = "btrfs")]
    #[serde(rename = "btrfs")]
    Btrfs,
    #[strum(serialize = "xfs")]
    #[serde(rename = "xfs")]
    Xfs,
    #[strum(serialize = "jfs")]
    #[serde(rename = "jfs")]
    Jfs,
    #[strum(serialize = "f2fs")]
    #[serde(rename = "f2fs")]
    F2fs,
    #[strum(serialize = "reiserfs")]
    #[serde(rename = "reiserfs")]
    ReiserFs,
    #[strum(serialize = "hfsplus")]
    #[serde(rename = "hfsplus")]
    HfsPlus,
    #[strum(serialize = "zfs")]
    #[serde(rename = "zfs")]
    Zfs,
    #[strum(serialize = "bcachefs")]
    #[serde(rename = "bcachefs")]
    Bcachefs,
    /// LVM physical volume
    #[strum(serialize = "lvm2 pv")]
    #[serde(rename = "lvm2 pv")]
    LvmPv,
}

impl FileSystemType {
    /// Name shown to the user.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Unformatted => "unformatted",
            Self::Extended => "extended",
            Self::Ext2 => "ext2",
            Self::Ext3 => "ext3",
            Self::Ext4 => "ext4",
            Self::LinuxSwap => "Linux swap",
            Self::Fat16 => "FAT16",
            Self::Fat32 => "FAT32",
            Self::Exfat => "exFAT",
            Self::Ntfs => "NTFS",
            Self::Btrfs => "Btrfs",
            Self::Xfs => "XFS",
            Self::Jfs => "JFS",
            Self::F2fs => "F2FS",
            Self::ReiserFs => "ReiserFS",
            Self::HfsPlus => "HFS+",
            Self::Zfs => "ZFS",
            Self::Bcachefs => "bcachefs",
            Self::LvmPv => "LVM2 PV",
        }
    }

    /// Whether `blkid` can report a filesystem UUID for this kind.
    pub fn has_uuid(self) -> bool {
        !matches!(self, Self::Unknown | Self::Unformatted | Self::Extended)
    }
}

/// On-disk LUKS header version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum LuksVersion {
    #[default]
    #[strum(serialize = "luks")]
    #[serde(rename = "luks")]
    Luks1,
    #[strum(serialize = "luks2")]
    #[serde(rename = "luks2")]
    Luks2,
}

impl LuksVersion {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Luks1 => "LUKS",
            Self::Luks2 => "LUKS2",
        }
    }
}

/// Where a partition is in its lifecycle relative to the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PartitionState {
    /// Already on disk and left as is
    #[default]
    Existing,
    /// Will be created by the partitioning step
    New,
    /// Will be copied from another partition
    Copy,
    /// Will be restored from a backup
    Restore,
}

/// What a partition is for in the table. A partition can hold several roles,
/// e.g. `primary` and `luks` for an encrypted primary partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PartitionRole {
    Primary,
    Extended,
    Logical,
    Unallocated,
    /// Carries a LUKS container
    Luks,
    /// LVM logical volume
    #[strum(serialize = "lvmlv")]
    #[serde(rename = "lvmlv")]
    LvmLv,
}
