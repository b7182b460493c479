//! Partition module: turn the decided layout into records for later steps.

pub mod device;
pub mod job;
pub mod record;
pub mod uuid;

pub use device::{
    Device, FileSystem, LuksContainer, Partition, all_partitions, find_partition_by_mount_point,
    validate_devices,
};
pub use job::FillGlobalStorageJob;
pub use record::{BootLoaderRecord, LuksRecord, PartitionRecord};
pub use uuid::UuidProbe;
