//! setupkit library
//!
//! Installer modules that gather locale choices and publish the partition
//! layout, plus the job queue and global storage they run against.

pub mod cli;
pub mod command_runner;
pub mod config_file;
pub mod error;
pub mod global_storage;
pub mod job;
pub mod locale;
pub mod partition;
pub mod process_guard;
pub mod types;

// Re-export main types for convenience
pub use command_runner::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use config_file::{Branding, InstallerSettings, LocaleSettings, PartitionSettings};
pub use error::{Result, SetupError};
pub use global_storage::{GlobalStorage, StorageKey, keys};
pub use job::{Job, JobError, JobQueue, JobResult, QueueReport};
pub use locale::{LocaleConfig, SetTimezoneJob, TimezoneData, TzZone, ZoneId};
pub use partition::{
    BootLoaderRecord, Device, FileSystem, FillGlobalStorageJob, LuksContainer, Partition,
    PartitionRecord,
};
pub use process_guard::{ChildRegistry, CommandProcessGroup, ProcessGuard};
pub use types::{FileSystemType, LuksVersion, PartitionRole, PartitionState};
