//! Best-effort UUID queries against block devices.
//!
//! Both probes shell out through a `CommandRunner` and turn every failure into
//! `None`: a partition without a readable UUID must never stop the installer.

use super::device::{FileSystem, Partition};
use crate::command_runner::CommandRunner;
use tracing::debug;

/// `blkid -s UUID -o value <path>`
pub const BLKID: &str = "blkid";
/// `cryptsetup luksUUID <path>`
pub const CRYPTSETUP: &str = "cryptsetup";

pub struct UuidProbe<'r> {
    runner: &'r dyn CommandRunner,
}

impl<'r> UuidProbe<'r> {
    pub fn new(runner: &'r dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// UUID of the filesystem on `partition`.
    ///
    /// For an opened LUKS container with an inner filesystem this is the inner
    /// filesystem's UUID, read through the mapper device.
    pub fn filesystem_uuid(&self, partition: &Partition) -> Option<String> {
        if partition.path.is_empty() {
            return None;
        }
        let target = match &partition.file_system {
            FileSystem::Plain(t) if !t.has_uuid() => return None,
            FileSystem::Plain(_) => partition.path.as_str(),
            FileSystem::Luks(c) if c.inner.is_some() && !c.mapper_name.is_empty() => {
                c.mapper_name.as_str()
            }
            FileSystem::Luks(_) => partition.path.as_str(),
        };
        self.query(BLKID, &["-s", "UUID", "-o", "value", target])
    }

    /// UUID of the LUKS header on `path`.
    pub fn luks_uuid(&self, path: &str) -> Option<String> {
        if path.is_empty() {
            return None;
        }
        self.query(CRYPTSETUP, &["luksUUID", path])
    }

    fn query(&self, program: &str, args: &[&str]) -> Option<String> {
        match self.runner.run(program, args) {
            Ok(out) => {
                let uuid = out.trimmed_stdout();
                if uuid.is_none() {
                    debug!(program, ?args, exit_code = ?out.exit_code, "no UUID reported");
                }
                uuid
            }
            Err(e) => {
                debug!(program, ?args, error = %e, "UUID query failed");
                None
            }
        }
    }
}
