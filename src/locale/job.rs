//! SetTimezoneJob: apply the chosen location.
//!
//! Records `locationRegion`/`locationZone` for later steps. When the target
//! root is known (`rootMountPoint`), it also points `etc/localtime` in the
//! target at the zoneinfo file and writes `etc/timezone`.

use crate::global_storage::{GlobalStorage, keys};
use crate::job::{Job, JobError, JobResult};
use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Location of zoneinfo inside the target system.
pub const ZONEINFO_DIR: &str = "/usr/share/zoneinfo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetTimezoneJob {
    region: String,
    zone: String,
}

impl SetTimezoneJob {
    pub fn new(region: impl Into<String>, zone: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            zone: zone.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    fn tz_name(&self) -> String {
        format!("{}/{}", self.region, self.zone)
    }

    fn apply_to_target(&self, root: &Path) -> Result<(), JobError> {
        let zoneinfo = PathBuf::from(ZONEINFO_DIR).join(&self.region).join(&self.zone);
        let in_target = root.join(zoneinfo.strip_prefix("/").unwrap_or(&zoneinfo));
        if !in_target.is_file() {
            return Err(JobError::new(
                "Bad timezone",
                format!("{} does not exist in the target system", zoneinfo.display()),
            ));
        }

        let etc = root.join("etc");
        let write = || -> io::Result<()> {
            fs::create_dir_all(&etc)?;
            let localtime = etc.join("localtime");
            if localtime.symlink_metadata().is_ok() {
                fs::remove_file(&localtime)?;
            }
            symlink(&zoneinfo, &localtime)?;
            fs::write(etc.join("timezone"), format!("{}\n", self.tz_name()))
        };
        write().map_err(|e| {
            JobError::new("Cannot set timezone.", format!("{}: {}", etc.display(), e))
        })?;
        info!(timezone = %self.tz_name(), root = %root.display(), "timezone set in target");
        Ok(())
    }
}

impl Job for SetTimezoneJob {
    fn pretty_name(&self) -> String {
        format!("Set timezone to {}", self.tz_name())
    }

    fn pretty_description(&self) -> String {
        format!("Set timezone to {}.", self.tz_name())
    }

    fn pretty_status_message(&self) -> String {
        "Setting timezone.".to_string()
    }

    fn exec(&self, storage: &mut GlobalStorage) -> JobResult {
        storage.insert::<keys::LocationRegion>(&self.region)?;
        storage.insert::<keys::LocationZone>(&self.zone)?;

        match storage.get::<keys::RootMountPoint>()? {
            Some(root) if !root.is_empty() => self.apply_to_target(Path::new(&root)),
            _ => {
                debug!("no rootMountPoint, timezone only recorded in global storage");
                Ok(())
            }
        }
    }
}
