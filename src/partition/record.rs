//! Records written to global storage for later installation steps.

use serde::{Deserialize, Serialize};

/// One partition's role in the installed system.
///
/// `uuid` and the LUKS fields are best-effort and may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionRecord {
    /// Partition path; empty if the partition has not been created yet.
    pub device: String,
    pub mount_point: String,
    /// Display name of the filesystem.
    pub fs_name: String,
    /// Canonical filesystem name, e.g. `ext4`.
    pub fs: String,
    pub uuid: String,
    pub new: bool,
    /// Present only for LUKS containers.
    #[serde(flatten)]
    pub luks: Option<LuksRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LuksRecord {
    pub luks_mapper_name: String,
    pub luks_uuid: String,
    pub luks_passphrase: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootLoaderRecord {
    pub install_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_record_has_no_luks_keys() {
        let record = PartitionRecord {
            device: "/dev/sda1".into(),
            mount_point: "/".into(),
            fs_name: "ext4".into(),
            fs: "ext4".into(),
            uuid: String::new(),
            new: false,
            luks: None,
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "device": "/dev/sda1",
                "mountPoint": "/",
                "fsName": "ext4",
                "fs": "ext4",
                "uuid": "",
                "new": false
            })
        );
    }

    #[test]
    fn test_luks_fields_are_flattened() {
        let record = PartitionRecord {
            device: "/dev/sda2".into(),
            fs: "btrfs".into(),
            luks: Some(LuksRecord {
                luks_mapper_name: "luks-root".into(),
                luks_uuid: "1111-2222".into(),
                luks_passphrase: "hunter2".into(),
            }),
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["luksMapperName"], "luks-root");
        assert_eq!(value["luksUuid"], "1111-2222");
        assert_eq!(value["luksPassphrase"], "hunter2");

        let back: PartitionRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}
