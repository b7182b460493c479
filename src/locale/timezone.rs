//! Timezone dataset parsed from tzdata's `zone.tab`.
//!
//! Each line names a zone such as `America/Argentina/Buenos_Aires`. The text up
//! to the first `/` is the region and the rest is the zone. Regions and the
//! zones inside them are kept sorted by name.

use crate::error::{Result, SetupError};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

pub const SYSTEM_ZONE_TAB: &str = "/usr/share/zoneinfo/zone.tab";

const BUNDLED_ZONE_TAB: &str = include_str!("../../data/zone.tab");

static NEXT_DATASET: AtomicU64 = AtomicU64::new(1);

/// Reference to a zone, valid only for the `TimezoneData` that issued it.
///
/// Looking it up in another dataset (even one parsed from the same text) yields
/// nothing. Clones of a dataset accept each other's ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneId {
    dataset: u64,
    index: usize,
}

impl ZoneId {
    /// Position in `TimezoneData::zones()`.
    pub fn index(self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TzZone {
    region: String,
    zone: String,
    country: String,
    latitude: f64,
    longitude: f64,
}

impl TzZone {
    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// ISO 3166 country code.
    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Zone name with underscores shown as spaces, e.g. "New York".
    pub fn display_name(&self) -> String {
        self.zone.replace('_', " ")
    }

    /// The tz identifier, e.g. `Europe/Berlin`.
    pub fn tz_name(&self) -> String {
        format!("{}/{}", self.region, self.zone)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TzRegion {
    name: String,
    zones: Vec<ZoneId>,
}

impl TzRegion {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn zone_ids(&self) -> &[ZoneId] {
        &self.zones
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimezoneData {
    /// Tag stamped into every `ZoneId` this dataset hands out.
    dataset: u64,
    zones: Vec<TzZone>,
    regions: Vec<TzRegion>,
}

impl TimezoneData {
    /// Parse `zone.tab` content. Comment and blank lines are skipped.
    pub fn parse_zone_tab(text: &str) -> Result<Self> {
        let mut zones = Vec::new();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 3 {
                return Err(SetupError::timezone(format!(
                    "line {}: expected at least 3 tab-separated fields",
                    n + 1
                )));
            }
            let Some((region, zone)) = fields[2].split_once('/') else {
                debug!(tz = fields[2], "skipping zone without a region");
                continue;
            };
            let (latitude, longitude) = parse_coordinates(fields[1]).ok_or_else(|| {
                SetupError::timezone(format!("line {}: bad coordinates {:?}", n + 1, fields[1]))
            })?;
            zones.push(TzZone {
                region: region.to_string(),
                zone: zone.to_string(),
                country: fields[0].to_string(),
                latitude,
                longitude,
            });
        }

        zones.sort_by(|a, b| (&a.region, &a.zone).cmp(&(&b.region, &b.zone)));
        zones.dedup_by(|a, b| a.region == b.region && a.zone == b.zone);

        let dataset = NEXT_DATASET.fetch_add(1, Ordering::Relaxed);
        let mut regions: Vec<TzRegion> = Vec::new();
        for (index, z) in zones.iter().enumerate() {
            let id = ZoneId { dataset, index };
            match regions.last_mut() {
                Some(r) if r.name == z.region => r.zones.push(id),
                _ => regions.push(TzRegion {
                    name: z.region.clone(),
                    zones: vec![id],
                }),
            }
        }
        Ok(Self {
            dataset,
            zones,
            regions,
        })
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::parse_zone_tab(&text)
    }

    /// The reduced dataset compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::parse_zone_tab(BUNDLED_ZONE_TAB)
    }

    /// Load `path` (or the system `zone.tab`), falling back to the bundled dataset.
    pub fn load_or_bundled(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(SYSTEM_ZONE_TAB));
        match Self::load_file(path) {
            Ok(data) if !data.is_empty() => Ok(data),
            Ok(_) => {
                warn!(path = %path.display(), "zone.tab has no zones, using bundled timezone data");
                Self::bundled()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "using bundled timezone data");
                Self::bundled()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn regions(&self) -> &[TzRegion] {
        &self.regions
    }

    pub fn region(&self, name: &str) -> Option<&TzRegion> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// `None` if `id` was issued by a different dataset.
    pub fn zone(&self, id: ZoneId) -> Option<&TzZone> {
        if id.dataset != self.dataset {
            return None;
        }
        self.zones.get(id.index)
    }

    pub fn zones(&self) -> impl Iterator<Item = (ZoneId, &TzZone)> {
        let dataset = self.dataset;
        self.zones
            .iter()
            .enumerate()
            .map(move |(index, z)| (ZoneId { dataset, index }, z))
    }

    /// Zones of `region`, sorted by name; empty for an unknown region.
    pub fn zones_in_region(&self, region: &str) -> impl Iterator<Item = &TzZone> {
        self.region(region)
            .map(|r| r.zones.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.zone(*id))
    }

    pub fn find(&self, region: &str, zone: &str) -> Option<ZoneId> {
        self.region(region)?
            .zones
            .iter()
            .copied()
            .find(|id| self.zones.get(id.index).is_some_and(|z| z.zone == zone))
    }
}

/// ISO 6709 `±DDMM±DDDMM` or `±DDMMSS±DDDMMSS` into decimal degrees.
fn parse_coordinates(s: &str) -> Option<(f64, f64)> {
    let split = s.get(1..)?.find(|c| c == '+' || c == '-')? + 1;
    let (lat, lon) = s.split_at(split);
    Some((parse_angle(lat, 2)?, parse_angle(lon, 3)?))
}

fn parse_angle(s: &str, degree_digits: usize) -> Option<f64> {
    let sign = match s.chars().next()? {
        '+' => 1.0,
        '-' => -1.0,
        _ => return None,
    };
    let digits = &s[1..];
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let field = |from: usize, len: usize| digits.get(from..from + len)?.parse::<f64>().ok();
    let (minutes, seconds) = match digits.len().checked_sub(degree_digits)? {
        2 => (field(degree_digits, 2)?, 0.0),
        4 => (field(degree_digits, 2)?, field(degree_digits + 2, 2)?),
        _ => return None,
    };
    let degrees = field(0, degree_digits)?;
    Some(sign * (degrees + minutes / 60.0 + seconds / 3600.0))
}
