//! LocaleConfig: state behind the locale and timezone screen.
//!
//! The screen shows a region list and the zones of the chosen region. The
//! selected location is observable, so views can subscribe instead of polling.
//! When the installer moves on, `create_jobs` turns the selection into jobs.

use super::job::SetTimezoneJob;
use super::model::StringListModel;
use super::observable::{ListenerId, Observable};
use super::timezone::{TimezoneData, TzZone, ZoneId};
use crate::config_file::LocaleSettings;
use crate::error::Result;
use crate::job::Job;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub const DEFAULT_LOCALE_GEN: &str = "/etc/locale.gen";

#[derive(Debug)]
pub struct LocaleConfig {
    /// Entries such as `en_US.UTF-8 UTF-8`.
    supported_locales: Vec<String>,
    timezones: TimezoneData,
    region_model: StringListModel,
    zones_model: StringListModel,
    current_location: Observable<Option<TzZone>>,
}

impl LocaleConfig {
    pub fn new(timezones: TimezoneData, supported_locales: Vec<String>) -> Self {
        let regions = timezones.regions().iter().map(|r| r.name().to_string()).collect();
        Self {
            supported_locales,
            timezones,
            region_model: StringListModel::new(regions),
            zones_model: StringListModel::default(),
            current_location: Observable::new(None),
        }
    }

    /// Build from settings: timezone data and locale.gen come from the
    /// configured paths or the system defaults.
    pub fn from_settings(settings: &LocaleSettings) -> Result<Self> {
        let timezones = TimezoneData::load_or_bundled(settings.zone_tab_path.as_deref())?;
        let locale_gen = settings
            .locale_gen_path
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_LOCALE_GEN));
        let mut config = Self::new(timezones, load_locale_gen(locale_gen));
        config.set_configuration(settings);
        Ok(config)
    }

    /// Apply the configured default location, unless one is already chosen.
    pub fn set_configuration(&mut self, settings: &LocaleSettings) {
        if self.current_location().is_some() {
            return;
        }
        if let (Some(region), Some(zone)) = (&settings.region, &settings.zone) {
            if !self.set_current_location(region, zone) {
                warn!(region = %region, zone = %zone, "configured default location is unknown");
            }
        }
    }

    pub fn supported_locales(&self) -> &[String] {
        &self.supported_locales
    }

    pub fn region_model(&self) -> &StringListModel {
        &self.region_model
    }

    /// Zones of the selected region.
    pub fn zones_model(&self) -> &StringListModel {
        &self.zones_model
    }

    pub fn timezone_data(&self) -> &TimezoneData {
        &self.timezones
    }

    pub fn current_location(&self) -> Option<&TzZone> {
        self.current_location.get().as_ref()
    }

    /// Show `region`'s zones without changing the location. False if unknown.
    pub fn select_region(&mut self, region: &str) -> bool {
        let Some(index) = self.region_model.index_of(region) else {
            return false;
        };
        if self.region_model.current_index() != Some(index) {
            self.region_model.set_current_index(Some(index));
            let zones = self
                .timezones
                .zones_in_region(region)
                .map(|z| z.zone().to_string())
                .collect();
            self.zones_model.set_items(zones);
        }
        true
    }

    /// Set the location by name. An unknown pair leaves everything unchanged
    /// and returns false.
    pub fn set_current_location(&mut self, region: &str, zone: &str) -> bool {
        match self.timezones.find(region, zone) {
            Some(id) => self.set_current_location_by_id(id),
            None => {
                debug!(region, zone, "ignoring unknown location");
                false
            }
        }
    }

    /// Set the location by reference into `timezone_data()`. False if `id`
    /// is not part of this dataset.
    pub fn set_current_location_by_id(&mut self, id: ZoneId) -> bool {
        let Some(zone) = self.timezones.zone(id).cloned() else {
            return false;
        };
        self.select_region(zone.region());
        self.zones_model.set_current_index(self.zones_model.index_of(zone.zone()));
        debug!(timezone = %zone.tz_name(), "current location");
        self.current_location.set(Some(zone));
        true
    }

    /// Called with the new location each time it actually changes.
    pub fn on_current_location_changed(
        &mut self,
        mut listener: impl FnMut(Option<&TzZone>) + 'static,
    ) -> ListenerId {
        self.current_location.subscribe(move |loc| listener(loc.as_ref()))
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.current_location.unsubscribe(id)
    }

    /// Jobs that apply the selection; none if no location was chosen.
    pub fn create_jobs(&self) -> Vec<Box<dyn Job>> {
        match self.current_location() {
            Some(loc) => vec![Box::new(SetTimezoneJob::new(loc.region(), loc.zone()))],
            None => Vec::new(),
        }
    }
}

/// Entries of a `locale.gen` file, commented-out ones included.
///
/// Lines starting with `# ` or consisting of a bare `#` are prose and skipped.
/// A `#` directly in front of an entry only disables it, so the entry is kept.
pub fn parse_locale_gen(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.starts_with("# ") && line.trim() != "#")
        .map(|line| simplify(&simplify(line).replace('#', "")))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Read and parse `path`; a missing or unreadable file yields no locales.
pub fn load_locale_gen(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(text) => parse_locale_gen(&text),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read locale list");
            Vec::new()
        }
    }
}

fn simplify(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const ZONES: &str = "DE\t+5230+01322\tEurope/Berlin\n\
        FR\t+4852+00220\tEurope/Paris\n\
        US\t+404251-0740023\tAmerica/New_York\n";

    fn config() -> LocaleConfig {
        LocaleConfig::new(
            TimezoneData::parse_zone_tab(ZONES).unwrap(),
            vec!["en_US.UTF-8 UTF-8".into()],
        )
    }

    #[test]
    fn test_locale_gen_parsing() {
        let text = "# This file lists locales\n\
            #\n\
            #  en_GB.UTF-8 UTF-8\n\
            #de_DE.UTF-8 UTF-8\n\
            en_US.UTF-8   UTF-8\n\
            \n\
            #  \n";
        assert_eq!(
            parse_locale_gen(text),
            vec!["de_DE.UTF-8 UTF-8".to_string(), "en_US.UTF-8 UTF-8".to_string()]
        );
    }

    #[test]
    fn test_region_model_lists_regions() {
        let c = config();
        assert_eq!(c.region_model().items(), &["America".to_string(), "Europe".to_string()]);
        assert!(c.zones_model().is_empty());
        assert!(c.current_location().is_none());
    }

    #[test]
    fn test_set_location_updates_models() {
        let mut c = config();
        assert!(c.set_current_location("Europe", "Paris"));
        assert_eq!(c.current_location().unwrap().tz_name(), "Europe/Paris");
        assert_eq!(c.region_model().current_item(), Some("Europe"));
        assert_eq!(c.zones_model().items(), &["Berlin".to_string(), "Paris".to_string()]);
        assert_eq!(c.zones_model().current_item(), Some("Paris"));
    }

    #[test]
    fn test_unknown_location_is_noop() {
        let mut c = config();
        c.set_current_location("Europe", "Berlin");
        assert!(!c.set_current_location("Europe", "Atlantis"));
        assert!(!c.set_current_location("Mars", "Olympus"));
        assert_eq!(c.current_location().unwrap().zone(), "Berlin");
    }

    #[test]
    fn test_zone_id_from_other_dataset_is_noop() {
        let mut c = config();
        c.set_current_location("Europe", "Berlin");

        // Same text, separate dataset: its ids are foreign to `c`.
        let other = TimezoneData::parse_zone_tab(ZONES).unwrap();
        let paris = other.find("Europe", "Paris").unwrap();
        assert!(!c.set_current_location_by_id(paris));
        assert_eq!(c.current_location().unwrap().zone(), "Berlin");
    }

    #[test]
    fn test_listener_fires_once_per_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut c = config();
        let sink = Rc::clone(&seen);
        c.on_current_location_changed(move |loc| {
            sink.borrow_mut().push(loc.map(|z| z.tz_name()));
        });

        c.set_current_location("Europe", "Berlin");
        c.set_current_location("Europe", "Berlin");
        c.set_current_location("Nowhere", "Berlin");
        let paris = c.timezone_data().find("Europe", "Paris").unwrap();
        c.set_current_location_by_id(paris);

        assert_eq!(
            *seen.borrow(),
            vec![Some("Europe/Berlin".to_string()), Some("Europe/Paris".to_string())]
        );
    }

    #[test]
    fn test_create_jobs() {
        let mut c = config();
        assert!(c.create_jobs().is_empty());
        c.set_current_location("America", "New_York");
        let jobs = c.create_jobs();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].pretty_name(), "Set timezone to America/New_York");
    }

    #[test]
    fn test_configuration_default_applies_once() {
        let mut c = config();
        let settings = LocaleSettings {
            region: Some("Europe".into()),
            zone: Some("Berlin".into()),
            ..Default::default()
        };
        c.set_configuration(&settings);
        assert_eq!(c.current_location().unwrap().zone(), "Berlin");

        c.set_current_location("Europe", "Paris");
        c.set_configuration(&settings);
        assert_eq!(c.current_location().unwrap().zone(), "Paris");
    }
}
