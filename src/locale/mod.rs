//! Locale module: supported locales, timezone selection and the job that applies it.

pub mod config;
pub mod job;
pub mod model;
pub mod observable;
pub mod timezone;

pub use config::{LocaleConfig, load_locale_gen, parse_locale_gen};
pub use job::SetTimezoneJob;
pub use model::StringListModel;
pub use observable::{ListenerId, Observable};
pub use timezone::{TimezoneData, TzRegion, TzZone, ZoneId};
