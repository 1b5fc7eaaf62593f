//! Site content: the static, ordered module and roadmap records the page
//! renders, plus navigation entries and tracker settings.

pub mod builtin;
pub mod model;
pub mod validation;

pub use model::{
    DEFAULT_SECTION, DEFAULT_THRESHOLDS, ModuleRecord, NavEntry, RoadmapPhase, SiteContent,
    SiteMeta, TrackerSettings,
};
pub use validation::{ValidationResult, Validator, validate};
