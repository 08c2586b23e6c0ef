pub mod errors;
pub mod models;

pub use errors::{InvalidPriority, UnknownChangeFreq};
pub use models::{Callback, ChangeFreq, MetaField, Page, Param, ParamAssignment, Priority, Site, SiteMapUrl};
