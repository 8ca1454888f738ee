//! Reflector DNS Domain Layer
pub mod config;
pub mod dns_record;
pub mod errors;
pub mod lookup;
pub mod query_key;

pub use config::{CliOverrides, Config, ConfigError, ReflectorSettings};
pub use dns_record::RecordType;
pub use errors::DomainError;
pub use lookup::{LookupReport, LookupSelection, MxRecord};
pub use query_key::{normalize_name, QueryKey};
