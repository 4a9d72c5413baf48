// Dataset handlers over the open-data COVID-19 resources
// Author: Gabriel Demetrios Lafis

mod age_gender;
mod area;
mod base;
mod cities;
mod dataset;
mod deaths;
mod hospitalized;
mod medical_staff_morbidity;
mod quarantine;
mod recovered;
mod registry;
mod tested_individuals;
mod tested_individuals_scores;
mod young_population;

pub use age_gender::*;
pub use area::*;
pub use base::*;
pub use cities::*;
pub use dataset::*;
pub use deaths::*;
pub use hospitalized::*;
pub use lab_tests::*;
pub use medical_staff_morbidity::*;
pub use quarantine::*;
pub use recovered::*;
pub use registry::*;
pub use tested_individuals::*;
pub use tested_individuals_scores::*;
pub use young_population::*;

use std::time::Duration;

use thiserror::Error;

use crate::api::ResourceId;
use crate::processing::Outcome;
use crate::storage::DEFAULT_CAPACITY;
use crate::utils::{Config, ValidationError};

/// Construction options shared by all handlers
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerOptions {
    /// Seed of the placeholder RNG; `None` seeds from entropy
    pub seed: Option<u64>,
    pub cache_capacity: usize,
    pub cache_ttl: Option<Duration>,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        HandlerOptions {
            seed: None,
            cache_capacity: DEFAULT_CAPACITY,
            cache_ttl: None,
        }
    }
}

impl From<&Config> for HandlerOptions {
    fn from(config: &Config) -> Self {
        HandlerOptions {
            seed: config.coercion.seed,
            cache_capacity: config.cache.capacity,
            cache_ttl: config.cache.ttl(),
        }
    }
}

/// Lifecycle of a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    /// Payload received but no table could be built from it
    Loaded,
    /// Table built; queries run, possibly returning no data
    Queryable,
}

/// Rejected call to a handler's dynamic query entry point
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("{resource} has no query named '{method}'")]
    UnknownMethod { resource: ResourceId, method: String },

    #[error("query '{method}' requires an argument")]
    MissingArgument { method: String },

    #[error("invalid argument '{value}' for query '{method}'")]
    InvalidArgument { method: String, value: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Query interface common to all dataset handlers
pub trait DataHandler {
    fn base(&self) -> &HandlerBase;

    fn resource_id(&self) -> ResourceId;

    /// Names accepted by [`DataHandler::query`]
    fn methods(&self) -> &'static [&'static str];

    /// Run a query by name, with an optional string argument
    fn query(&self, method: &str, arg: Option<&str>) -> Result<Outcome, QueryError>;

    fn state(&self) -> HandlerState {
        self.base().state()
    }

    fn total_number(&self) -> i64 {
        self.base().total_number()
    }
}

fn unknown_method(resource: ResourceId, method: &str) -> QueryError {
    QueryError::UnknownMethod {
        resource,
        method: method.to_string(),
    }
}

fn invalid_arg(method: &str, value: &str) -> QueryError {
    QueryError::InvalidArgument {
        method: method.to_string(),
        value: value.to_string(),
    }
}

fn require_arg<'a>(method: &str, arg: Option<&'a str>) -> Result<&'a str, QueryError> {
    arg.ok_or_else(|| QueryError::MissingArgument {
        method: method.to_string(),
    })
}

fn bool_arg(method: &str, arg: Option<&str>, default: bool) -> Result<bool, QueryError> {
    match arg.map(|a| a.trim().to_lowercase()) {
        None => Ok(default),
        Some(a) if a == "true" || a == "1" || a == "asc" => Ok(true),
        Some(a) if a == "false" || a == "0" || a == "desc" => Ok(false),
        Some(a) => Err(QueryError::InvalidArgument {
            method: method.to_string(),
            value: a,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_arg() {
        assert_eq!(bool_arg("m", None, true), Ok(true));
        assert_eq!(bool_arg("m", Some("DESC"), true), Ok(false));
        assert!(bool_arg("m", Some("sideways"), true).is_err());
    }

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        config.coercion.seed = Some(5);
        config.cache.capacity = 3;
        let options = HandlerOptions::from(&config);
        assert_eq!(options.seed, Some(5));
        assert_eq!(options.cache_capacity, 3);
        assert_eq!(options.cache_ttl, None);
    }
}
