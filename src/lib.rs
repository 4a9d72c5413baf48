// COVID-19 IL open-data statistics
// Author: Gabriel Demetrios Lafis

//! # covid19-il
//!
//! Descriptive statistics over the COVID-19 datasets published on the Israeli
//! government open-data portal.
//!
//! ## Features
//!
//! - Tables built from `datastore_search` payloads
//! - Coercion of redacted (`"<15"`) and missing counts
//! - Grouped counts, value counts, unique extraction and column statistics
//! - One handler per dataset, behind a registry that builds each handler once
//! - A blocking client for the portal's search API
//!
//! ## Example
//!
//! ```rust
//! use covid19_il::{
//!     api::ResourceId,
//!     handlers::{HandlerOptions, HandlerRegistry},
//!     utils::Logger,
//! };
//! use serde_json::json;
//!
//! let registry = HandlerRegistry::new(Logger::new("example"), HandlerOptions::default());
//! let payload = json!({"result": {"records": [
//!     {"_id": 1, "corona_result": "שלילי"},
//!     {"_id": 2, "corona_result": "חיובי"},
//!     {"_id": 3, "corona_result": "שלילי"}
//! ], "total": 3}});
//!
//! let handler = registry.get_instance(ResourceId::LabTests, &payload);
//! let results = handler.as_lab_tests().unwrap().corona_results();
//! assert_eq!(serde_json::to_string(&results).unwrap(), r#"{"שלילי":2,"חיובי":1}"#);
//! ```

pub mod api;
pub mod data;
pub mod handlers;
pub mod processing;
pub mod storage;
pub mod utils;

// Re-export main types
pub use api::{DataGovClient, DatastoreQuery, ResourceId};
pub use data::{Row, Schema, Table, Value};
pub use handlers::{DataHandler, DatasetHandler, HandlerOptions, HandlerRegistry};
pub use processing::{Aggregate, Outcome, Pipeline};
pub use utils::{Config, Logger};
