// Quarantine dataset handler
// Author: Gabriel Demetrios Lafis

use serde_json::Value as JsonValue;

use crate::api::ResourceId;
use crate::processing::Outcome;
use crate::utils::Logger;
use super::{bool_arg, unknown_method, DataHandler, HandlerBase, HandlerOptions, QueryError};

const ISOLATED_TODAY_CONTACT_WITH_CONFIRMED: &str = "isolated_today_contact_with_confirmed";
const ISOLATED_TODAY_ABROAD: &str = "isolated_today_abroad";
const NEW_CONTACT_WITH_CONFIRMED: &str = "new_contact_with_confirmed";
const NEW_FROM_ABROAD: &str = "new_from_abroad";

/// Each query is named after the column it reads
const METHODS: &[&str] = &[
    ISOLATED_TODAY_CONTACT_WITH_CONFIRMED,
    ISOLATED_TODAY_ABROAD,
    NEW_CONTACT_WITH_CONFIRMED,
    NEW_FROM_ABROAD,
];

pub struct QuarantineHandler {
    base: HandlerBase,
}

impl QuarantineHandler {
    pub fn new(logger: Logger, payload: &JsonValue, options: &HandlerOptions) -> Self {
        QuarantineHandler {
            base: HandlerBase::new(logger, payload, options),
        }
    }

    pub fn method_names() -> &'static [&'static str] {
        METHODS
    }

    pub fn isolated_today_contact_with_confirmed(&self) -> Outcome {
        self.base.get_data_by_column(ISOLATED_TODAY_CONTACT_WITH_CONFIRMED, false)
    }

    pub fn isolated_today_abroad(&self) -> Outcome {
        self.base.get_data_by_column(ISOLATED_TODAY_ABROAD, false)
    }

    pub fn new_contact_with_confirmed(&self) -> Outcome {
        self.base.get_data_by_column(NEW_CONTACT_WITH_CONFIRMED, false)
    }

    pub fn new_from_abroad(&self) -> Outcome {
        self.base.get_data_by_column(NEW_FROM_ABROAD, false)
    }
}

impl DataHandler for QuarantineHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn resource_id(&self) -> ResourceId {
        ResourceId::Quarantine
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    /// Newest day first unless the argument asks for ascending order
    fn query(&self, method: &str, arg: Option<&str>) -> Result<Outcome, QueryError> {
        match METHODS.iter().find(|m| **m == method) {
            Some(column) => Ok(self.base.get_data_by_column(column, bool_arg(method, arg, false)?)),
            None => Err(unknown_method(self.resource_id(), method)),
        }
    }
}
