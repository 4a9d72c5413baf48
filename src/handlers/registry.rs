// Registry keeping one handler per resource id
// Author: Gabriel Demetrios Lafis

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value as JsonValue;

use crate::api::ResourceId;
use crate::utils::Logger;
use super::{DatasetHandler, HandlerOptions};

/// Construct-on-first-use cache of dataset handlers.
///
/// The first payload given for a resource builds its handler; later payloads
/// for the same resource are ignored.
pub struct HandlerRegistry {
    logger: Logger,
    options: HandlerOptions,
    handlers: Mutex<HashMap<ResourceId, Arc<DatasetHandler>>>,
}

impl HandlerRegistry {
    pub fn new(logger: Logger, options: HandlerOptions) -> Self {
        HandlerRegistry {
            logger,
            options,
            handlers: Mutex::new(HashMap::new()),
        }
    }

    /// Handler for `resource`, built from `payload` if none exists yet
    pub fn get_instance(&self, resource: ResourceId, payload: &JsonValue) -> Arc<DatasetHandler> {
        // construction happens under the lock so a resource is never built twice
        let mut handlers = self.handlers.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(handler) = handlers.get(&resource) {
            self.logger
                .debug(format_args!("reusing handler for {}", resource));
            return Arc::clone(handler);
        }

        self.logger.info(format_args!("creating handler for {}", resource));
        let logger = Logger::new(format!("{}::{}", self.logger.target(), resource));
        let handler = Arc::new(DatasetHandler::new(resource, logger, payload, &self.options));
        handlers.insert(resource, Arc::clone(&handler));
        handler
    }

    /// Whether a handler was already built for `resource`
    pub fn contains(&self, resource: ResourceId) -> bool {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&resource)
    }

    pub fn len(&self) -> usize {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
