// Closed set of dataset handlers
// Author: Gabriel Demetrios Lafis

use serde_json::Value as JsonValue;

use crate::api::ResourceId;
use crate::processing::Outcome;
use crate::utils::Logger;
use super::{
    AgeGenderHandler, AreaHandler, CitiesHandler, DataHandler, DeathsHandler, HandlerBase, HandlerOptions,
    HospitalizedHandler, LabTestsHandler, MedicalStaffMorbidityHandler, QuarantineHandler, QueryError,
    RecoveredHandler, TestedIndividualsHandler, TestedIndividualsScoresHandler, YoungPopulationHandler,
};

/// One handler per resource id
pub enum DatasetHandler {
    Area(AreaHandler),
    Quarantine(QuarantineHandler),
    LabTests(LabTestsHandler),
    TestedIndividuals(TestedIndividualsHandler),
    TestedIndividualsScores(TestedIndividualsScoresHandler),
    Recovered(RecoveredHandler),
    Hospitalized(HospitalizedHandler),
    AgeGender(AgeGenderHandler),
    MedicalStaffMorbidity(MedicalStaffMorbidityHandler),
    Deaths(DeathsHandler),
    YoungPopulation(YoungPopulationHandler),
    CitiesPopulation(CitiesHandler),
}

macro_rules! dispatch {
    ($self:ident, $handler:ident => $body:expr) => {
        match $self {
            DatasetHandler::Area($handler) => $body,
            DatasetHandler::Quarantine($handler) => $body,
            DatasetHandler::LabTests($handler) => $body,
            DatasetHandler::TestedIndividuals($handler) => $body,
            DatasetHandler::TestedIndividualsScores($handler) => $body,
            DatasetHandler::Recovered($handler) => $body,
            DatasetHandler::Hospitalized($handler) => $body,
            DatasetHandler::AgeGender($handler) => $body,
            DatasetHandler::MedicalStaffMorbidity($handler) => $body,
            DatasetHandler::Deaths($handler) => $body,
            DatasetHandler::YoungPopulation($handler) => $body,
            DatasetHandler::CitiesPopulation($handler) => $body,
        }
    };
}

macro_rules! accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        pub fn $name(&self) -> Option<&$ty> {
            match self {
                DatasetHandler::$variant(handler) => Some(handler),
                _ => None,
            }
        }
    };
}

impl DatasetHandler {
    /// Build the handler type matching `resource`
    pub fn new(resource: ResourceId, logger: Logger, payload: &JsonValue, options: &HandlerOptions) -> Self {
        match resource {
            ResourceId::Area => DatasetHandler::Area(AreaHandler::new(logger, payload, options)),
            ResourceId::Quarantine => DatasetHandler::Quarantine(QuarantineHandler::new(logger, payload, options)),
            ResourceId::LabTests => DatasetHandler::LabTests(LabTestsHandler::new(logger, payload, options)),
            ResourceId::TestedIndividuals => {
                DatasetHandler::TestedIndividuals(TestedIndividualsHandler::new(logger, payload, options))
            }
            ResourceId::TestedIndividualsScores => {
                DatasetHandler::TestedIndividualsScores(TestedIndividualsScoresHandler::new(logger, payload, options))
            }
            ResourceId::Recovered => DatasetHandler::Recovered(RecoveredHandler::new(logger, payload, options)),
            ResourceId::Hospitalized => {
                DatasetHandler::Hospitalized(HospitalizedHandler::new(logger, payload, options))
            }
            ResourceId::AgeGender => DatasetHandler::AgeGender(AgeGenderHandler::new(logger, payload, options)),
            ResourceId::MedicalStaffMorbidity => {
                DatasetHandler::MedicalStaffMorbidity(MedicalStaffMorbidityHandler::new(logger, payload, options))
            }
            ResourceId::Deaths => DatasetHandler::Deaths(DeathsHandler::new(logger, payload, options)),
            ResourceId::YoungPopulation => {
                DatasetHandler::YoungPopulation(YoungPopulationHandler::new(logger, payload, options))
            }
            ResourceId::CitiesPopulation => {
                DatasetHandler::CitiesPopulation(CitiesHandler::new(logger, payload, options))
            }
        }
    }

    /// Query names of `resource` without building a handler
    pub fn methods_of(resource: ResourceId) -> &'static [&'static str] {
        match resource {
            ResourceId::Area => AreaHandler::method_names(),
            ResourceId::Quarantine => QuarantineHandler::method_names(),
            ResourceId::LabTests => LabTestsHandler::method_names(),
            ResourceId::TestedIndividuals => TestedIndividualsHandler::method_names(),
            ResourceId::TestedIndividualsScores => TestedIndividualsScoresHandler::method_names(),
            ResourceId::Recovered => RecoveredHandler::method_names(),
            ResourceId::Hospitalized => HospitalizedHandler::method_names(),
            ResourceId::AgeGender => AgeGenderHandler::method_names(),
            ResourceId::MedicalStaffMorbidity => MedicalStaffMorbidityHandler::method_names(),
            ResourceId::Deaths => DeathsHandler::method_names(),
            ResourceId::YoungPopulation => YoungPopulationHandler::method_names(),
            ResourceId::CitiesPopulation => CitiesHandler::method_names(),
        }
    }

    accessor!(as_area, Area, AreaHandler);
    accessor!(as_quarantine, Quarantine, QuarantineHandler);
    accessor!(as_lab_tests, LabTests, LabTestsHandler);
    accessor!(as_tested_individuals, TestedIndividuals, TestedIndividualsHandler);
    accessor!(as_tested_individuals_scores, TestedIndividualsScores, TestedIndividualsScoresHandler);
    accessor!(as_recovered, Recovered, RecoveredHandler);
    accessor!(as_hospitalized, Hospitalized, HospitalizedHandler);
    accessor!(as_age_gender, AgeGender, AgeGenderHandler);
    accessor!(as_medical_staff_morbidity, MedicalStaffMorbidity, MedicalStaffMorbidityHandler);
    accessor!(as_deaths, Deaths, DeathsHandler);
    accessor!(as_young_population, YoungPopulation, YoungPopulationHandler);
    accessor!(as_cities, CitiesPopulation, CitiesHandler);
}

impl DataHandler for DatasetHandler {
    fn base(&self) -> &HandlerBase {
        dispatch!(self, handler => handler.base())
    }

    fn resource_id(&self) -> ResourceId {
        dispatch!(self, handler => handler.resource_id())
    }

    fn methods(&self) -> &'static [&'static str] {
        dispatch!(self, handler => handler.methods())
    }

    fn query(&self, method: &str, arg: Option<&str>) -> Result<Outcome, QueryError> {
        dispatch!(self, handler => handler.query(method, arg))
    }
}
