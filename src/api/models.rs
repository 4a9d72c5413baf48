// Open-data API request and response models
// Author: Gabriel Demetrios Lafis

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ApiError;

/// The COVID-19 datasets published on the open-data portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceId {
    Area,
    Quarantine,
    LabTests,
    TestedIndividuals,
    TestedIndividualsScores,
    Recovered,
    Hospitalized,
    AgeGender,
    MedicalStaffMorbidity,
    Deaths,
    YoungPopulation,
    CitiesPopulation,
}

impl ResourceId {
    pub const ALL: [ResourceId; 12] = [
        ResourceId::Area,
        ResourceId::Quarantine,
        ResourceId::LabTests,
        ResourceId::TestedIndividuals,
        ResourceId::TestedIndividualsScores,
        ResourceId::Recovered,
        ResourceId::Hospitalized,
        ResourceId::AgeGender,
        ResourceId::MedicalStaffMorbidity,
        ResourceId::Deaths,
        ResourceId::YoungPopulation,
        ResourceId::CitiesPopulation,
    ];

    /// Snake-case name used in configuration and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            ResourceId::Area => "area",
            ResourceId::Quarantine => "quarantine",
            ResourceId::LabTests => "lab_tests",
            ResourceId::TestedIndividuals => "tested_individuals",
            ResourceId::TestedIndividualsScores => "tested_individuals_scores",
            ResourceId::Recovered => "recovered",
            ResourceId::Hospitalized => "hospitalized",
            ResourceId::AgeGender => "age_gender",
            ResourceId::MedicalStaffMorbidity => "medical_staff_morbidity",
            ResourceId::Deaths => "deaths",
            ResourceId::YoungPopulation => "young_population",
            ResourceId::CitiesPopulation => "cities_population",
        }
    }

    /// Environment variable holding the portal resource id
    pub fn env_key(&self) -> &'static str {
        match self {
            ResourceId::Area => "AREA_RESOURCE_ID",
            ResourceId::Quarantine => "QUARANTINE_RESOURCE_ID",
            ResourceId::LabTests => "LAB_TESTS_RESOURCE_ID",
            ResourceId::TestedIndividuals => "TESTED_INDIVIDUALS_RESOURCE_ID",
            ResourceId::TestedIndividualsScores => "TESTED_INDIVIDUALS_SCORES_RESOURCE_ID",
            ResourceId::Recovered => "RECOVERED_RESOURCE_ID",
            ResourceId::Hospitalized => "HOSPITALIZED_RESOURCE_ID",
            ResourceId::AgeGender => "AGE_GENDER_RESOURCE_ID",
            ResourceId::MedicalStaffMorbidity => "MEDICAL_STAFF_MORBIDITY_RESOURCE_ID",
            ResourceId::Deaths => "DEATHS_DATA_RESOURCE_ID",
            ResourceId::YoungPopulation => "YOUNG_POPULATION_RESOURCE_ID",
            ResourceId::CitiesPopulation => "CITIES_POPULATION_RESOURCE_ID",
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ResourceId {
    type Err = ApiError;

    /// Accepts the snake-case name, with `-` allowed in place of `_`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        ResourceId::ALL
            .into_iter()
            .find(|r| r.name() == normalized)
            .ok_or_else(|| ApiError::UnknownResource(s.to_string()))
    }
}

/// Optional parameters of a `datastore_search` call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatastoreQuery {
    pub limit: u64,
    pub offset: u64,
    pub include_total: bool,
    pub q: Option<String>,
}

impl DatastoreQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn include_total(mut self, include_total: bool) -> Self {
        self.include_total = include_total;
        self
    }

    pub fn q<S: Into<String>>(mut self, q: S) -> Self {
        self.q = Some(q.into());
        self
    }
}

/// Status and body of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
