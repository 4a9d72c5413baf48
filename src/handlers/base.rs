// Shared state and query plumbing of the dataset handlers
// Author: Gabriel Demetrios Lafis

use serde_json::Value as JsonValue;

use crate::data::{date_key_normalize, Coercer, Table, UnknownPolicy, TOTAL_PATH};
use crate::processing::{
    grouped_count, statistics_by_columns, Aggregate, DataProcessor, FilterProcessor, Outcome, ProcessingError, SUM_KEY,
};
use crate::storage::QueryCache;
use crate::utils::Logger;
use super::{HandlerOptions, HandlerState};

/// Column holding the day of each record in daily datasets
pub const DATE_COLUMN: &str = "date";

/// The payload, its table and the per-handler caches every dataset handler composes
pub struct HandlerBase {
    logger: Logger,
    main_data: JsonValue,
    table: Option<Table>,
    total_number: i64,
    coercer: Coercer,
    cache: QueryCache<Outcome>,
}

impl HandlerBase {
    /// Build the table from a payload.
    ///
    /// A malformed payload is logged and leaves the handler without a table;
    /// every query on it then returns the no-data sentinel.
    pub fn new(logger: Logger, payload: &JsonValue, options: &HandlerOptions) -> Self {
        let table = match Table::from_payload(payload) {
            Ok(table) => Some(table),
            Err(err) => {
                logger.exception("building table", &err);
                None
            }
        };

        let total_number = match table.as_ref().and_then(|t| t.total) {
            Some(total) => total,
            None => {
                logger.error(format_args!("payload has no '{}', total set to -1", TOTAL_PATH));
                -1
            }
        };

        let mut cache = QueryCache::with_capacity(options.cache_capacity);
        if let Some(ttl) = options.cache_ttl {
            cache = cache.with_ttl(ttl);
        }

        let coercer = Coercer::new(logger.clone(), options.seed);
        logger.debug(format_args!(
            "handler loaded with {} rows",
            table.as_ref().map_or(0, Table::len)
        ));

        HandlerBase {
            logger,
            main_data: payload.clone(),
            table,
            total_number,
            coercer,
            cache,
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// The payload as received
    pub fn main_data(&self) -> &JsonValue {
        &self.main_data
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn state(&self) -> HandlerState {
        match self.table {
            Some(_) => HandlerState::Queryable,
            None => HandlerState::Loaded,
        }
    }

    /// `result.total` of the payload, or -1 when it had none
    pub fn total_number(&self) -> i64 {
        self.total_number
    }

    pub fn coercer(&self) -> &Coercer {
        &self.coercer
    }

    pub fn cache(&self) -> &QueryCache<Outcome> {
        &self.cache
    }

    /// Fresh copy of the table without the `_id` column
    pub fn clean_copy(&self) -> Result<Table, ProcessingError> {
        self.table
            .as_ref()
            .map(Table::clean_copy)
            .ok_or(ProcessingError::NoTable)
    }

    /// Run a computation on a clean copy.
    ///
    /// Processing errors are logged with the method name and become
    /// [`Outcome::NoData`], as does an empty result.
    pub fn run<F>(&self, method: &str, compute: F) -> Outcome
    where
        F: FnOnce(&Table) -> Result<Aggregate, ProcessingError>,
    {
        match self.clean_copy().and_then(|table| compute(&table)) {
            Ok(aggregate) => Outcome::from_aggregate(aggregate),
            Err(err) => {
                self.logger.exception(method, &err);
                Outcome::NoData
            }
        }
    }

    /// [`HandlerBase::run`] memoized on the method name and its arguments
    pub fn query<F>(&self, method: &str, args: &[&str], compute: F) -> Outcome
    where
        F: FnOnce(&Table) -> Result<Aggregate, ProcessingError>,
    {
        let key = format!("{}({})", method, args.join(","));
        self.cache.get_or_insert_with(&key, || self.run(method, compute))
    }

    /// `{date: value}` of `column`, one value per day, ordered by date
    pub fn get_data_by_column(&self, column: &str, ascending: bool) -> Outcome {
        let ascending_arg = ascending.to_string();
        self.query("get_data_by_column", &[column, ascending_arg.as_str()], |table| {
            let groups = table.group_by(&[DATE_COLUMN])?;
            let mut dates: Vec<(String, Aggregate)> = groups
                .unique_values(column)?
                .into_iter()
                .filter_map(|(key, values)| {
                    let date = key.into_iter().next()?;
                    let first = values.first()?;
                    Some((date, Aggregate::from_value(first)))
                })
                .collect();

            dates.sort_by(|a, b| if ascending { a.0.cmp(&b.0) } else { b.0.cmp(&a.0) });
            Ok(dates.into_iter().collect())
        })
    }

    /// `{column: {min, max, mean, sum}}` over counts coerced with random placeholders
    pub fn statistics_by_columns(&self, method: &str, columns: &[&str]) -> Outcome {
        self.query(method, &[], |table| {
            statistics_by_columns(
                table,
                columns,
                &self.coercer,
                UnknownPolicy::RandomSmallOnUnknown,
                Some(SUM_KEY),
            )
        })
    }

    /// Grouped count nested over `columns`
    pub fn data_by_columns(&self, method: &str, columns: &[&str], count_column: &str) -> Outcome {
        self.query(method, &[], |table| grouped_count(table, columns, count_column, false))
    }
}

/// Rows whose `column` falls on `date`, ignoring any time part of the cell
pub fn rows_on_day(table: &Table, column: &str, date: &str) -> Result<Table, ProcessingError> {
    let index = table.column_index(column)?;
    let day = date.to_string();

    FilterProcessor::new(&format!("on_day_{}", column), move |row, _| {
        row.get(index)
            .map_or(false, |value| date_key_normalize(&value.to_label()) == day)
    })
    .process(table)
}
