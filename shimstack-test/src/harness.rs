//! Scenario harness

use shimstack::{BackendSelector, ExecutionMode, SelectorError, Settings};
use shimstack_glue::{DatabaseInput, GlueError, GlueStorage};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data::{standard_table_columns, standard_table_parameters, TestData};

const TEST_DATABASE_DESCRIPTION: &str = "Test database for regression tests";

/// Errors raised while preparing a scenario
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error("Catalog setup failed: {0}")]
    Catalog(#[from] GlueError),
}

/// Selector plus standard test data for one scenario.
///
/// Every constructed store is cleared when the harness is dropped.
pub struct TestHarness {
    selector: BackendSelector,
    data: TestData,
}

impl TestHarness {
    /// Build from the environment and seed the standard database and table
    pub fn setup() -> Result<Self, HarnessError> {
        let settings = Settings::load()?;
        Self::setup_with(settings, TestData::from_env()?)
    }

    /// Build from explicit settings and seed the standard database and table
    pub fn setup_with(settings: Settings, data: TestData) -> Result<Self, HarnessError> {
        crate::init_tracing();

        let harness = Self {
            selector: BackendSelector::new(settings),
            data,
        };
        match harness.selector.mode() {
            ExecutionMode::Mock | ExecutionMode::Hybrid => harness.seed_catalog()?,
            ExecutionMode::Aws => warn!(
                database = %harness.data.test_database,
                "Using real services; test database must already exist"
            ),
        }
        Ok(harness)
    }

    pub fn selector(&self) -> &BackendSelector {
        &self.selector
    }

    pub fn data(&self) -> &TestData {
        &self.data
    }

    /// Clear every store constructed so far
    pub fn teardown(&self) {
        self.selector.cleanup();
    }

    /// Create the standard database and table where missing
    fn seed_catalog(&self) -> Result<(), HarnessError> {
        let catalog = self.selector.emulated_catalog()?;
        let database = &self.data.test_database;
        let table = &self.data.test_table;

        if is_missing(catalog.get_database(database))? {
            catalog.create_database(
                DatabaseInput::new(database).with_description(TEST_DATABASE_DESCRIPTION),
            )?;
            info!(database = %database, "Created test database");
        }

        if is_missing(catalog.get_table(database, table))? {
            create_test_table(&catalog, &self.data)?;
            info!(database = %database, table = %table, "Created test table");
        }

        debug!(database = %database, table = %table, "Catalog ready");
        Ok(())
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// NotFound is the expected outcome of a create-if-missing probe
fn is_missing<T>(lookup: Result<T, GlueError>) -> Result<bool, GlueError> {
    match lookup {
        Ok(_) => Ok(false),
        Err(e) if e.code().is_not_found() => Ok(true),
        Err(e) => Err(e),
    }
}

fn create_test_table(catalog: &GlueStorage, data: &TestData) -> Result<(), GlueError> {
    catalog.create_simple_table(
        &data.test_database,
        &data.test_table,
        standard_table_columns(),
        standard_table_parameters(data),
    )?;
    Ok(())
}
