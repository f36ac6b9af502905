use shimstack::{ExecutionMode, Service, Settings};
use shimstack_glue::DatabaseInput;
use shimstack_test::{TestData, TestHarness};

fn harness(mode: ExecutionMode) -> TestHarness {
    TestHarness::setup_with(Settings::for_mode(mode), TestData::default()).unwrap()
}

#[test]
fn test_mock_setup_seeds_catalog() {
    let harness = harness(ExecutionMode::Mock);
    let catalog = harness.selector().emulated_catalog().unwrap();

    let table = catalog.get_table("test_database", "test_table").unwrap();
    assert_eq!(table.storage_descriptor.columns.len(), 15);
    assert_eq!(table.parameters["larkBaseId"], "test_base_token");
    assert_eq!(table.table_type, "EXTERNAL_TABLE");
}

#[test]
fn test_hybrid_setup_seeds_emulated_catalog() {
    let harness = harness(ExecutionMode::Hybrid);
    let catalog = harness.selector().emulated_catalog().unwrap();
    let database = catalog.get_database("test_database").unwrap();
    assert_eq!(database.description, "Test database for regression tests");
    assert!(harness.selector().client(Service::S3).is_ok());
}

#[test]
fn test_aws_setup_constructs_nothing() {
    let harness = harness(ExecutionMode::Aws);
    assert!(harness.selector().constructed().is_empty());
}

#[test]
fn test_teardown_clears_constructed_stores() {
    let harness = harness(ExecutionMode::Mock);
    let catalog = harness.selector().emulated_catalog().unwrap();
    catalog.create_database(DatabaseInput::new("scratch")).unwrap();

    harness.teardown();
    assert!(catalog.list_databases().is_empty());
    assert_eq!(harness.selector().constructed(), vec![Service::Glue]);
}

#[test]
fn test_custom_data_names() {
    let data = TestData {
        test_database: "orders".to_string(),
        test_table: "lines".to_string(),
        ..TestData::default()
    };
    let harness = TestHarness::setup_with(Settings::default(), data).unwrap();
    let catalog = harness.selector().emulated_catalog().unwrap();
    assert!(catalog.get_table("orders", "lines").is_ok());
    assert!(!catalog.database_exists("test_database"));
}
