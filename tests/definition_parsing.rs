//! Integration tests for definition parsing

mod common;

use runfile::definition::{find_definition_file_from, parse_definition, parse_definition_file};
use runfile::error::DefinitionError;
use runfile::runner::{resolve, ExecutionPlan};

const PROJECT: &str = "\
.PHONY: install test migrate lint run clean check
.IGNORE: clean

PYTHON ?= python3
APP ?= app.main:app

install: ## Install Python dependencies
\t${PYTHON} -m pip install -r requirements.txt

run: install ## Start the development server
\tuvicorn ${APP} --reload --port ${PORT}

migrate: install ## Apply database migrations
\talembic upgrade ${REVISION}
migrate: REVISION = head

lint: ## Lint the code base
\truff check app

test: install ## Run the test suite
\tpytest ${ARGS}

clean:
\t-find . -name __pycache__ -exec rm -rf {} +
\trm -rf .pytest_cache

check: lint test
";

#[test]
fn test_parse_complete_definition() {
    let table = parse_definition(PROJECT).unwrap();

    assert_eq!(table.len(), 7);
    let names: Vec<&str> = table.names().collect();
    assert_eq!(
        names,
        vec!["install", "run", "migrate", "lint", "test", "clean", "check"]
    );
    assert!(table.iter().all(|t| t.phony));

    let migrate = table.get("migrate").unwrap();
    assert_eq!(migrate.dependencies, vec!["install"]);
    assert_eq!(migrate.help(), Some("Apply database migrations"));
    assert_eq!(migrate.variables.get("REVISION").map(String::as_str), Some("head"));

    let clean = table.get("clean").unwrap();
    assert!(clean.best_effort);
    assert_eq!(clean.body.len(), 2);
    assert_eq!(clean.help(), None);

    let check = table.get("check").unwrap();
    assert!(check.is_bodyless());
    assert_eq!(check.dependencies, vec!["lint", "test"]);

    assert_eq!(table.defaults.get("APP").map(String::as_str), Some("app.main:app"));
}

#[test]
fn test_parse_twice_is_identical() {
    assert_eq!(parse_definition(PROJECT).unwrap(), parse_definition(PROJECT).unwrap());
}

#[test]
fn test_plan_for_aggregate_target() {
    let table = parse_definition(PROJECT).unwrap();
    let plan: ExecutionPlan = resolve(&table, &["check"]).unwrap();
    assert_eq!(plan.names(), vec!["lint", "install", "test", "check"]);
}

#[test]
fn test_unknown_dependency_is_load_error() {
    let err = parse_definition("build: fetch\n\techo build\n").unwrap_err();
    assert_eq!(
        err,
        DefinitionError::UnknownTarget {
            name: "fetch".to_string(),
            line: 1,
        }
    );
}

#[test]
fn test_parse_error_reports_position() {
    let err = parse_definition("ok:\n\techo\n\nthis is not valid\n").unwrap_err();
    match err {
        DefinitionError::Parse { line, column, .. } => {
            assert_eq!(line, 4);
            assert_eq!(column, 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(parse_definition("ok:\n\nnope\n")
        .unwrap_err()
        .to_string()
        .starts_with("line 3, column 1:"));
}

#[test]
fn test_parse_definition_file() {
    let (_temp_dir, path) = common::create_test_definition(PROJECT);
    let table = parse_definition_file(&path).unwrap();
    assert!(table.contains("migrate"));
}

#[test]
fn test_missing_definition_file() {
    let (temp_dir, _path) = common::create_test_definition("a:\n");
    let result = parse_definition_file(&temp_dir.path().join("Nope"));
    assert!(matches!(result, Err(DefinitionError::Read { .. })));
}

#[test]
fn test_discovery_from_subdirectory() {
    let (_temp_dir, path, sub_dir) = common::create_test_definition_in_subdir("a:\n");
    assert_eq!(find_definition_file_from(sub_dir).unwrap(), path);
}
