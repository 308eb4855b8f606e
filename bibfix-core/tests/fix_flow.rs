mod common;

use common::{MemCatalog, PassValidator, TitleCaseValidator, id, record};

use bibfix_core::{FixError, FixSession, ValidatorPipeline};

fn passing_pipeline() -> ValidatorPipeline {
    ValidatorPipeline::new(vec![Box::new(PassValidator)])
}

#[test]
fn malformed_ids_are_rejected() {
    let catalog = MemCatalog::new();
    let pipeline = passing_pipeline();
    let session = FixSession::new(&catalog, &pipeline);
    for bad in ["0", "100000000", "nine", "", "12x"] {
        assert!(
            matches!(session.validate_record(bad), Err(FixError::InvalidId(_))),
            "expected InvalidId for {bad:?}"
        );
    }
}

#[test]
fn unknown_record_is_none_for_validate_and_not_found_for_fix() {
    let catalog = MemCatalog::new();
    let pipeline = passing_pipeline();
    let session = FixSession::new(&catalog, &pipeline);
    assert!(session.validate_record("123").unwrap().is_none());
    assert!(matches!(session.fix("123"), Err(FixError::NotFound(_))));
    assert_eq!(catalog.update_count(), 0);
}

#[test]
fn unchanged_record_skips_revalidation() {
    let catalog = MemCatalog::with_records([record(42, "ALREADY UPPER")]);
    let pipeline = ValidatorPipeline::new(vec![Box::new(TitleCaseValidator)]);
    let session = FixSession::new(&catalog, &pipeline);

    let outcome = session.validate_record("42").unwrap().unwrap();
    assert_eq!(outcome.validated, outcome.original);
    assert!(outcome.revalidation.is_none());
    assert!(outcome.results.is_clean());
}

#[test]
fn corrected_record_is_revalidated() {
    let catalog = MemCatalog::with_records([record(42, "lower case title")]);
    let pipeline = ValidatorPipeline::new(vec![Box::new(TitleCaseValidator)]);
    let session = FixSession::new(&catalog, &pipeline);

    let outcome = session.validate_record("42").unwrap().unwrap();
    assert!(outcome.was_corrected());
    assert_eq!(outcome.validated.body["title"], "LOWER CASE TITLE");
    // The fetched snapshot stays pristine.
    assert_eq!(outcome.original.body["title"], "lower case title");
    assert_eq!(outcome.results.issue_count(), 1);
    // The correction is idempotent, so the second pass comes back clean.
    let revalidation = outcome.revalidation.expect("mutation requires revalidation");
    assert!(revalidation.is_clean());
}

#[test]
fn fix_submits_validated_record_and_carries_acknowledgment() {
    let catalog = MemCatalog::with_records([record(7, "needs fixing")]);
    let pipeline = ValidatorPipeline::new(vec![Box::new(TitleCaseValidator)]);
    let session = FixSession::new(&catalog, &pipeline);

    let outcome = session.fix("7").unwrap();
    assert!(!outcome.update.messages.is_empty());
    assert_eq!(outcome.record_id(), id(7));
    let updates = catalog.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].body["title"], "NEEDS FIXING");
}

#[test]
fn rejected_update_propagates_without_partial_state() {
    let catalog = MemCatalog::with_records([record(8, "TITLE")]);
    catalog.fail_update_for(id(8));
    let pipeline = passing_pipeline();
    let session = FixSession::new(&catalog, &pipeline);
    assert!(matches!(
        session.fix("8"),
        Err(FixError::UpdateFailed { .. })
    ));
}

#[test]
fn validate_local_runs_without_the_catalog() {
    let catalog = MemCatalog::new();
    let pipeline = ValidatorPipeline::new(vec![Box::new(TitleCaseValidator)]);
    let session = FixSession::new(&catalog, &pipeline);

    let outcome = session.validate_local(&record(9, "from a file")).unwrap();
    assert!(outcome.was_corrected());
    assert_eq!(catalog.update_count(), 0);
}

#[test]
fn sample_id_with_passing_validator_round_trips_clean() {
    let catalog = MemCatalog::with_records([record(9_877_349, "SAMPLE")]);
    let pipeline = passing_pipeline();
    let session = FixSession::new(&catalog, &pipeline);

    let outcome = session.fix("009877349").unwrap();
    assert!(outcome.validation.revalidation.is_none());
    assert_eq!(outcome.validation.results.issue_count(), 0);
    assert_eq!(outcome.record_id().to_string(), "009877349");
}
