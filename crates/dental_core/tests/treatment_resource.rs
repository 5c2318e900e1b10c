use dental_core::db::open_db_in_memory;
use dental_core::{
    CreateOutcome, ListParams, RecordStore, SqliteTreatmentStore, Treatment, TreatmentService,
    UpdateOutcome,
};
use rusqlite::Connection;
use rust_decimal::Decimal;

type Service<'conn> = TreatmentService<SqliteTreatmentStore<'conn>>;

fn service(conn: &Connection) -> Service<'_> {
    TreatmentService::new(SqliteTreatmentStore::try_new(conn).unwrap())
}

fn price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn create(service: &Service<'_>, name: &str, specialist: &str, cents: i64) -> Treatment {
    match service
        .create(&Treatment::new(name, specialist, price(cents)))
        .unwrap()
    {
        CreateOutcome::Created(created) => created,
        other => panic!("expected create to succeed, got {other:?}"),
    }
}

fn seed(service: &Service<'_>) {
    create(service, "Root canal", "Endodontist", 90_000);
    create(service, "Braces", "Orthodontist", 450_000);
    create(service, "Cleaning", "Hygienist", 8_000);
    create(service, "Aligners", "Orthodontist", 350_000);
    create(service, "Whitening", "Hygienist", 25_050);
}

fn names(treatments: &[Treatment]) -> Vec<&str> {
    treatments.iter().map(|t| t.name.as_str()).collect()
}

#[test]
fn default_order_is_name_ascending() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    seed(&service);

    let all = service.list(&ListParams::new()).unwrap();
    assert_eq!(
        names(&all),
        vec!["Aligners", "Braces", "Cleaning", "Root canal", "Whitening"]
    );
}

#[test]
fn price_sorts_are_numeric_not_lexical() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    seed(&service);

    let ascending = service.list(&ListParams::new().sort("price_asc")).unwrap();
    assert_eq!(
        names(&ascending),
        vec!["Cleaning", "Whitening", "Root canal", "Aligners", "Braces"]
    );

    let descending = service.list(&ListParams::new().sort("price_desc")).unwrap();
    assert_eq!(
        names(&descending),
        vec!["Braces", "Aligners", "Root canal", "Whitening", "Cleaning"]
    );
}

#[test]
fn name_desc_and_unknown_keys() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    seed(&service);

    let name_desc = service.list(&ListParams::new().sort("name_desc")).unwrap();
    assert_eq!(names(&name_desc)[0], "Whitening");

    let unknown = service.list(&ListParams::new().sort("date_desc")).unwrap();
    assert_eq!(names(&unknown)[0], "Aligners");
}

#[test]
fn specialist_filter_is_exact() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    seed(&service);

    let ortho = service
        .list(&ListParams::new().filter("Orthodontist"))
        .unwrap();
    assert_eq!(names(&ortho), vec!["Aligners", "Braces"]);

    assert!(service
        .list(&ListParams::new().filter("Ortho"))
        .unwrap()
        .is_empty());
    assert!(service
        .list(&ListParams::new().filter("orthodontist"))
        .unwrap()
        .is_empty());
}

#[test]
fn search_and_specialist_filter_intersect() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    seed(&service);

    let hits = service
        .list(
            &ListParams::new()
                .search("ing")
                .filter("Hygienist")
                .sort("price_desc"),
        )
        .unwrap();
    assert_eq!(names(&hits), vec!["Whitening", "Cleaning"]);
}

#[test]
fn filter_options_list_distinct_specialists_regardless_of_filters() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    seed(&service);

    service
        .list(&ListParams::new().filter("Hygienist"))
        .unwrap();
    let mut specialists = service.filter_options().unwrap();
    specialists.sort();
    assert_eq!(
        specialists,
        vec!["Endodontist", "Hygienist", "Orthodontist"]
    );
}

#[test]
fn filter_options_are_empty_for_empty_store() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    assert!(service.filter_options().unwrap().is_empty());
}

#[test]
fn create_rejects_negative_price() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let outcome = service
        .create(&Treatment::new("Refund", "Billing", price(-500)))
        .unwrap();
    assert!(matches!(outcome, CreateOutcome::ValidationFailed(ref errors) if errors.has_field("price")));
    assert!(service.list(&ListParams::new()).unwrap().is_empty());
}

#[test]
fn update_and_conflict_paths() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let braces = create(&service, "Braces", "Orthodontist", 450_000);
    let id = braces.id.unwrap();

    let mut repriced = braces.clone();
    repriced.price = price(420_000);
    let UpdateOutcome::Updated(updated) = service.update(id, &repriced).unwrap() else {
        panic!("expected update to succeed");
    };
    assert_eq!(updated.price, price(420_000));

    let mut stale = braces.clone();
    stale.specialist = "Dentist".to_string();
    assert_eq!(service.update(id, &stale).unwrap(), UpdateOutcome::Conflict);

    service.delete(id).unwrap();
    assert_eq!(service.update(id, &updated).unwrap(), UpdateOutcome::NotFound);
}

#[test]
fn price_sort_separates_adjacent_cents_at_the_largest_price() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    create(&service, "Upper", "Surgeon", 999_999_999_999);
    create(&service, "Lower", "Surgeon", 999_999_999_998);

    let ascending = service.list(&ListParams::new().sort("price_asc")).unwrap();
    assert_eq!(names(&ascending), vec!["Lower", "Upper"]);

    let descending = service.list(&ListParams::new().sort("price_desc")).unwrap();
    assert_eq!(names(&descending), vec!["Upper", "Lower"]);
}

#[test]
fn create_rejects_prices_too_precise_to_order_exactly() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    for raw in [Decimal::new(123_456_789_012_345_679, 1), Decimal::new(8_005, 3)] {
        let outcome = service
            .create(&Treatment::new("Veneer", "Dentist", raw))
            .unwrap();
        assert!(
            matches!(outcome, CreateOutcome::ValidationFailed(ref errors) if errors.has_field("price")),
            "{raw} should be rejected"
        );
    }
    assert!(!service.store().exists(1).unwrap());
    assert!(service.list(&ListParams::new()).unwrap().is_empty());
}
