use chrono::{NaiveDate, NaiveDateTime};
use dental_core::db::open_db_in_memory;
use dental_core::repo::patient_repo::{
    PATIENTS, PATIENT_APPOINTMENT_DATE, PATIENT_EMAIL, PATIENT_NAME,
};
use dental_core::repo::treatment_repo::{TREATMENTS, TREATMENT_NAME, TREATMENT_SPECIALIST};
use dental_core::service::patient_service::PATIENT_SORTS;
use dental_core::{
    Patient, QueryBuilder, RecordId, RecordStore, SqlitePatientStore, SqliteTreatmentStore,
    Treatment,
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

fn at(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .unwrap()
        .and_hms_opt(11, 15, 0)
        .unwrap()
}

fn seed_patients(conn: &Connection) -> SqlitePatientStore<'_> {
    let store = SqlitePatientStore::try_new(conn).unwrap();
    for (name, email, day) in [
        ("Ana Lima", "ana@clinic.org", 1),
        ("Ana Souza", "souza@mail.com", 2),
        ("Bruno Lima", "bruno@clinic.org", 1),
        ("Carla Dias", "carla@mail.com", 3),
        ("Diego Lima", "diego@mail.com", 2),
    ] {
        store.insert(&Patient::new(name, email, at(day))).unwrap();
    }
    store
}

fn ids(records: &[Patient]) -> BTreeSet<RecordId> {
    records.iter().filter_map(|p| p.id).collect()
}

#[test]
fn text_then_date_equals_date_then_text() {
    let conn = open_db_in_memory().unwrap();
    let store = seed_patients(&conn);

    let mut text_first = QueryBuilder::new(&PATIENTS);
    text_first
        .filter_by_text(&[PATIENT_NAME, PATIENT_EMAIL], Some("Lima"))
        .filter_by_date(PATIENT_APPOINTMENT_DATE, Some("2024-05-01"));

    let mut date_first = QueryBuilder::new(&PATIENTS);
    date_first
        .filter_by_date(PATIENT_APPOINTMENT_DATE, Some("2024-05-01"))
        .filter_by_text(&[PATIENT_NAME, PATIENT_EMAIL], Some("Lima"));

    let a = store.query(&text_first).unwrap();
    let b = store.query(&date_first).unwrap();
    assert_eq!(ids(&a), ids(&b));
    assert_eq!(a.len(), 2);
}

#[test]
fn composed_filters_yield_intersection_of_individual_results() {
    let conn = open_db_in_memory().unwrap();
    let store = seed_patients(&conn);

    let searches = [Some("Lima"), Some("clinic"), Some("Ana"), Some(""), None];
    let dates = [Some("2024-05-01"), Some("2024-05-02"), Some("garbage"), None];

    for search in searches {
        for date in dates {
            let mut text_only = QueryBuilder::new(&PATIENTS);
            text_only.filter_by_text(&[PATIENT_NAME, PATIENT_EMAIL], search);
            let mut date_only = QueryBuilder::new(&PATIENTS);
            date_only.filter_by_date(PATIENT_APPOINTMENT_DATE, date);
            let mut both = QueryBuilder::new(&PATIENTS);
            both.filter_by_text(&[PATIENT_NAME, PATIENT_EMAIL], search)
                .filter_by_date(PATIENT_APPOINTMENT_DATE, date);

            let expected = ids(&store.query(&text_only).unwrap())
                .intersection(&ids(&store.query(&date_only).unwrap()))
                .copied()
                .collect::<BTreeSet<_>>();
            assert_eq!(
                ids(&store.query(&both).unwrap()),
                expected,
                "search={search:?} date={date:?}"
            );
        }
    }
}

#[test]
fn every_sort_key_orders_its_field() {
    let conn = open_db_in_memory().unwrap();
    let store = seed_patients(&conn);

    for key in PATIENT_SORTS.keys() {
        let mut query = QueryBuilder::new(&PATIENTS);
        query.apply_sort(&PATIENT_SORTS, Some(key));
        let rows = store.query(&query).unwrap();
        assert_eq!(rows.len(), 5);

        let sorted = rows.windows(2).all(|pair| match key {
            "name_asc" => pair[0].name <= pair[1].name,
            "name_desc" => pair[0].name >= pair[1].name,
            "date_asc" => pair[0].appointment_date <= pair[1].appointment_date,
            "date_desc" => pair[0].appointment_date >= pair[1].appointment_date,
            other => panic!("unexpected sort key {other}"),
        });
        assert!(sorted, "rows not ordered for {key}");
    }
}

#[test]
fn ties_break_on_identity() {
    let conn = open_db_in_memory().unwrap();
    let store = seed_patients(&conn);

    let mut query = QueryBuilder::new(&PATIENTS);
    query.apply_sort(&PATIENT_SORTS, Some("date_desc"));
    let rows = store.query(&query).unwrap();
    let names = rows.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
    assert_eq!(
        names,
        vec!["Carla Dias", "Ana Souza", "Diego Lima", "Ana Lima", "Bruno Lima"]
    );
}

#[test]
fn queries_never_modify_the_store() {
    let conn = open_db_in_memory().unwrap();
    let store = seed_patients(&conn);
    let before = store.query(&QueryBuilder::new(&PATIENTS)).unwrap();

    let mut narrowing = QueryBuilder::new(&PATIENTS);
    narrowing
        .filter_by_text(&[PATIENT_NAME], Some("Zzz"))
        .paginate(Some(1), 3);
    assert!(store.query(&narrowing).unwrap().is_empty());

    assert_eq!(store.query(&QueryBuilder::new(&PATIENTS)).unwrap(), before);
}

#[test]
fn hostile_input_is_bound_not_interpolated() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTreatmentStore::try_new(&conn).unwrap();
    store
        .insert(&Treatment::new("Cleaning", "Hygienist", Decimal::new(8000, 2)))
        .unwrap();

    let payload = "x'); DROP TABLE treatments; --";
    let mut query = QueryBuilder::new(&TREATMENTS);
    query
        .filter_by_text(&[TREATMENT_NAME], Some(payload))
        .filter_by_exact_match(TREATMENT_SPECIALIST, Some(payload));
    assert!(store.query(&query).unwrap().is_empty());

    assert_eq!(store.query(&QueryBuilder::new(&TREATMENTS)).unwrap().len(), 1);
}

#[test]
fn store_rejects_query_for_another_table() {
    let conn = open_db_in_memory().unwrap();
    let store = SqlitePatientStore::try_new(&conn).unwrap();
    assert!(store.query(&QueryBuilder::new(&TREATMENTS)).is_err());
}
