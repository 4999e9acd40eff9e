mod common;

use modelbook::ModelbookError;
use modelbook::config::DatabaseConfig;
use modelbook::db::migrate::expected_columns;
use modelbook::db::{NameAttrs, PatientAttrs, RecordAttrs};
use modelbook::schema::{MIGRATIONS, SCHEMA_VERSION, Table};
use common::{remove_database, temp_database};


fn all_versions() -> Vec<i64> {
    MIGRATIONS.iter().map(|m| m.version).collect()
}

#[tokio::test]
async fn test_fresh_database_matches_definitions() {
    let (database_url, db_path) = temp_database("migrate_fresh");
    let db = modelbook::db::spawn(&database_url).await.unwrap();

    // 1. Spawning migrates everything
    assert_eq!(db.applied_versions().await.unwrap(), all_versions());
    db.verify_schema().await.unwrap();

    // 2. Introspected columns match the documented layout
    let appt = db.table_columns(Table::ApptInfos).await.unwrap();
    let names: Vec<_> = appt.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "id",
            "doctor_id",
            "patient_id",
            "appt_time",
            "appt_location",
            "spouse_accompanying",
            "created_at",
            "updated_at"
        ]
    );
    assert_eq!(appt, expected_columns(Table::ApptInfos));

    let join = db.table_columns(Table::EventsGuests).await.unwrap();
    assert_eq!(join.len(), 3);
    assert!(join[0].primary_key && join[0].not_null);
    assert!(!join[1].not_null);

    // 3. Migrating again is a no-op
    assert!(db.migrate().await.unwrap().is_empty());

    remove_database(&db_path).await;
}

#[tokio::test]
async fn test_rollback_and_remigrate() {
    let (database_url, db_path) = temp_database("migrate_rollback");
    let db = modelbook::db::spawn(&database_url).await.unwrap();

    // 1. Roll back the newest two: events_guests, then guests
    let reverted = db.rollback(2).await.unwrap();
    assert_eq!(reverted, vec![SCHEMA_VERSION, MIGRATIONS[10].version]);
    assert!(db.table_columns(Table::EventsGuests).await.unwrap().is_empty());
    assert!(db.table_columns(Table::Guests).await.unwrap().is_empty());
    assert!(!db.table_columns(Table::Events).await.unwrap().is_empty());

    let err = db.verify_schema().await.unwrap_err();
    assert!(matches!(
        err,
        ModelbookError::SchemaDrift {
            table: Table::Guests,
            ..
        }
    ));

    // 2. Migrate restores exactly what was dropped
    let reapplied = db.migrate().await.unwrap();
    assert_eq!(reapplied, vec![MIGRATIONS[10].version, SCHEMA_VERSION]);
    db.verify_schema().await.unwrap();

    // 3. Rolling back more than exists stops at zero
    let reverted = db.rollback(100).await.unwrap();
    assert_eq!(reverted.len(), MIGRATIONS.len());
    assert!(db.applied_versions().await.unwrap().is_empty());

    remove_database(&db_path).await;
}

#[tokio::test]
async fn test_reset_round_trips_schema_and_clears_rows() {
    let (database_url, db_path) = temp_database("migrate_reset");
    let db = modelbook::db::spawn(&database_url).await.unwrap();

    db.create(RecordAttrs::Patient(PatientAttrs {
        name: Some("Eve".to_string()),
        ..Default::default()
    }))
    .await
    .unwrap();
    db.create(RecordAttrs::Host(NameAttrs::named("Sam")))
        .await
        .unwrap();

    let before: Vec<_> = {
        let mut cols = Vec::new();
        for table in Table::ALL {
            cols.push(db.table_columns(table).await.unwrap());
        }
        cols
    };

    let applied = db.reset().await.unwrap();
    assert_eq!(applied, all_versions());

    for (table, cols) in Table::ALL.into_iter().zip(before) {
        assert_eq!(db.table_columns(table).await.unwrap(), cols, "{table}");
        assert_eq!(cols, expected_columns(table), "{table}");
    }
    assert!(db.all(Table::Patients).await.unwrap().is_empty());
    assert!(db.all(Table::Hosts).await.unwrap().is_empty());

    remove_database(&db_path).await;
}

#[tokio::test]
async fn test_spawn_without_migrating() {
    let (database_url, db_path) = temp_database("migrate_manual");
    let config = DatabaseConfig {
        migrate_on_start: false,
        ..DatabaseConfig::with_url(database_url)
    };
    let db = modelbook::db::spawn_with(config).await.unwrap();

    assert!(db.applied_versions().await.unwrap().is_empty());
    assert!(db.table_columns(Table::Doctors).await.unwrap().is_empty());

    let err = db
        .create(RecordAttrs::Recipe(NameAttrs::named("Soup")))
        .await
        .unwrap_err();
    assert!(matches!(err, ModelbookError::DatabaseError(_)));

    assert_eq!(db.migrate().await.unwrap(), all_versions());
    let id = db
        .create(RecordAttrs::Recipe(NameAttrs::named("Soup")))
        .await
        .unwrap();
    assert!(id > 0);

    remove_database(&db_path).await;
}

#[tokio::test]
async fn test_shutdown_waits_for_pool_close() {
    let (database_url, db_path) = temp_database("shutdown");
    let db = modelbook::db::spawn(&database_url).await.unwrap();
    let other = db.clone();

    db.create(RecordAttrs::Host(NameAttrs::named("Sam")))
        .await
        .unwrap();

    // 1. Shutdown returns only once the actor has stopped
    db.shutdown().await.unwrap();
    let err = other.applied_versions().await.unwrap_err();
    assert!(matches!(err, ModelbookError::RactorError(_)));

    // 2. A second shutdown from another clone is harmless
    other.shutdown().await.unwrap();

    // 3. The file reopens with the row intact
    let reopened = modelbook::db::spawn(&database_url).await.unwrap();
    assert_eq!(reopened.all(Table::Hosts).await.unwrap().len(), 1);
    reopened.shutdown().await.unwrap();

    remove_database(&db_path).await;
}
