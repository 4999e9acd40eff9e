mod common;

use modelbook::ModelbookError;
use modelbook::db::{DbEventGuest, EventAttrs, EventGuestAttrs, NameAttrs, RecordAttrs};
use modelbook::schema::{SchemaError, Table};
use common::{remove_database, temp_database};


fn event(name: &str, host_id: Option<i64>) -> RecordAttrs {
    RecordAttrs::Event(EventAttrs {
        event_name: Some(name.to_string()),
        location: Some("Town Hall".to_string()),
        capacity: Some(80),
        host_id,
    })
}

fn invite(event_id: i64, guest_id: i64) -> RecordAttrs {
    RecordAttrs::EventGuest(EventGuestAttrs {
        event_id: Some(event_id),
        guest_id: Some(guest_id),
    })
}

#[tokio::test]
async fn test_host_events_and_back() {
    let (database_url, db_path) = temp_database("events_host");
    let db = modelbook::db::spawn(&database_url).await.unwrap();

    let host = db
        .create(RecordAttrs::Host(NameAttrs::named("Priya")))
        .await
        .unwrap();
    let gala = db.create(event("Gala", Some(host))).await.unwrap();
    let picnic = db.create(event("Picnic", Some(host))).await.unwrap();
    let orphan = db.create(event("Open Mic", None)).await.unwrap();

    let hosted = db.events_of_host(host).await.unwrap();
    assert_eq!(hosted.iter().map(|e| e.id).collect::<Vec<_>>(), vec![gala, picnic]);
    assert_eq!(hosted[0].event_name.as_deref(), Some("Gala"));
    assert_eq!(hosted[0].capacity, Some(80));

    let gala_host = db.host_of_event(gala).await.unwrap().unwrap();
    assert_eq!(gala_host.id, host);
    assert_eq!(gala_host.name.as_deref(), Some("Priya"));

    // NULL host_id => no host
    assert!(db.host_of_event(orphan).await.unwrap().is_none());

    remove_database(&db_path).await;
}

#[tokio::test]
async fn test_guests_through_join_table() {
    let (database_url, db_path) = temp_database("events_guests");
    let db = modelbook::db::spawn(&database_url).await.unwrap();

    let gala = db.create(event("Gala", None)).await.unwrap();
    let picnic = db.create(event("Picnic", None)).await.unwrap();
    let ada = db
        .create(RecordAttrs::Guest(NameAttrs::named("Ada")))
        .await
        .unwrap();
    let bo = db
        .create(RecordAttrs::Guest(NameAttrs::named("Bo")))
        .await
        .unwrap();

    let link = db.create(invite(gala, ada)).await.unwrap();
    db.create(invite(gala, bo)).await.unwrap();
    db.create(invite(picnic, ada)).await.unwrap();

    // Join rows carry no timestamps
    let row = DbEventGuest::try_from(db.find(Table::EventsGuests, link).await.unwrap()).unwrap();
    assert_eq!(row.event_id, Some(gala));
    assert_eq!(row.guest_id, Some(ada));

    let gala_guests = db.guests_of_event(gala).await.unwrap();
    assert_eq!(gala_guests.iter().map(|g| g.id).collect::<Vec<_>>(), vec![ada, bo]);

    let ada_events = db.events_of_guest(ada).await.unwrap();
    assert_eq!(ada_events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![gala, picnic]);

    db.destroy(Table::EventsGuests, link).await.unwrap();
    let ada_events = db.events_of_guest(ada).await.unwrap();
    assert_eq!(ada_events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![picnic]);

    remove_database(&db_path).await;
}

#[tokio::test]
async fn test_unknown_association_is_a_schema_error() {
    let (database_url, db_path) = temp_database("events_unknown");
    let db = modelbook::db::spawn(&database_url).await.unwrap();

    let err = db
        .load_association(Table::Events, 1, "sponsors")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ModelbookError::Schema(SchemaError::UnknownAssociation { table: "events", .. })
    ));

    remove_database(&db_path).await;
}
