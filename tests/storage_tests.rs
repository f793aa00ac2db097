use std::sync::Arc;

use ipldb::query::catalog::PRESETS;
use ipldb::storage::seed::{SAMPLE_PLAYER_COUNT, SAMPLE_TEAM_COUNT};
use ipldb::{Database, QueryExecutor, QueryPolicy, SchemaIntrospector, StorageEngine, Value};

fn count(db: &Database, table: &str) -> i64 {
    db.with_conn(|conn| {
        let n = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(n)
    })
    .unwrap()
}

#[test]
fn test_seeding_is_idempotent_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ipl.db");

    {
        let db = Database::open(&path).unwrap();
        db.initialize(true).unwrap();
        assert_eq!(count(&db, "teams"), SAMPLE_TEAM_COUNT as i64);
        assert_eq!(count(&db, "players"), SAMPLE_PLAYER_COUNT as i64);
    }

    let db = Database::open(&path).unwrap();
    db.initialize(true).unwrap();
    assert_eq!(count(&db, "teams"), 10);
    assert_eq!(count(&db, "players"), 10);
}

#[test]
fn test_initialize_without_seed_leaves_tables_empty() {
    let db = Database::open_in_memory().unwrap();
    db.initialize(false).unwrap();
    assert_eq!(count(&db, "teams"), 0);
    assert_eq!(count(&db, "players"), 0);
}

#[test]
fn test_seeded_players_reference_their_teams() {
    let db = Database::open_in_memory().unwrap();
    db.initialize(true).unwrap();

    let orphans: i64 = db
        .with_conn(|conn| {
            let n = conn.query_row(
                "SELECT COUNT(*) FROM players p LEFT JOIN teams t ON p.team_id = t.id WHERE t.id IS NULL",
                [],
                |row| row.get(0),
            )?;
            Ok(n)
        })
        .unwrap();
    assert_eq!(orphans, 0);
}

#[tokio::test]
async fn test_every_preset_executes_through_executor() {
    let db = Database::open_in_memory().unwrap();
    db.initialize(true).unwrap();
    let engine: Arc<dyn StorageEngine> = Arc::new(db);
    let executor = QueryExecutor::new(engine, QueryPolicy::strict());

    for (label, sql) in PRESETS.0 {
        let output = executor.execute(Some(*sql)).await.unwrap_or_else(|e| panic!("{label}: {e}"));
        assert!(output.row_count() > 0, "{label} returned no rows");
    }
}

#[tokio::test]
async fn test_top_run_scorers_preset_order() {
    let db = Database::open_in_memory().unwrap();
    db.initialize(true).unwrap();
    let executor = QueryExecutor::new(Arc::new(db), QueryPolicy::default());

    let output = executor.execute(Some(PRESETS.0[0].1)).await.unwrap();
    assert_eq!(output.row_count(), 5);
    assert_eq!(
        output.rows.value(0, "name"),
        Some(&Value::Text("Virat Kohli".to_string()))
    );
    assert_eq!(output.rows.value(0, "runs"), Some(&Value::Integer(7263)));
}

#[tokio::test]
async fn test_introspection_sees_tables_created_later() {
    let db = Database::open_in_memory().unwrap();
    db.initialize(false).unwrap();
    let introspector = SchemaIntrospector::new(Arc::new(db.clone()));

    let before = introspector.describe().await.unwrap();
    assert_eq!(before.len(), 2);

    db.with_conn(|conn| {
        conn.execute_batch("CREATE TABLE venues (city TEXT, capacity INTEGER)")?;
        Ok(())
    })
    .unwrap();

    let after = introspector.describe().await.unwrap();
    assert_eq!(after.keys().collect::<Vec<_>>(), ["players", "teams", "venues"]);
    assert!(after["venues"].iter().all(|c| !c.pk));
}
