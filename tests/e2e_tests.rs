//! End-to-end integration tests
//!
//! These tests drive the domain rules on top of the CSV record store in a
//! temporary data directory. Some start empty; others copy a fixture
//! directory first:
//! 1. Copies users.csv, bicycles.csv and movements.csv from the fixture
//! 2. Opens the store and checks the derived bicycle states
//! 3. Records more movements and checks what ends up on disk
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Bicycles parked in and out
//! - Movements sharing a timestamp (the later line wins)
//! - Logs whose lines are not in timestamp order

#[cfg(test)]
mod tests {
    use bike_parking::core::FixedClock;
    use bike_parking::store::RecordKind;
    use bike_parking::types::TIMESTAMP_FORMAT;
    use bike_parking::{
        BicycleState, Config, CsvStore, ErrorKind, MovementEvent, ParkingEngine, RecordStore,
    };
    use chrono::NaiveDateTime;
    use rstest::rstest;
    use std::fs;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    type Engine = ParkingEngine<CsvStore, FixedClock>;

    fn clock(text: &str) -> FixedClock {
        FixedClock(NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).unwrap())
    }

    fn open(dir: &Path, now: &str) -> Engine {
        let config = Config::default().with_data_dir(dir);
        let store = CsvStore::open(&config).unwrap();
        ParkingEngine::with_clock(store, clock(now))
    }

    /// Copy a fixture into a fresh data directory
    fn load_fixture(fixture_name: &str) -> TempDir {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let dir = tempdir().unwrap();

        for file in ["users.csv", "bicycles.csv", "movements.csv"] {
            let source = Path::new(&fixture_dir).join(file);
            assert!(source.exists(), "Fixture file not found: {}", source.display());
            fs::copy(&source, dir.path().join(file)).unwrap();
        }
        dir
    }

    fn read(engine: &Engine, kind: RecordKind) -> String {
        fs::read_to_string(engine.store().path(kind)).unwrap()
    }

    #[test]
    fn test_parking_scenario_on_disk() {
        let dir = tempdir().unwrap();
        let mut engine = open(dir.path(), "2025-03-01 08:15:22");

        engine
            .register_user("12345678A", "Ana", "ana@mail.com")
            .unwrap();
        engine
            .register_bicycle("B1", "12345678A", "Orbea", "MX20")
            .unwrap();
        engine.record_movement("IN", "12345678A", "B1").unwrap();

        let err = engine.record_movement("IN", "12345678A", "B1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);

        engine.record_movement("OUT", "12345678A", "B1").unwrap();

        assert_eq!(
            read(&engine, RecordKind::User),
            "identity,name,email\n12345678A,Ana,ana@mail.com\n"
        );
        assert_eq!(
            read(&engine, RecordKind::Bicycle),
            "serial,owner_identity,brand,model\nB1,12345678A,Orbea,MX20\n"
        );
        assert_eq!(
            read(&engine, RecordKind::Movement),
            "timestamp,action,serial,owner_identity\n\
             2025-03-01 08:15:22,IN,B1,12345678A\n\
             2025-03-01 08:15:22,OUT,B1,12345678A\n"
        );
    }

    #[test]
    fn test_records_survive_reopening() {
        let dir = tempdir().unwrap();
        {
            let mut engine = open(dir.path(), "2025-03-01 08:15:22");
            engine
                .register_user("12345678A", "Ana", "ana@mail.com")
                .unwrap();
            engine
                .register_bicycle("B1", "12345678A", "Orbea", "MX20")
                .unwrap();
            engine.check_in("12345678A", "B1").unwrap();
        }

        let mut engine = open(dir.path(), "2025-03-01 09:00:00");

        assert_eq!(
            engine
                .register_user("12345678A", "Ana", "ana@mail.com")
                .unwrap_err()
                .kind(),
            ErrorKind::Uniqueness
        );
        assert_eq!(engine.bicycle_state("B1").unwrap(), BicycleState::ParkedIn);
        engine.check_out("12345678A", "B1").unwrap();
        assert_eq!(engine.bicycle_state("B1").unwrap(), BicycleState::ParkedOut);
    }

    #[test]
    fn test_delete_user_after_deleting_bicycles() {
        let dir = tempdir().unwrap();
        let mut engine = open(dir.path(), "2025-03-01 08:15:22");
        engine
            .register_user("12345678A", "Ana", "ana@mail.com")
            .unwrap();
        engine
            .register_bicycle("B1", "12345678A", "Orbea", "MX20")
            .unwrap();
        engine.check_in("12345678A", "B1").unwrap();

        assert_eq!(
            engine.delete_user("12345678A").unwrap_err().kind(),
            ErrorKind::Conflict
        );

        engine.delete_bicycle("B1").unwrap();
        engine.delete_user("12345678A").unwrap();

        assert_eq!(read(&engine, RecordKind::User), "identity,name,email\n");
        assert_eq!(
            read(&engine, RecordKind::Bicycle),
            "serial,owner_identity,brand,model\n"
        );
        let events: Vec<MovementEvent> = engine.store().scan().unwrap();
        assert_eq!(events.len(), 1);
    }

    #[rstest]
    #[case::parked_in("parked_in", BicycleState::ParkedIn, BicycleState::ParkedOut)]
    #[case::tied_timestamps("tied_timestamps", BicycleState::ParkedIn, BicycleState::ParkedOut)]
    #[case::returned("returned", BicycleState::ParkedOut, BicycleState::ParkedIn)]
    fn test_fixture_states(
        #[case] fixture_name: &str,
        #[case] b1: BicycleState,
        #[case] b2: BicycleState,
    ) {
        let dir = load_fixture(fixture_name);
        let mut engine = open(dir.path(), "2025-03-02 08:00:00");

        assert_eq!(engine.bicycle_state("B1").unwrap(), b1);
        assert_eq!(engine.bicycle_state("B2").unwrap(), b2);
        assert_eq!(
            engine.bicycle_state("B3").unwrap(),
            BicycleState::NeverEntered
        );
    }

    #[test]
    fn test_new_movements_follow_latest_recorded_timestamp() {
        let dir = load_fixture("returned");
        let mut engine = open(dir.path(), "2025-03-01 11:00:00");

        let event = engine.check_in("12345678A", "B1").unwrap();

        assert_eq!(event.formatted_timestamp(), "2025-03-01 12:00:00");
        assert!(read(&engine, RecordKind::Movement)
            .ends_with("2025-03-01 12:00:00,IN,B1,12345678A\n"));
    }

    #[test]
    fn test_corrupted_movement_file_is_reset() {
        let dir = load_fixture("parked_in");
        fs::write(
            dir.path().join("movements.csv"),
            "when,what\n2025-03-01 08:15:22,IN\n",
        )
        .unwrap();

        let mut engine = open(dir.path(), "2025-03-02 08:00:00");

        assert_eq!(
            read(&engine, RecordKind::Movement),
            "timestamp,action,serial,owner_identity\n"
        );
        assert_eq!(
            engine.bicycle_state("B1").unwrap(),
            BicycleState::NeverEntered
        );
        assert_eq!(
            engine.list_bicycles_for_user("12345678A").unwrap(),
            vec!["B1"]
        );
    }

    #[test]
    fn test_malformed_row_is_a_storage_error() {
        let dir = load_fixture("parked_in");
        let mut engine = open(dir.path(), "2025-03-02 08:00:00");
        fs::write(
            engine.store().path(RecordKind::Movement),
            "timestamp,action,serial,owner_identity\n2025-03-01 08:15:22,PARK,B1,12345678A\n",
        )
        .unwrap();

        let err = engine.bicycle_state("B1").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(err.to_string().contains("line 2"), "{}", err);
    }
}
