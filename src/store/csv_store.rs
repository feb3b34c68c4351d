//! CSV file record store
//!
//! Each record kind lives in its own CSV file whose first line is the kind's
//! header. The store is opened once per session and owned by the domain rules.
//!
//! # File Lifecycle
//!
//! - `open` creates the data directory and any missing file, header included
//! - a file whose first line is not the expected header, terminated by a line
//!   break, is considered corrupted and replaced by an empty file with the
//!   right header
//! - `append` adds one line at the end, starting a new line first if the last
//!   one was left unterminated
//! - `delete_where` rewrites the file through a temporary file and a rename

use super::record::{decode_error, Record, RecordKind};
use super::traits::{column_for, RecordStore};
use crate::config::Config;
use crate::types::ParkingError;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Record store backed by one CSV file per record kind
#[derive(Debug, Clone)]
pub struct CsvStore {
    paths: HashMap<RecordKind, PathBuf>,
}

impl CsvStore {
    /// Open the store described by `config`, preparing its files
    ///
    /// # Errors
    ///
    /// Returns a storage error if the directory or a file cannot be created,
    /// read or rewritten.
    pub fn open(config: &Config) -> Result<Self, ParkingError> {
        fs::create_dir_all(&config.data_dir)?;

        let mut paths = HashMap::new();
        for kind in RecordKind::ALL {
            let path = config.path_for(kind);
            ensure_file(&path, kind)?;
            paths.insert(kind, path);
        }

        Ok(Self { paths })
    }

    /// Path of the file holding records of `kind`
    pub fn path(&self, kind: RecordKind) -> &Path {
        // open() registers every kind
        self.paths[&kind].as_path()
    }

    fn reader(&self, kind: RecordKind) -> Result<csv::Reader<File>, ParkingError> {
        Ok(ReaderBuilder::new()
            .has_headers(true)
            .from_path(self.path(kind))?)
    }

    fn write_rows(&self, kind: RecordKind, rows: &[StringRecord]) -> Result<(), ParkingError> {
        let path = self.path(kind);
        let temp_path = path.with_extension("csv.tmp");

        let mut writer = WriterBuilder::new().from_path(&temp_path)?;
        writer.write_record(kind.header())?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        drop(writer);

        fs::rename(&temp_path, path)?;
        Ok(())
    }
}

impl RecordStore for CsvStore {
    fn append<R: Record>(&mut self, record: &R) -> Result<(), ParkingError> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(self.path(R::KIND))?;

        if !ends_with_newline(&mut file)? {
            file.write_all(b"\n")?;
        }

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    fn scan<R: Record>(&self) -> Result<Vec<R>, ParkingError> {
        let mut reader = self.reader(R::KIND)?;

        let records = reader
            .deserialize::<R>()
            .map(|result| result.map_err(|e| decode_error(R::KIND, None, e)))
            .collect::<Result<Vec<R>, _>>()?;

        tracing::debug!(kind = R::KIND.name(), rows = records.len(), "scanned records");
        Ok(records)
    }

    fn delete_where<R: Record>(&mut self, field: &str, value: &str) -> Result<usize, ParkingError> {
        let column = column_for::<R>(field)?;
        let rows = self
            .reader(R::KIND)?
            .records()
            .map(|result| result.map_err(|e| decode_error(R::KIND, None, e)))
            .collect::<Result<Vec<StringRecord>, _>>()?;
        let before = rows.len();

        let kept: Vec<StringRecord> = rows
            .into_iter()
            .filter(|row| row.get(column) != Some(value))
            .collect();
        let removed = before - kept.len();

        if removed > 0 {
            self.write_rows(R::KIND, &kept)?;
        }
        Ok(removed)
    }
}

/// Whether `file` is empty or its last byte is a line feed
fn ends_with_newline(file: &mut File) -> Result<bool, ParkingError> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Make sure `path` exists and starts with the header of `kind` on its own line
fn ensure_file(path: &Path, kind: RecordKind) -> Result<(), ParkingError> {
    let header = kind.header().join(",");

    if path.exists() {
        let mut first_line = String::new();
        BufReader::new(File::open(path)?).read_line(&mut first_line)?;

        // An unterminated header would glue the next appended row onto it
        let terminated = first_line
            .strip_suffix('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line));
        if terminated == Some(header.as_str()) {
            return Ok(());
        }
        tracing::warn!(
            "Unexpected header in {}, replacing it with a clean file",
            path.display()
        );
    } else {
        tracing::info!("Creating {} file {}", kind.name(), path.display());
    }

    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(kind.header())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, Bicycle, MovementEvent, User, TIMESTAMP_FORMAT};
    use chrono::NaiveDateTime;
    use rstest::rstest;
    use tempfile::{tempdir, TempDir};

    fn open_temp() -> (CsvStore, TempDir) {
        let dir = tempdir().unwrap();
        let config = Config::default().with_data_dir(dir.path());
        let store = CsvStore::open(&config).unwrap();
        (store, dir)
    }

    fn first_line(path: &Path) -> String {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_open_creates_files_with_headers() {
        let (store, _dir) = open_temp();

        assert_eq!(first_line(store.path(RecordKind::User)), "identity,name,email");
        assert_eq!(
            first_line(store.path(RecordKind::Bicycle)),
            "serial,owner_identity,brand,model"
        );
        assert_eq!(
            first_line(store.path(RecordKind::Movement)),
            "timestamp,action,serial,owner_identity"
        );
    }

    #[test]
    fn test_open_creates_missing_data_dir() {
        let dir = tempdir().unwrap();
        let config = Config::default().with_data_dir(dir.path().join("nested/data"));

        let store = CsvStore::open(&config).unwrap();
        assert!(store.path(RecordKind::User).exists());
    }

    #[rstest]
    #[case::extra_column(RecordKind::User, "identity,usuario,email,extra\n")]
    #[case::missing_column(RecordKind::Bicycle, "serial,brand,model\n")]
    #[case::no_header(RecordKind::Movement, "")]
    fn test_open_replaces_corrupted_files(#[case] kind: RecordKind, #[case] content: &str) {
        let dir = tempdir().unwrap();
        let config = Config::default().with_data_dir(dir.path());
        let path = config.path_for(kind);
        fs::write(&path, format!("{}12345678A,Ana,ana@mail.com\n", content)).unwrap();

        CsvStore::open(&config).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("{}\n", kind.header().join(","))
        );
    }

    #[test]
    fn test_open_keeps_valid_files() {
        let dir = tempdir().unwrap();
        let config = Config::default().with_data_dir(dir.path());
        let path = config.path_for(RecordKind::User);
        fs::write(&path, "identity,name,email\n12345678A,Ana,ana@mail.com\n").unwrap();

        let store = CsvStore::open(&config).unwrap();
        let users: Vec<User> = store.scan().unwrap();

        assert_eq!(users, vec![User::new("12345678A", "Ana", "ana@mail.com")]);
    }

    #[test]
    fn test_append_then_scan() {
        let (mut store, _dir) = open_temp();
        let ts = NaiveDateTime::parse_from_str("2025-03-01 08:15:22", TIMESTAMP_FORMAT).unwrap();
        let event = MovementEvent::new(ts, Action::In, "BK001", "12345678A");

        store.append(&event).unwrap();

        assert_eq!(
            fs::read_to_string(store.path(RecordKind::Movement)).unwrap(),
            "timestamp,action,serial,owner_identity\n2025-03-01 08:15:22,IN,BK001,12345678A\n"
        );
        let events: Vec<MovementEvent> = store.scan().unwrap();
        assert_eq!(events, vec![event]);
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let (mut store, _dir) = open_temp();
        let user = User::new("12345678A", "López, Ana", "ana@mail.com");

        store.append(&user).unwrap();

        let users: Vec<User> = store.scan().unwrap();
        assert_eq!(users, vec![user]);
    }

    #[test]
    fn test_delete_where_rewrites_file() {
        let (mut store, _dir) = open_temp();
        store.append(&Bicycle::new("B1", "12345678A", "Orbea", "MX20")).unwrap();
        store.append(&Bicycle::new("B2", "87654321B", "BH", "Ultralight")).unwrap();
        store.append(&Bicycle::new("B3", "12345678A", "Trek", "Marlin")).unwrap();

        let removed = store.delete_where::<Bicycle>("serial", "B2").unwrap();

        assert_eq!(removed, 1);
        assert_eq!(
            fs::read_to_string(store.path(RecordKind::Bicycle)).unwrap(),
            "serial,owner_identity,brand,model\nB1,12345678A,Orbea,MX20\nB3,12345678A,Trek,Marlin\n"
        );
    }

    #[test]
    fn test_delete_where_without_matches_leaves_file() {
        let (mut store, _dir) = open_temp();
        store.append(&User::new("12345678A", "Ana", "ana@mail.com")).unwrap();

        let removed = store.delete_where::<User>("identity", "00000000X").unwrap();

        assert_eq!(removed, 0);
        let users: Vec<User> = store.scan().unwrap();
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_scan_reports_malformed_line() {
        let (store, _dir) = open_temp();
        fs::write(
            store.path(RecordKind::Movement),
            "timestamp,action,serial,owner_identity\n2025-03-01 08:15:22,IN,B1,12345678A\nnot-a-date,IN,B1,12345678A\n",
        )
        .unwrap();

        let err = store.scan::<MovementEvent>().unwrap_err();
        assert!(matches!(
            err,
            ParkingError::MalformedRecord {
                kind: "movement",
                line: Some(3),
                ..
            }
        ));
    }

    #[test]
    fn test_open_replaces_unterminated_header() {
        let dir = tempdir().unwrap();
        let config = Config::default().with_data_dir(dir.path());
        let path = config.path_for(RecordKind::User);
        fs::write(&path, "identity,name,email").unwrap();

        let mut store = CsvStore::open(&config).unwrap();
        store.append(&User::new("12345678A", "Ana", "ana@mail.com")).unwrap();
        store.append(&User::new("87654321B", "Luis", "luis@mail.com")).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "identity,name,email\n12345678A,Ana,ana@mail.com\n87654321B,Luis,luis@mail.com\n"
        );
        let users: Vec<User> = store.scan().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].identity, "87654321B");
    }

    #[test]
    fn test_append_after_unterminated_row() {
        let dir = tempdir().unwrap();
        let config = Config::default().with_data_dir(dir.path());
        let path = config.path_for(RecordKind::User);
        fs::write(&path, "identity,name,email\r\n12345678A,Ana,ana@mail.com").unwrap();

        let mut store = CsvStore::open(&config).unwrap();
        store.append(&User::new("87654321B", "Luis", "luis@mail.com")).unwrap();

        let users: Vec<User> = store.scan().unwrap();
        assert_eq!(
            users,
            vec![
                User::new("12345678A", "Ana", "ana@mail.com"),
                User::new("87654321B", "Luis", "luis@mail.com"),
            ]
        );
    }

    #[test]
    fn test_scan_rejects_extra_columns() {
        let (store, _dir) = open_temp();
        fs::write(
            store.path(RecordKind::User),
            "identity,name,email\n12345678A,Ana,ana@mail.com,extra\n",
        )
        .unwrap();

        let err = store.scan::<User>().unwrap_err();
        assert!(matches!(
            err,
            ParkingError::MalformedRecord {
                kind: "user",
                line: Some(2),
                ..
            }
        ));
    }
}
