use std::path::Path;

use rusqlite::{params, Connection};
use tracing::info;

use crate::error::{AppError, Result};
use crate::store::LoadSet;

/// Writes the full row set to `table` in the SQLite database at `db_path`,
/// replacing any existing table contents. Drop, create and all inserts run
/// in one transaction, so the table is either fully replaced or untouched.
/// The connection is scoped to this call and released on every exit path.
pub fn load_tracks(db_path: &Path, table: &str, rows: &LoadSet) -> Result<usize> {
    validate_table_name(table)?;

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut conn = Connection::open(db_path)?;
    let written = replace_table(&mut conn, table, rows)?;

    info!(
        "Loaded {} rows into {} ({})",
        written,
        table,
        db_path.display()
    );
    Ok(written)
}

fn replace_table(conn: &mut Connection, table: &str, rows: &LoadSet) -> Result<usize> {
    let tx = conn.transaction()?;

    tx.execute_batch(&format!("DROP TABLE IF EXISTS \"{table}\";"))?;

    let written = if rows.has_tier_column() {
        tx.execute_batch(&format!(
            "CREATE TABLE \"{table}\" (
                track_name      TEXT NOT NULL,
                artist_name     TEXT NOT NULL,
                album_name      TEXT NOT NULL,
                popularity      INTEGER NOT NULL,
                popularity_tier TEXT NOT NULL
            );"
        ))?;

        let mut stmt = tx.prepare(&format!(
            "INSERT INTO \"{table}\" \
             (track_name, artist_name, album_name, popularity, popularity_tier) \
             VALUES (?1, ?2, ?3, ?4, ?5)"
        ))?;
        let LoadSet::Cleaned(tracks) = rows else {
            unreachable!()
        };
        for t in tracks {
            stmt.execute(params![
                t.detail.track_name,
                t.detail.artist_name,
                t.detail.album_name,
                t.detail.popularity,
                t.popularity_tier.as_str(),
            ])?;
        }
        tracks.len()
    } else {
        tx.execute_batch(&format!(
            "CREATE TABLE \"{table}\" (
                track_name  TEXT NOT NULL,
                artist_name TEXT NOT NULL,
                album_name  TEXT NOT NULL,
                popularity  INTEGER NOT NULL
            );"
        ))?;

        let mut stmt = tx.prepare(&format!(
            "INSERT INTO \"{table}\" (track_name, artist_name, album_name, popularity) \
             VALUES (?1, ?2, ?3, ?4)"
        ))?;
        let LoadSet::Raw(tracks) = rows else {
            unreachable!()
        };
        for t in tracks {
            stmt.execute(params![
                t.track_name,
                t.artist_name,
                t.album_name,
                t.popularity,
            ])?;
        }
        tracks.len()
    };

    tx.commit()?;
    Ok(written)
}

/// Table names cannot be bound as SQL parameters, so restrict them to a
/// safe identifier character set before interpolating.
fn validate_table_name(table: &str) -> Result<()> {
    let valid = !table.is_empty()
        && !table.starts_with(|c: char| c.is_ascii_digit())
        && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(AppError::Config(format!("Invalid table name: {table:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify::TrackDetail;
    use crate::transform::clean_and_transform;

    fn temp_db(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("spotify2sqlite_{}_{}.db", name, std::process::id()))
    }

    #[test]
    fn test_load_cleaned_rows_roundtrip() {
        let db_path = temp_db("cleaned");
        let _ = std::fs::remove_file(&db_path);

        let rows = clean_and_transform(vec![
            TrackDetail::mock("Rewrite The Stars", "James Arthur", "Reimagined", 72),
            TrackDetail::mock("Heavy", "Anne-Marie", "Speak Your Mind", 44),
        ]);
        let written = load_tracks(&db_path, "playlist_tracks", &LoadSet::Cleaned(rows)).unwrap();
        assert_eq!(written, 2);

        let conn = Connection::open(&db_path).unwrap();
        let tier: String = conn
            .query_row(
                "SELECT popularity_tier FROM playlist_tracks WHERE track_name = ?1",
                ["Rewrite The Stars"],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tier, "popular");

        std::fs::remove_file(&db_path).unwrap();
    }

    #[test]
    fn test_reload_replaces_previous_contents() {
        let db_path = temp_db("replace");
        let _ = std::fs::remove_file(&db_path);

        let first = LoadSet::Raw(vec![
            TrackDetail::mock("a", "x", "y", 1),
            TrackDetail::mock("b", "x", "y", 2),
        ]);
        load_tracks(&db_path, "tracks", &first).unwrap();

        let second = LoadSet::Raw(vec![TrackDetail::mock("c", "x", "y", 3)]);
        load_tracks(&db_path, "tracks", &second).unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM tracks", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);

        std::fs::remove_file(&db_path).unwrap();
    }

    #[test]
    fn test_open_failure_surfaces_load_error() {
        // A directory path cannot be opened as a database file.
        let dir = std::env::temp_dir();
        let rows = LoadSet::Raw(vec![TrackDetail::mock("a", "x", "y", 1)]);

        let err = load_tracks(&dir, "tracks", &rows).unwrap_err();
        assert!(matches!(err, AppError::Load(_)));
    }

    #[test]
    fn test_invalid_table_name_rejected() {
        let db_path = temp_db("badname");
        let rows = LoadSet::Raw(vec![]);

        let err = load_tracks(&db_path, "tracks; DROP TABLE x", &rows).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(!db_path.exists());
    }
}
