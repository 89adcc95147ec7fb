//! Working-store persistence for the set pipeline.
//!
//! Uses SQLx with SQLite for a lightweight, embedded store. Each pipeline
//! stage reads and writes the same `tracks` table: scan upserts rows,
//! annotate fills the acoustic columns, sequence assigns positions.
//!
//! # Example
//!
//! ```ignore
//! use mixset::db::{init_db, get_all_tracks};
//!
//! let pool = init_db("sqlite:mixset.db").await?;
//! let tracks = get_all_tracks(&pool).await?;
//! ```

use crate::model::SetTrack;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "mixset.db";

/// Build a SQLite database URL from an optional path.
///
/// If no path is provided, uses [`DEFAULT_DB_NAME`] in the current directory.
pub fn db_url(path: Option<&std::path::Path>) -> String {
    match path {
        Some(p) => format!("sqlite:{}", p.display()),
        None => format!("sqlite:{DEFAULT_DB_NAME}"),
    }
}

/// Initialize the database connection pool and run migrations.
///
/// Creates the database file if it doesn't exist, establishes a connection
/// pool, and runs all pending migrations.
pub async fn init_db(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
        sqlx::Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Insert or update a track record by path.
///
/// Uses SQLite's UPSERT keyed on the file path. Tag-derived fields are
/// refreshed; remotely annotated fields (`mbid`) and the set `position`
/// are left untouched so a rescan never destroys annotation work.
///
/// # Returns
///
/// The database ID of the inserted or updated track.
pub async fn upsert_track(
    pool: &SqlitePool,
    path: &str,
    artist: &str,
    title: &str,
    bpm: Option<f64>,
    raw_key: Option<&str>,
) -> sqlx::Result<i64> {
    let row: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO tracks (path, artist, title, bpm, raw_key)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(path) DO UPDATE SET
            artist = excluded.artist,
            title = excluded.title,
            bpm = COALESCE(excluded.bpm, tracks.bpm),
            raw_key = COALESCE(excluded.raw_key, tracks.raw_key)
        RETURNING id
        "#,
    )
    .bind(path)
    .bind(artist)
    .bind(title)
    .bind(bpm)
    .bind(raw_key)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

/// Get all tracks in insertion order.
///
/// Insertion order is the deterministic scan order every later stage
/// relies on for tie-breaking.
pub async fn get_all_tracks(pool: &SqlitePool) -> sqlx::Result<Vec<SetTrack>> {
    sqlx::query_as::<_, SetTrack>(
        "SELECT id, path, artist, title, bpm, raw_key, wheel_code, mbid, position
         FROM tracks ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

/// Get tracks still missing tempo or raw key, in insertion order.
pub async fn get_unannotated_tracks(pool: &SqlitePool) -> sqlx::Result<Vec<SetTrack>> {
    sqlx::query_as::<_, SetTrack>(
        "SELECT id, path, artist, title, bpm, raw_key, wheel_code, mbid, position
         FROM tracks WHERE bpm IS NULL OR raw_key IS NULL ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

/// Store the result of a remote annotation lookup for one track.
pub async fn update_annotation(
    pool: &SqlitePool,
    track_id: i64,
    bpm: Option<f64>,
    raw_key: Option<&str>,
    mbid: Option<&str>,
) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE tracks SET
            bpm = COALESCE(?, bpm),
            raw_key = COALESCE(?, raw_key),
            mbid = COALESCE(?, mbid)
         WHERE id = ?",
    )
    .bind(bpm)
    .bind(raw_key)
    .bind(mbid)
    .bind(track_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Record the derived wheel code for one track. Passing `None` clears a
/// previously derived code (the raw key turned out unresolvable).
pub async fn update_wheel_code(
    pool: &SqlitePool,
    track_id: i64,
    wheel_code: Option<&str>,
) -> sqlx::Result<()> {
    sqlx::query("UPDATE tracks SET wheel_code = ? WHERE id = ?")
        .bind(wheel_code)
        .bind(track_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Replace all set positions in a single transaction.
///
/// Clears every stored position first so tracks dropped from the set do
/// not keep a stale ordinal, then writes the new 1-based positions.
pub async fn store_positions(pool: &SqlitePool, ordered_ids: &[i64]) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE tracks SET position = NULL")
        .execute(&mut *tx)
        .await?;

    for (index, track_id) in ordered_ids.iter().enumerate() {
        sqlx::query("UPDATE tracks SET position = ? WHERE id = ?")
            .bind((index + 1) as i64)
            .bind(track_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Get the sequenced set in play order.
pub async fn get_sequenced_tracks(pool: &SqlitePool) -> sqlx::Result<Vec<SetTrack>> {
    sqlx::query_as::<_, SetTrack>(
        "SELECT id, path, artist, title, bpm, raw_key, wheel_code, mbid, position
         FROM tracks WHERE position IS NOT NULL ORDER BY position",
    )
    .fetch_all(pool)
    .await
}
