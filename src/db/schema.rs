use anyhow::Result;
use rusqlite::Connection;

pub fn apply_pragmas(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;
    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    Ok(())
}

pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS faces (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  face_id TEXT NOT NULL UNIQUE,
  photo_url TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_faces_photo_url ON faces(photo_url);
    "#,
    )?;

    // Upserts rely on last-write-wins over face_id; refuse to run against a table without it.
    if !has_unique_face_id(conn)? {
        anyhow::bail!("faces.face_id has no UNIQUE constraint; upserts would duplicate rows");
    }

    Ok(())
}

fn has_unique_face_id(conn: &Connection) -> Result<bool> {
    let mut stmt = conn.prepare("PRAGMA index_list(faces)")?;
    let indexes: Vec<(String, bool)> = stmt
        .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, bool>(2)?)))?
        .collect::<rusqlite::Result<_>>()?;
    for (name, unique) in indexes {
        if !unique {
            continue;
        }
        let mut cols = conn.prepare("SELECT name FROM pragma_index_info(?1)")?;
        let names: Vec<String> = cols
            .query_map([&name], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;
        if names == ["face_id"] {
            return Ok(true);
        }
    }
    Ok(false)
}
