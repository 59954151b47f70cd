use anyhow::Result;
use rusqlite::{params, Connection};

use crate::models::face::FaceRecord;

/// Insert a face record, overwriting the photo URL when the face id already exists.
pub fn add_face_record(conn: &Connection, record: &FaceRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO faces (face_id, photo_url) VALUES (?1, ?2)
         ON CONFLICT(face_id) DO UPDATE SET photo_url = excluded.photo_url",
        params![record.face_id, record.photo_url],
    )?;
    Ok(())
}

pub fn delete_all_face_records(conn: &Connection) -> Result<usize> {
    let deleted = conn.execute("DELETE FROM faces", [])?;
    Ok(deleted)
}
