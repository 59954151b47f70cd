use std::collections::BTreeSet;

use anyhow::Result;
use rusqlite::{params, params_from_iter, Connection};

use crate::models::face::FaceSummary;

pub fn count_faces(conn: &Connection) -> Result<i64> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM faces", [], |r| r.get(0))?;
    Ok(n)
}

/// Distinct photo URLs for a set of face ids. An empty input never touches the database.
pub fn get_photos_by_face_ids(conn: &Connection, face_ids: &[String]) -> Result<BTreeSet<String>> {
    let mut photos = BTreeSet::new();
    if face_ids.is_empty() {
        return Ok(photos);
    }
    let placeholders = vec!["?"; face_ids.len()].join(",");
    let sql = format!("SELECT photo_url FROM faces WHERE face_id IN ({})", placeholders);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(face_ids.iter()), |row| row.get::<_, String>(0))?;
    for r in rows {
        photos.insert(r?);
    }
    Ok(photos)
}

/// Every stored photo URL, most recently inserted first.
pub fn get_all_photos(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT photo_url FROM faces ORDER BY id DESC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    let mut out = Vec::new();
    for r in rows { out.push(r?); }
    Ok(out)
}

pub fn get_unique_face_ids_with_counts(conn: &Connection) -> Result<Vec<FaceSummary>> {
    let mut stmt = conn.prepare("SELECT face_id, COUNT(photo_url) FROM faces GROUP BY face_id ORDER BY face_id")?;
    let rows = stmt.query_map([], |row| {
        Ok(FaceSummary { face_id: row.get(0)?, photo_count: row.get(1)? })
    })?;
    let mut out = Vec::new();
    for r in rows { out.push(r?); }
    Ok(out)
}

pub fn get_photos_by_single_face_id(conn: &Connection, face_id: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT photo_url FROM faces WHERE face_id = ? ORDER BY photo_url")?;
    let rows = stmt.query_map(params![face_id], |row| row.get::<_, String>(0))?;
    let mut out = Vec::new();
    for r in rows { out.push(r?); }
    Ok(out)
}
