//! Minimal server-rendered pages.

use axum::response::Html;

use crate::api::session::Flash;
use crate::models::face::FaceSummary;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, flash: Option<&Flash>, body: &str) -> Html<String> {
    let flash_html = flash
        .map(|f| format!(r#"<div class="flash flash-{}">{}</div>"#, escape_html(&f.category), escape_html(&f.message)))
        .unwrap_or_default();
    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }}
.flash {{ padding: .6rem 1rem; border-radius: 4px; margin-bottom: 1rem; background: #eef; }}
.flash-danger {{ background: #fdd; }} .flash-success {{ background: #dfd; }}
.grid {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: .5rem; }}
.grid img {{ width: 100%; border-radius: 4px; }}
</style>
</head>
<body>
<h1>{title}</h1>
{flash_html}
{body}
</body>
</html>"#,
        title = escape_html(title),
        flash_html = flash_html,
        body = body,
    ))
}

pub fn index_page() -> Html<String> {
    let body = r#"<p>Take or upload a selfie to find the photos you appear in.</p>
<form id="selfie-form">
  <input type="file" name="selfie" accept="image/*" capture="user" required>
  <button type="submit">Find my photos</button>
</form>
<p id="status"></p>
<script>
document.getElementById('selfie-form').addEventListener('submit', async (ev) => {
  ev.preventDefault();
  const status = document.getElementById('status');
  status.textContent = 'Searching...';
  const res = await fetch('/search', { method: 'POST', body: new FormData(ev.target) });
  const data = await res.json();
  if (!res.ok) { status.textContent = data.error || 'Search failed'; return; }
  if (data.photo_urls.length === 0) { status.textContent = 'No photos found.'; return; }
  const qs = data.photo_urls.map(u => 'photos=' + encodeURIComponent(u)).join('&');
  window.location = '/gallery?' + qs;
});
</script>"#;
    page("Find your photos", None, body)
}

pub fn login_page(flash: Option<&Flash>) -> Html<String> {
    let body = r#"<form method="post" action="/admin">
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">Log in</button>
</form>"#;
    page("Admin login", flash, body)
}

pub fn admin_page(flash: Option<&Flash>) -> Html<String> {
    let body = r#"<h2>Upload photos</h2>
<form method="post" action="/admin/upload" enctype="multipart/form-data">
  <input type="file" name="photos" multiple required>
  <button type="submit">Upload and index</button>
</form>
<h2>Manage</h2>
<ul>
  <li><a href="/admin/all_photos">All photos</a></li>
  <li><a href="/admin/faces">Indexed faces</a></li>
</ul>
<form method="post" action="/admin/delete_all_photos" onsubmit="return confirm('Delete every photo and face record?');">
  <button type="submit">Delete all photos</button>
</form>
<form method="post" action="/admin/logout"><button type="submit">Log out</button></form>"#;
    page("Admin panel", flash, body)
}

fn photo_grid(photos: &[String]) -> String {
    if photos.is_empty() {
        return "<p>No photos.</p>".to_string();
    }
    let items: String = photos
        .iter()
        .map(|u| {
            let u = escape_html(u);
            format!(r#"<a href="{u}" target="_blank"><img src="{u}" loading="lazy" alt=""></a>"#)
        })
        .collect();
    format!(r#"<div class="grid">{}</div>"#, items)
}

pub fn gallery_page(photos: &[String]) -> Html<String> {
    let body = format!(r#"{}<p><a href="/">Search again</a></p>"#, photo_grid(photos));
    page("Your photos", None, &body)
}

pub fn all_photos_page(photos: &[String]) -> Html<String> {
    let body = format!(r#"<p>{} photos</p>{}<p><a href="/admin">Back</a></p>"#, photos.len(), photo_grid(photos));
    page("All photos", None, &body)
}

pub fn faces_page(faces: &[FaceSummary]) -> Html<String> {
    let rows: String = faces
        .iter()
        .map(|f| {
            format!(
                r#"<tr><td><a href="/admin/faces/{}">{}</a></td><td>{}</td></tr>"#,
                urlencoding::encode(&f.face_id),
                escape_html(&f.face_id),
                f.photo_count
            )
        })
        .collect();
    let body = format!(
        r#"<table><thead><tr><th>Face</th><th>Photos</th></tr></thead><tbody>{}</tbody></table><p><a href="/admin">Back</a></p>"#,
        rows
    );
    page("Indexed faces", None, &body)
}

pub fn face_photos_page(face_id: &str, photos: &[String]) -> Html<String> {
    let body = format!(r#"{}<p><a href="/admin/faces">Back</a></p>"#, photo_grid(photos));
    page(&format!("Face {}", face_id), None, &body)
}
