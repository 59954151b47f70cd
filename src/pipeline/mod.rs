pub mod ingest;
pub mod lookup;
pub mod purge;
pub mod resize;

pub use ingest::{ingest_batch, IngestReport, IngestSettings, UploadedFile};
pub use lookup::search_by_selfie;
pub use purge::delete_all_photos;
