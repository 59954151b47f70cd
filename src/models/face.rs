use serde::{Deserialize, Serialize};

/// Association between a face detected by the recognition service and the photo it came from.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FaceRecord {
    pub face_id: String,
    pub photo_url: String,
}

/// One distinct face identifier and how many stored rows reference it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FaceSummary {
    pub face_id: String,
    pub photo_count: i64,
}
