use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_ALLOWED_EXTENSIONS: &str = "png,jpg,jpeg,gif";
const DEV_SESSION_SECRET: &str = "a_very_secret_and_long_random_string_for_development";

#[derive(Clone, Debug)]
pub struct Config {
    pub aws_region: String,
    pub gallery_bucket: String,
    /// Bucket reserved for probe images; probes are currently kept on local disk only.
    pub selfie_bucket: String,
    pub collection_id: String,
    pub database_url: Option<String>,
    pub temp_dir: PathBuf,
    pub allowed_extensions: BTreeSet<String>,
    pub admin_password: String,
    pub session_secret: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup, falling back to the
    /// development defaults for anything missing.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let aws_region = var("AWS_REGION", "eu-central-1");
        let gallery_bucket = var("S3_GALLERY_BUCKET", "facefind-gallery");
        let selfie_bucket = var("S3_SELFIE_BUCKET", "facefind-selfies");
        let collection_id = var("REKOGNITION_COLLECTION_ID", "facefind-faces");
        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        let temp_dir = PathBuf::from(var("TEMP_DIR", "/tmp"));
        let allowed_extensions = parse_extensions(&var("ALLOWED_EXTENSIONS", DEFAULT_ALLOWED_EXTENSIONS));
        let admin_password = var("ADMIN_PASSWORD", "admin");
        let session_secret = var("SESSION_SECRET", DEV_SESSION_SECRET);
        let port = lookup("FACEFIND_PORT").and_then(|v| v.parse().ok()).unwrap_or(8080);
        let max_upload_mb: usize = lookup("FACEFIND_MAX_UPLOAD_MB").and_then(|v| v.parse().ok()).unwrap_or(256);

        Self {
            aws_region,
            gallery_bucket,
            selfie_bucket,
            collection_id,
            database_url,
            temp_dir,
            allowed_extensions,
            admin_password,
            session_secret,
            port,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        }
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.session_secret == DEV_SESSION_SECRET
    }
}

pub fn parse_extensions(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}
