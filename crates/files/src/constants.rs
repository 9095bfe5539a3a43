/// Directory uploads are written to when no explicit directory is configured.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
