//! Application constants and configuration

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Flask dev-server default bind, matching the reference backend.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
pub const PREDICT_PATH: &str = "/predict";

/// Multipart field name the backend expects for the uploaded image.
pub const UPLOAD_FIELD: &str = "fingerprint";

/// The eight category codes the classifier can return, in display order.
pub const BLOOD_GROUPS: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

/// Extensions accepted by the file picker.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["bmp", "png", "jpg", "jpeg"];
