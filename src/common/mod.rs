pub mod errors;

use std::sync::LazyLock;

use tokio::runtime::{Builder, Runtime};

pub const DEFAULT_MAX_DIMENSION: u32 = 1024;

pub const DEFAULT_JPEG_QUALITY: u8 = 85;

pub const DEFAULT_PORT: u16 = 5000;

pub const DEFAULT_SUBMISSION_LIMIT: &str = "64 MiB";

pub const METADATA_FILE_NAME: &str = "metadata.json";

pub const PRODUCT_ID_PREFIX: &str = "product_";

/// Recorded as `barcode_type` when the user typed the barcode in.
pub const MANUAL_BARCODE_TYPE: &str = "MANUAL";

// Upper bound on `_NNN` suffixes tried when the timestamp id is already taken.
pub const MAX_ID_SUFFIX: u32 = 999;

// Rocket-specific Tokio Runtime
// Request handling runs here; blocking pipeline calls are moved to its blocking pool.
pub static ROCKET_RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
    Builder::new_multi_thread()
        .thread_name("rocket-io-worker")
        .enable_all()
        .build()
        .expect("Failed to build Rocket Tokio runtime")
});
