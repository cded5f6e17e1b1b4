use std::net::IpAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dotenv::dotenv;
use log::info;
use serde::Deserialize;

use crate::common::{
    DEFAULT_JPEG_QUALITY, DEFAULT_MAX_DIMENSION, DEFAULT_PORT, DEFAULT_SUBMISSION_LIMIT,
};

/// Raw environment, as read by `envy` (`PORT` -> `port`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct EnvConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_address")]
    pub address: IpAddr,
    #[serde(default)]
    pub products_dir: Option<PathBuf>,
    #[serde(default = "default_volume_path")]
    pub railway_volume_mount_path: PathBuf,
    #[serde(default = "default_max_dimension")]
    pub image_max_dimension: u32,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default = "default_submission_limit")]
    pub submission_limit: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_address() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_volume_path() -> PathBuf {
    PathBuf::from("/data")
}

fn default_max_dimension() -> u32 {
    DEFAULT_MAX_DIMENSION
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

fn default_submission_limit() -> String {
    DEFAULT_SUBMISSION_LIMIT.to_string()
}

/// Resolved settings handed to the store, the catalog and rocket.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub address: IpAddr,
    pub port: u16,
    pub products_dir: PathBuf,
    pub max_dimension: u32,
    pub jpeg_quality: u8,
    pub submission_limit: String,
}

impl AppConfig {
    /// Read `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let env = envy::from_env::<EnvConfig>().context("failed to read configuration from environment")?;
        Ok(Self::resolve(env))
    }

    pub fn resolve(env: EnvConfig) -> Self {
        let products_dir = match env.products_dir {
            Some(products_dir) => {
                info!("Using configured products directory: {}", products_dir.display());
                products_dir
            }
            None => select_products_dir(&env.railway_volume_mount_path, Path::new(".")),
        };

        AppConfig {
            address: env.address,
            port: env.port,
            products_dir,
            max_dimension: env.image_max_dimension.max(1),
            jpeg_quality: env.jpeg_quality.clamp(1, 100),
            submission_limit: env.submission_limit,
        }
    }

    /// Defaults rooted at `products_dir`; used by tests and embedders.
    pub fn with_products_dir(products_dir: impl Into<PathBuf>) -> Self {
        AppConfig {
            address: default_address(),
            port: DEFAULT_PORT,
            products_dir: products_dir.into(),
            max_dimension: DEFAULT_MAX_DIMENSION,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            submission_limit: DEFAULT_SUBMISSION_LIMIT.to_string(),
        }
    }
}

/// Prefer the mounted persistent volume, fall back to `<base>/data/products`.
pub fn select_products_dir(volume_path: &Path, base_dir: &Path) -> PathBuf {
    if volume_path.exists() {
        let products_dir = volume_path.join("products");
        info!("Using persistent volume: {}", products_dir.display());
        products_dir
    } else {
        let products_dir = base_dir.join("data").join("products");
        info!(
            "Volume {} not found, using local storage: {}",
            volume_path.display(),
            products_dir.display()
        );
        products_dir
    }
}
