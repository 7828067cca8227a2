//! Path resolution for romdl data and configuration.
//!
//! - `ROMDL_DATA_DIR` overrides the data root (queue file location)
//! - `ROMDL_CONFIG` overrides the catalog configuration file

mod error;
mod platform;

pub use error::PathError;
pub use platform::{
    CONFIG_ENV_VAR, DATA_DIR_ENV_VAR, config_file_path, data_root, normalize_user_path,
    queue_file_path,
};
