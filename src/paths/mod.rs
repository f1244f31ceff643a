pub mod allowlist;
pub mod validate;

pub use allowlist::{validate_save_path, AllowedPaths};
pub use validate::{
    validate_path, validate_path_from, validate_path_with_allowed_dirs, validate_path_within,
    PathRejection,
};
