//! Command implementations.

pub mod clear_cache;
pub mod export;
pub mod extract;
pub mod presets;
pub mod profile;

pub use self::clear_cache::execute_clear_cache;
pub use self::export::execute_export;
pub use self::extract::execute_extract;
pub use self::presets::execute_presets;
pub use self::profile::execute_profile;
