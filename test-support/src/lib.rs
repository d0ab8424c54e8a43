pub mod isolated_data;
pub mod timeouts;

pub use isolated_data::IsolatedData;

/// Check if running in CI environment.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
}
