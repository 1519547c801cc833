pub mod params;

pub use params::validate_config;
