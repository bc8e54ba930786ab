pub mod catalog;
pub mod irradiance;
pub mod sizing;
