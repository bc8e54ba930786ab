pub mod catalog;
pub mod nasa_power;
pub mod sizing;
