pub mod catalog_controller;
pub mod irradiance_controller;
pub mod sizing_controller;
