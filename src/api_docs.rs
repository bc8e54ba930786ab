use utoipa::OpenApi;
use crate::controllers::{catalog_controller, irradiance_controller, sizing_controller};
use crate::models::{catalog, irradiance, sizing};

#[derive(OpenApi)]
#[openapi(
    paths(
        irradiance_controller::list_parameters,
        irradiance_controller::get_irradiance,
        sizing_controller::size_site,
        sizing_controller::estimate,
        catalog_controller::list_panels,
        catalog_controller::get_panel,
        catalog_controller::create_panel,
        catalog_controller::delete_panel,
        catalog_controller::list_inverters,
        catalog_controller::get_inverter,
        catalog_controller::create_inverter,
        catalog_controller::delete_inverter
    ),
    components(
        schemas(
            irradiance::Parameter,
            irradiance::YearRange,
            irradiance::IrradianceResponse,
            sizing::PanelOptions,
            sizing::SizingRequest,
            sizing::EstimateRequest,
            sizing::SizingResult,
            sizing::SiteSizingResponse,
            catalog::NewPanel,
            catalog::Panel,
            catalog::PanelView,
            catalog::NewInverter,
            catalog::Inverter,
            catalog::InverterView
        )
    ),
    tags(
        (name = "solar-sizing", description = "PV system sizing from NASA POWER irradiance")
    )
)]
pub struct ApiDoc;
