use poem_openapi::param::Path;
use poem_openapi::payload::Json;
use poem_openapi::{OpenApi, Tags};

use crate::catalog;

/// Province → units lookup used by the report form
pub struct UnitsApi;

#[derive(Tags)]
enum ApiTags {
    /// Static catalog lookups
    Catalog,
}

#[OpenApi]
impl UnitsApi {
    /// Units reporting under a province
    ///
    /// Unknown provinces yield an empty list.
    #[oai(path = "/:province", method = "get", tag = "ApiTags::Catalog")]
    async fn get_units(&self, province: Path<String>) -> Json<Vec<String>> {
        Json(catalog::units_for(&province.0).iter().map(|unit| unit.to_string()).collect())
    }
}
