use serde::Serialize;
use utoipa::ToSchema;

use crate::models::VendorSummary;

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct VendorList {
    #[schema(value_type = Vec<VendorSummary>)]
    pub items: Vec<VendorSummary>,
}
