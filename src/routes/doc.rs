use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, RegisteredVendor, UserList},
        orders::{CreateOrderRequest, OrderList},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        vendors::VendorList,
    },
    entity::{products::ProductStatus, users::UserRole},
    models::{
        OrderDetail, Product, ProductStatusChange, SalesStats, User, VendorApproval,
        VendorSummary,
    },
    response::{ApiResponse, Meta},
    routes::{admin, auth, health, params, vendor},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::all_users,
        admin::list_vendors,
        admin::toggle_vendor,
        admin::list_products,
        admin::toggle_product,
        admin::list_orders,
        admin::create_order,
        admin::sales,
        vendor::create_product,
        vendor::update_product,
        vendor::my_products,
        vendor::my_orders,
        vendor::download_invoice
    ),
    components(
        schemas(
            User,
            UserRole,
            UserList,
            VendorSummary,
            VendorList,
            VendorApproval,
            Product,
            ProductStatus,
            ProductList,
            ProductStatusChange,
            OrderDetail,
            OrderList,
            SalesStats,
            RegisterRequest,
            RegisteredVendor,
            LoginRequest,
            LoginResponse,
            CreateProductRequest,
            UpdateProductRequest,
            CreateOrderRequest,
            params::Pagination,
            health::HealthData,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<OrderDetail>,
            ApiResponse<OrderList>,
            ApiResponse<SalesStats>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and user listing"),
        (name = "Admin", description = "Vendor review, catalog moderation, orders and sales"),
        (name = "Vendor", description = "Vendor catalog, orders and invoices"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
