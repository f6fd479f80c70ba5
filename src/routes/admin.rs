use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};

use crate::{
    dto::{
        orders::{CreateOrderRequest, OrderList},
        products::ProductList,
        vendors::VendorList,
    },
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AdminUser,
    models::{OrderDetail, ProductStatusChange, SalesStats, VendorApproval},
    response::ApiResponse,
    routes::params::Pagination,
    services::{order_service, product_service, vendor_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vendors", get(list_vendors))
        .route("/vendor-toggle/{id}", put(toggle_vendor))
        .route("/products", get(list_products))
        .route("/product-toggle/{id}", put(toggle_product))
        .route("/orders", get(list_orders).post(create_order))
        .route("/sales", get(sales))
}

#[utoipa::path(
    get,
    path = "/api/admin/vendors",
    responses(
        (status = 200, description = "All vendors, unapproved first", body = ApiResponse<VendorList>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_vendors(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<VendorList>>> {
    let resp = vendor_service::list_vendors(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/vendor-toggle/{id}",
    params(("id" = i64, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Approval flipped", body = ApiResponse<VendorApproval>),
        (status = 400, description = "Invalid vendor id"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Vendor not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn toggle_vendor(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<ApiResponse<VendorApproval>>> {
    let resp = vendor_service::toggle_approval(&state, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/products",
    params(Pagination),
    responses(
        (status = 200, description = "All products, newest first", body = ApiResponse<ProductList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_products(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppQuery(query): AppQuery<Pagination>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_all_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/product-toggle/{id}",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Status flipped", body = ApiResponse<ProductStatusChange>),
        (status = 400, description = "Invalid product id"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn toggle_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<ApiResponse<ProductStatusChange>>> {
    let resp = product_service::toggle_status(&state, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(Pagination),
    responses(
        (status = 200, description = "All orders, newest first", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppQuery(query): AppQuery<Pagination>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_all_orders(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderDetail>),
        (status = 400, description = "Invalid input or product/vendor not eligible"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Product or vendor not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_order(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppJson(payload): AppJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderDetail>>)> {
    let resp = order_service::create_order(&state, &admin, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/admin/sales",
    responses(
        (status = 200, description = "Order count, revenue and approved vendors", body = ApiResponse<SalesStats>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn sales(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<SalesStats>>> {
    let resp = order_service::sales_stats(&state).await?;
    Ok(Json(resp))
}
