use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};

use crate::{
    dto::{
        orders::OrderList,
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
    },
    error::AppResult,
    extract::{AppJson, AppPath},
    invoice::InvoiceDocument,
    middleware::auth::VendorUser,
    models::Product,
    response::ApiResponse,
    services::{invoice_service, order_service, product_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/product", post(create_product))
        .route("/product/{id}", put(update_product))
        .route("/products", get(my_products))
        .route("/orders", get(my_orders))
        .route("/invoice/{order_id}", get(download_invoice))
}

#[utoipa::path(
    post,
    path = "/api/vendor/product",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<Product>),
        (status = 400, description = "Invalid product"),
        (status = 403, description = "Vendor not approved"),
        (status = 404, description = "Vendor not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Vendor"
)]
pub async fn create_product(
    State(state): State<AppState>,
    VendorUser(user): VendorUser,
    AppJson(payload): AppJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let resp = product_service::create_product(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/vendor/product/{id}",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<Product>),
        (status = 400, description = "Invalid product"),
        (status = 403, description = "Vendor not approved or not the owner"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Vendor"
)]
pub async fn update_product(
    State(state): State<AppState>,
    VendorUser(user): VendorUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::update_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/vendor/products",
    responses(
        (status = 200, description = "Caller's products, newest first", body = ApiResponse<ProductList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Vendor"
)]
pub async fn my_products(
    State(state): State<AppState>,
    VendorUser(user): VendorUser,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_own_products(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/vendor/orders",
    responses(
        (status = 200, description = "Orders placed against the caller", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Vendor"
)]
pub async fn my_orders(
    State(state): State<AppState>,
    VendorUser(user): VendorUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_vendor_orders(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/vendor/invoice/{order_id}",
    params(("order_id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "PDF invoice", content_type = "application/pdf", body = Vec<u8>),
        (status = 403, description = "Not the caller's order"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Vendor"
)]
pub async fn download_invoice(
    State(state): State<AppState>,
    VendorUser(user): VendorUser,
    AppPath(order_id): AppPath<i64>,
) -> AppResult<Response> {
    let document = invoice_service::vendor_invoice(&state, &user, order_id).await?;
    let disposition = document.content_disposition();

    Ok((
        [
            (header::CONTENT_TYPE, InvoiceDocument::CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}
