use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::{
    dto::vendors::VendorList,
    entity::vendors::{Column as VendorCol, Entity as Vendors, Model as VendorModel},
    error::{AppError, AppResult},
    extract::positive_id,
    middleware::auth::AuthUser,
    models::{VendorApproval, VendorSummary},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Resolves the vendor record behind an authenticated VENDOR user.
pub async fn current_vendor(state: &AppState, user: &AuthUser) -> AppResult<VendorModel> {
    Vendors::find()
        .filter(VendorCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Vendor not found"))
}

pub fn ensure_approved(vendor: &VendorModel) -> AppResult<()> {
    if !vendor.approved {
        return Err(AppError::Forbidden("Vendor not approved"));
    }
    Ok(())
}

/// Unapproved vendors first, so the review queue is at the top.
pub async fn list_vendors(state: &AppState) -> AppResult<ApiResponse<VendorList>> {
    let items = sqlx::query_as::<_, VendorSummary>(
        r#"
        SELECT v.id, v.user_id, u.name, u.email, v.approved
        FROM vendors v
        JOIN users u ON u.id = v.user_id
        ORDER BY v.approved ASC, v.id ASC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let total = items.len();
    Ok(ApiResponse::listed("Vendors", VendorList { items }, total))
}

/// Flips approval in one statement so concurrent toggles never collapse into one.
pub async fn toggle_approval(
    state: &AppState,
    admin: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<VendorApproval>> {
    let id = positive_id("id", id)?;

    let row: Option<(i64, bool)> = sqlx::query_as(
        "UPDATE vendors SET approved = NOT approved WHERE id = $1 RETURNING id, approved",
    )
    .bind(id)
    .fetch_optional(&state.pool)
    .await?;
    let (id, approved) = row.ok_or(AppError::NotFound("Vendor not found"))?;

    tracing::info!(vendor_id = id, approved, admin_id = admin.user_id, "vendor approval toggled");

    let message = if approved {
        "Vendor approved"
    } else {
        "Vendor de-approved"
    };
    Ok(ApiResponse::success(
        message,
        VendorApproval { id, approved },
        Some(Meta::empty()),
    ))
}
