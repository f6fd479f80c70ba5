use std::path::Path;

use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, Set, sea_query::OnConflict,
};

use crate::{
    db::OrmConn,
    entity::invoices::{ActiveModel as InvoiceActive, Column as InvoiceCol, Entity as Invoices},
    error::{AppError, AppResult},
    extract::positive_id,
    invoice::{InvoiceDocument, render_invoice},
    middleware::auth::AuthUser,
    services::{order_service::fetch_order_detail, vendor_service::current_vendor},
    state::AppState,
};

/// Renders the invoice of an order owned by the calling vendor.
pub async fn vendor_invoice(
    state: &AppState,
    user: &AuthUser,
    order_id: i64,
) -> AppResult<InvoiceDocument> {
    let order_id = positive_id("order_id", order_id)?;
    let vendor = current_vendor(state, user).await?;

    let order = fetch_order_detail(&state.pool, order_id)
        .await?
        .ok_or(AppError::NotFound("Order not found"))?;
    if order.vendor_id != vendor.id {
        return Err(AppError::Forbidden("Not your order"));
    }

    let document = render_invoice(&order);

    if let Some(dir) = state.invoice_dir.as_deref() {
        if let Err(err) = archive_invoice(&state.orm, dir, order.id, &document).await {
            tracing::warn!(error = %err, order_id = order.id, "invoice archive failed");
        }
    }

    Ok(document)
}

/// Keeps the first rendered copy of each invoice on disk and records where it lives.
async fn archive_invoice(
    orm: &OrmConn,
    dir: &Path,
    order_id: i64,
    document: &InvoiceDocument,
) -> anyhow::Result<()> {
    let existing = Invoices::find()
        .filter(InvoiceCol::OrderId.eq(order_id))
        .one(orm)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(&document.file_name);
    tokio::fs::write(&path, &document.bytes).await?;

    let record = InvoiceActive {
        id: NotSet,
        order_id: Set(order_id),
        file_path: Set(path.to_string_lossy().into_owned()),
        created_at: NotSet,
    };
    // A concurrent download may have recorded it first; that row stands.
    Invoices::insert(record)
        .on_conflict(OnConflict::column(InvoiceCol::OrderId).do_nothing().to_owned())
        .exec_without_returning(orm)
        .await?;

    tracing::debug!(order_id, path = %path.display(), "invoice archived");
    Ok(())
}
