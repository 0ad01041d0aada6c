//! Cart commands.

use anyhow::{bail, Result};
use dialoguer::Confirm;
use trip_cart::{BatchReport, CartError, CartPage};
use trip_commerce::cart::BookingDate;
use trip_commerce::{ActivityId, LineItemId};

use super::{CartArgs, CartCommand};
use crate::context::{Context, Session};

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let session = ctx.session()?;

    match args.command {
        CartCommand::List { merged: false } => list(&session, ctx).await,
        CartCommand::List { merged: true } => list_merged(&session, ctx).await,
        CartCommand::Add {
            activity,
            quantity,
            check_in,
            check_out,
        } => {
            let dates = match (check_in, check_out) {
                (Some(check_in), Some(check_out)) => Some(BookingDate::new(check_in, check_out)?),
                (None, None) => None,
                _ => bail!("--check-in and --check-out must be given together"),
            };
            add(&session, ctx, ActivityId::new(activity), quantity, dates).await
        }
        CartCommand::Remove { ids, yes } => remove(&session, ctx, ids, yes).await,
        CartCommand::Inc { id } => {
            session.store.handle().increase(&LineItemId::new(id)).await?;
            show_count(&session, ctx)
        }
        CartCommand::Dec { id } => {
            session.store.handle().decrease(&LineItemId::new(id)).await?;
            show_count(&session, ctx)
        }
        CartCommand::Update { id, quantity } => {
            session.store.update(&LineItemId::new(id), quantity).await?;
            show_count(&session, ctx)
        }
        CartCommand::Total { select } => total(&session, ctx, select).await,
    }
}

async fn list(session: &Session, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading cart...");
    let items = session.store.fetch().await;
    spinner.finish_and_clear();
    let items = items?;

    if ctx.output.is_json() {
        ctx.output.json(&items);
        return Ok(());
    }

    ctx.output.header("Cart");
    if items.is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }

    let widths = [14, 12, 28, 4, 16];
    ctx.output.table_row(&["ID", "ACTIVITY", "TITLE", "QTY", "UNIT PRICE"], &widths);
    for item in &items {
        ctx.output.table_row(
            &[
                item.id.as_str(),
                item.activity_id.as_str(),
                item.title.as_deref().unwrap_or("-"),
                &item.quantity.to_string(),
                &item.unit_price().display(),
            ],
            &widths,
        );
    }

    ctx.output.info("");
    ctx.output.kv("total", &session.store.total()?.display());
    Ok(())
}

async fn list_merged(session: &Session, ctx: &Context) -> Result<()> {
    let mut page = CartPage::new(session.store.handle(), session.dates.clone());

    let spinner = ctx.output.spinner("Loading cart...");
    let rows = page.load().await;
    spinner.finish_and_clear();
    let rows = rows?;

    if ctx.output.is_json() {
        ctx.output.json(&rows);
        return Ok(());
    }

    ctx.output.header("Cart");
    if rows.is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }

    for row in &rows {
        let title = row.title.as_deref().unwrap_or(row.activity_id.as_str());
        ctx.output.list_item(&format!(
            "{} x{}  {}",
            title,
            row.quantity,
            row.subtotal.display()
        ));
        if let Some(dates) = page.display_dates(row) {
            ctx.output.kv("dates", &dates);
        }
        let ids: Vec<&str> = row.line_item_ids.iter().map(|id| id.as_str()).collect();
        ctx.output.kv("line items", &ids.join(", "));
    }
    Ok(())
}

async fn add(
    session: &Session,
    ctx: &Context,
    activity_id: ActivityId,
    quantity: u32,
    dates: Option<BookingDate>,
) -> Result<()> {
    let spinner = ctx
        .output
        .spinner(&format!("Adding {} x{}...", activity_id, quantity));
    let result = session.store.add(&activity_id, quantity, dates).await;
    spinner.finish_and_clear();

    let report = report_batch(ctx, result)?;
    if let Some(dates) = dates {
        session.dates.remember(&activity_id, dates)?;
    }
    if !ctx.output.is_json() {
        ctx.output
            .success(&format!("Added {} unit(s) of {}", report.succeeded(), activity_id));
        show_count(session, ctx)?;
    }
    Ok(())
}

async fn remove(session: &Session, ctx: &Context, ids: Vec<String>, yes: bool) -> Result<()> {
    let ids: Vec<LineItemId> = ids.into_iter().map(LineItemId::new).collect();

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove {} line item(s)?", ids.len()))
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    let result = session.store.remove_many(&ids).await;
    report_batch(ctx, result)?;
    if !ctx.output.is_json() {
        show_count(session, ctx)?;
    }
    Ok(())
}

async fn total(session: &Session, ctx: &Context, select: Vec<String>) -> Result<()> {
    let mut page = CartPage::new(session.store.handle(), session.dates.clone());
    page.load().await?;

    let total = if select.is_empty() {
        session.store.total()?
    } else {
        for activity in select {
            let activity_id = ActivityId::new(activity);
            page.row(&activity_id)?;
            if !page.selection().is_selected(&activity_id) {
                page.toggle(&activity_id);
            }
        }
        page.selected_total()?
    };

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "amount": total.amount,
            "currency": total.currency.code(),
            "display": total.display(),
        }));
    } else {
        ctx.output.kv("total", &total.display());
    }
    Ok(())
}

/// Print the per-request outcome of a batch, then surface its error.
fn report_batch(ctx: &Context, result: Result<BatchReport, CartError>) -> Result<BatchReport> {
    match result {
        Ok(report) => {
            ctx.output.batch(&report);
            Ok(report)
        }
        Err(CartError::PartialFailure(report)) => {
            ctx.output.batch(&report);
            bail!(CartError::PartialFailure(report))
        }
        Err(e) => Err(e.into()),
    }
}

fn show_count(session: &Session, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "items": session.store.item_count(),
            "total": session.store.total()?.display(),
        }));
        return Ok(());
    }
    ctx.output.kv("items in cart", &session.store.item_count().to_string());
    Ok(())
}
