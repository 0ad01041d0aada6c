//! Book an activity through the booking form flow.

use anyhow::Result;
use trip_commerce::booking::{BookingAction, BookingForm};
use trip_commerce::ActivityId;

use super::BookArgs;
use crate::context::Context;

/// Run the book command.
pub async fn run(args: BookArgs, ctx: &Context) -> Result<()> {
    let mut form = BookingForm::new(ActivityId::new(args.activity), args.check_in)?
        .with_quantity(args.quantity)?;
    if let Some(check_out) = args.check_out {
        form.set_check_out(check_out)?;
    }

    let action = if args.now {
        BookingAction::BookNow
    } else {
        BookingAction::AddToCart
    };

    let session = ctx.session()?;
    ctx.output.debug(&format!(
        "{} x{} {}",
        form.activity_id(),
        form.quantity(),
        form.dates().display()
    ));

    let spinner = ctx.output.spinner("Booking...");
    let result = session.booking().submit(&form, action).await;
    spinner.finish_and_clear();

    // The flow has already told the user what happened.
    let report = result?;
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "action": action.as_str(),
            "booked": report.succeeded(),
            "items": session.store.item_count(),
        }));
    }
    Ok(())
}
