//! Shopping cart module.
//!
//! Contains line items, booking date ranges, merged display rows and the
//! checkout selection over them.

mod dates;
mod line_item;
mod merge;

pub use dates::BookingDate;
pub use line_item::{cart_total, Activity, LineItem, MAX_QUANTITY_PER_ITEM};
pub use merge::{
    merge_line_items, selected_total, try_merge_line_items, CartSelection, MergedLineItem,
};
