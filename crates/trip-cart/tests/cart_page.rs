mod common;

use common::{harness, Call, Harness};
use trip_cart::{CartError, CartPage, DateCache};
use trip_commerce::cart::BookingDate;
use trip_commerce::{ActivityId, LineItemId};

fn a(id: &str) -> ActivityId {
    ActivityId::new(id)
}

/// A1 booked twice (1 + 2 units at 90 000), A2 once at 50 000.
async fn loaded() -> (Harness, CartPage, DateCache) {
    let h = harness();
    h.api.with_activity("A1", 100_000, Some(90_000));
    h.api.with_activity("A2", 50_000, None);
    h.api.with_item("li-1", "A1", 1);
    h.api.with_item("li-2", "A1", 2);
    h.api.with_item("li-3", "A2", 1);

    let dates = DateCache::in_memory();
    let mut page = CartPage::new(h.store.handle(), dates.clone());
    page.load().await.unwrap();
    (h, page, dates)
}

#[tokio::test]
async fn test_rows_merge_by_activity() {
    let (_h, page, _) = loaded().await;

    let rows = page.rows().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].activity_id, a("A1"));
    assert_eq!(rows[0].quantity, 3);
    assert_eq!(
        rows[0].line_item_ids,
        vec![LineItemId::new("li-1"), LineItemId::new("li-2")]
    );
    assert_eq!(rows[0].subtotal.amount, 270_000);
}

#[tokio::test]
async fn test_selected_total() {
    let (_h, mut page, _) = loaded().await;
    assert_eq!(page.selected_total().unwrap().amount, 0);

    assert!(page.toggle(&a("A1")));
    assert_eq!(page.selected_total().unwrap().amount, 270_000);

    page.toggle_all().unwrap();
    assert_eq!(page.selection().len(), 2);
    assert_eq!(page.selected_total().unwrap().amount, 320_000);

    page.toggle_all().unwrap();
    assert!(page.selection().is_empty());
}

#[tokio::test]
async fn test_increase_row_uses_first_line_item() {
    let (h, page, _) = loaded().await;

    page.increase_row(&a("A1")).await.unwrap();

    assert!(h.api.calls().contains(&Call::Update("li-1".into(), 2)));
    assert_eq!(page.row(&a("A1")).unwrap().quantity, 4);
}

#[tokio::test]
async fn test_decrease_row_uses_last_line_item() {
    let (h, page, _) = loaded().await;

    page.decrease_row(&a("A1")).await.unwrap();

    assert!(h.api.calls().contains(&Call::Update("li-2".into(), 1)));
    assert_eq!(page.row(&a("A1")).unwrap().quantity, 2);
}

#[tokio::test]
async fn test_remove_row_deletes_every_line_item() {
    let (h, mut page, _) = loaded().await;
    page.toggle(&a("A1"));

    let report = page.remove_row(&a("A1")).await.unwrap();

    assert_eq!(report.total(), 2);
    assert_eq!(h.api.count(|c| matches!(c, Call::Delete(_))), 2);
    assert_eq!(page.rows().unwrap().len(), 1);
    assert!(page.selection().is_empty());
}

#[tokio::test]
async fn test_remove_selected() {
    let (h, mut page, _) = loaded().await;
    page.toggle(&a("A2"));

    page.remove_selected().await.unwrap();

    assert_eq!(h.api.calls().iter().filter(|c| matches!(c, Call::Delete(_))).count(), 1);
    assert!(h.api.calls().contains(&Call::Delete("li-3".into())));
    let rows = page.rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].activity_id, a("A1"));
    assert!(page.selection().is_empty());
}

#[tokio::test]
async fn test_remove_selected_requires_selection() {
    let (_h, mut page, _) = loaded().await;

    let result = page.remove_selected().await;

    assert!(matches!(result, Err(CartError::Validation(_))));
}

#[tokio::test]
async fn test_unknown_row_is_not_found() {
    let (_h, page, _) = loaded().await;

    assert!(matches!(
        page.increase_row(&a("A9")).await,
        Err(CartError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_display_dates_fall_back_to_cache() {
    let (_h, page, dates) = loaded().await;
    let row = page.row(&a("A1")).unwrap();
    assert_eq!(page.display_dates(&row), None);

    dates
        .remember(&a("A1"), BookingDate::parse("2025-05-10", "2025-05-11").unwrap())
        .unwrap();

    assert_eq!(
        page.display_dates(&row).as_deref(),
        Some("10 May 2025 - 11 May 2025")
    );
}

#[tokio::test]
async fn test_page_fails_once_store_disposed() {
    let (h, page, _) = loaded().await;

    h.store.dispose();

    assert_eq!(page.rows(), Err(CartError::Inactive));
    assert_eq!(page.increase_row(&a("A1")).await, Err(CartError::Inactive));
}
