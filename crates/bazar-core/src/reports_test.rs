use chrono::TimeZone;

use super::*;

fn at(y: i32, m: u32, d: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).single()
}

fn product(id: &str, category: Option<&str>, stock: u32, price: i64) -> Product {
    let mut p = Product::new(id, format!("Producto {id}"), Decimal::new(price, 0));
    p.category_id = category.map(EntityId::from);
    p.stock = Some(stock);
    p
}

fn index() -> CategoryIndex {
    CategoryIndex::new(
        &[
            Category {
                id: EntityId::from("X"),
                name: "Ferretería".to_string(),
            },
            Category {
                id: EntityId::from("Y"),
                name: "Hogar".to_string(),
            },
        ],
        &[Subcategory {
            id: EntityId::from("SY"),
            name: "Cocina".to_string(),
            category_id: Some(EntityId::from("Y")),
        }],
    )
}

#[test]
fn category_sums_use_final_price() {
    let mut a = product("1", Some("X"), 5, 20);
    a.discount_pct = Decimal::new(50, 0);
    let b = product("2", Some("X"), 7, 20);

    let breakdown = category_breakdown(&[a, b], &index());
    assert_eq!(breakdown.len(), 1);
    let x = &breakdown[0];
    assert_eq!(x.category_id, EntityId::from("X"));
    assert_eq!(x.category_name, "Ferretería");
    assert_eq!(x.product_count, 2);
    assert_eq!(x.stock, 12);
    assert_eq!(x.inventory_value, Decimal::new(190, 0));
}

#[test]
fn category_resolves_through_subcategory_when_missing() {
    let mut p = product("1", None, 3, 10);
    p.subcategory_id = Some(EntityId::from("SY"));
    let orphan = product("2", None, 4, 10);

    let breakdown = category_breakdown(&[p, orphan], &index());
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].category_id, EntityId::from("Y"));
    assert_eq!(breakdown[0].stock, 3);
}

#[test]
fn unknown_category_gets_generated_label() {
    let breakdown = category_breakdown(&[product("1", Some("Z"), 1, 1)], &index());
    assert_eq!(breakdown[0].category_name, "Category Z");
}

#[test]
fn monthly_counts_group_by_year_and_month() {
    let mut a = product("1", None, 0, 1);
    a.created_at = at(2025, 3, 1);
    let mut b = product("2", None, 0, 1);
    b.created_at = at(2025, 3, 28);
    let mut c = product("3", None, 0, 1);
    c.created_at = at(2024, 12, 5);
    let undated = product("4", None, 0, 1);

    let months = monthly_counts(&[a, b, c, undated]);
    let keys: Vec<_> = months.iter().map(|m| (m.key(), m.count)).collect();
    assert_eq!(
        keys,
        vec![("2024-12".to_string(), 1), ("2025-03".to_string(), 2)]
    );
}

#[test]
fn date_range_is_inclusive_and_excludes_undated() {
    let range = DateRange {
        from: NaiveDate::from_ymd_opt(2025, 1, 10),
        to: NaiveDate::from_ymd_opt(2025, 1, 20),
    };
    assert!(range.contains(at(2025, 1, 10)));
    assert!(range.contains(Utc.with_ymd_and_hms(2025, 1, 20, 23, 59, 59).single()));
    assert!(!range.contains(at(2025, 1, 21)));
    assert!(!range.contains(at(2025, 1, 9)));
    assert!(!range.contains(None));

    assert!(DateRange::default().contains(None));
}

#[test]
fn filter_by_date_with_open_upper_bound() {
    let mut old = product("1", None, 0, 1);
    old.created_at = at(2023, 6, 1);
    let mut new = product("2", None, 0, 1);
    new.created_at = at(2025, 6, 1);

    let range = DateRange {
        from: NaiveDate::from_ymd_opt(2024, 1, 1),
        to: None,
    };
    let kept = filter_by_date(&[old, new], range);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id, EntityId::from("2"));
}

#[test]
fn low_stock_takes_ten_lowest_and_tags_threshold() {
    let products: Vec<Product> = (0..15u32)
        .rev()
        .map(|i| product(&format!("p{i}"), Some("X"), i, 1))
        .collect();
    let entries = low_stock(&products, &index(), LOW_STOCK_LIMIT, 5);
    assert_eq!(entries.len(), 10);
    let stocks: Vec<_> = entries.iter().map(|e| e.stock).collect();
    assert_eq!(stocks, (0..10).collect::<Vec<_>>());
    assert!(entries[5].needs_reorder);
    assert!(!entries[6].needs_reorder);
    assert_eq!(entries[0].category, "Ferretería");
}

#[test]
fn kpis_summarize_products() {
    let mut a = product("1", Some("X"), 2, 10);
    a.created_at = at(2025, 2, 1);
    let mut b = product("2", Some("Y"), 3, 5);
    b.created_at = at(2025, 5, 1);
    let c = product("3", Some("X"), 0, 100);

    let k = kpis(&[a, b, c], &index());
    assert_eq!(k.total_products, 3);
    assert_eq!(k.distinct_categories, 2);
    assert_eq!(k.total_stock, 5);
    assert_eq!(k.inventory_value, Decimal::new(35, 0));
    assert_eq!(k.last_added, at(2025, 5, 1));
}

#[test]
fn kpis_of_empty_list_are_zero() {
    let k = kpis(&[], &index());
    assert_eq!(k.total_products, 0);
    assert_eq!(k.inventory_value, Decimal::ZERO);
    assert!(k.last_added.is_none());
}

#[test]
fn export_rows_carry_labels_and_line_values() {
    let mut p = product("1", None, 4, 10);
    p.subcategory_id = Some(EntityId::from("SY"));
    p.sku = Some("C-001".to_string());
    p.discount_pct = Decimal::new(10, 0);

    let rows = export_rows(&[p], &index());
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.position, 1);
    assert_eq!(row.category, "Hogar");
    assert_eq!(row.subcategory, "Cocina");
    assert_eq!(row.final_price, Decimal::new(9, 0));
    assert_eq!(row.line_value, Decimal::new(36, 0));
}

#[test]
fn inventory_report_scopes_every_section_to_range() {
    let mut inside = product("1", Some("X"), 2, 10);
    inside.created_at = at(2025, 4, 2);
    let mut outside = product("2", Some("Y"), 9, 10);
    outside.created_at = at(2025, 8, 2);

    let range = DateRange {
        from: NaiveDate::from_ymd_opt(2025, 4, 1),
        to: NaiveDate::from_ymd_opt(2025, 4, 30),
    };
    let report = InventoryReport::build(&[inside, outside], &index(), range, 5);
    assert_eq!(report.kpis.total_products, 1);
    assert_eq!(report.monthly.len(), 1);
    assert_eq!(report.categories.len(), 1);
    assert_eq!(report.low_stock.len(), 1);
    assert!(report.low_stock[0].needs_reorder);
}
