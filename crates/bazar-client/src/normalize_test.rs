use bazar_core::EntityId;
use rust_decimal::Decimal;
use serde_json::json;

use super::*;

fn raw_product(value: Value) -> RawProduct {
    serde_json::from_value(value).expect("raw product")
}

#[test]
fn spanish_keys_map_to_canonical_fields() {
    let product = normalize_product(raw_product(json!({
        "id": 7,
        "nombre": "Taladro",
        "descripcion": "Percutor 600W",
        "precio": "49.90",
        "stock": "4",
        "discount_pct": 10,
        "feature": "true",
        "urlImagen": "https://cdn.example.com/t.jpg",
        "urlVideo": "https://youtu.be/abc",
        "marca": "Bosch",
        "code": "TAL-600",
        "garantia": "1 año",
        "categoria_id": "3",
        "subcategoria_id": 9,
        "createdAt": "2024-03-05T10:00:00Z"
    })))
    .unwrap();

    assert_eq!(product.id, EntityId::from(7));
    assert_eq!(product.name, "Taladro");
    assert_eq!(product.description, "Percutor 600W");
    assert_eq!(product.price, Decimal::new(4990, 2));
    assert_eq!(product.stock, Some(4));
    assert_eq!(product.discount_pct, Decimal::from(10));
    assert!(product.featured);
    assert_eq!(product.image_url.as_deref(), Some("https://cdn.example.com/t.jpg"));
    assert_eq!(product.video_url.as_deref(), Some("https://youtu.be/abc"));
    assert_eq!(product.brand.as_deref(), Some("Bosch"));
    assert_eq!(product.sku.as_deref(), Some("TAL-600"));
    assert_eq!(product.warranty.as_deref(), Some("1 año"));
    assert_eq!(product.category_id, Some(EntityId::from("3")));
    assert_eq!(product.subcategory_id, Some(EntityId::from("9")));
    assert_eq!(
        product.created_at.map(|d| d.date_naive().to_string()).as_deref(),
        Some("2024-03-05")
    );
}

#[test]
fn english_keys_map_to_the_same_fields() {
    let product = normalize_product(raw_product(json!({
        "id": "7",
        "name": "Drill",
        "description": "Hammer drill",
        "price": 49.9,
        "discountPct": "5",
        "featured": true,
        "imageUrl": "https://cdn.example.com/d.jpg",
        "brand": "Bosch",
        "sku": "DR-1",
        "categoryId": 3,
        "subCategoryId": "9"
    })))
    .unwrap();

    assert_eq!(product.id, EntityId::from(7));
    assert_eq!(product.price, Decimal::new(499, 1));
    assert_eq!(product.discount_pct, Decimal::from(5));
    assert!(product.featured);
    assert_eq!(product.category_id, Some(EntityId::from(3)));
    assert_eq!(product.subcategory_id, Some(EntityId::from(9)));
    assert_eq!(product.stock, None);
}

#[test]
fn spanish_name_wins_over_english_name() {
    let product = normalize_product(raw_product(json!({
        "id": 1, "nombre": "Martillo", "name": "Hammer", "precio": 5, "price": 6
    })))
    .unwrap();
    assert_eq!(product.name, "Martillo");
    assert_eq!(product.price, Decimal::from(5));
}

#[test]
fn nested_category_reference_supplies_id_and_name() {
    let product = normalize_product(raw_product(json!({
        "id": 1,
        "name": "Hammer",
        "category": {"id": 4, "name": "Tools"}
    })))
    .unwrap();
    assert_eq!(product.category_id, Some(EntityId::from(4)));
    assert_eq!(product.category_name.as_deref(), Some("Tools"));
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let product = normalize_product(raw_product(json!({"id": 2}))).unwrap();
    assert_eq!(product.name, "Producto");
    assert_eq!(product.price, Decimal::ZERO);
    assert_eq!(product.discount_pct, Decimal::ZERO);
    assert!(!product.featured);
    assert!(product.description.is_empty());
    assert!(product.category_id.is_none());
}

#[test]
fn negative_stock_is_clamped_to_zero() {
    let product = normalize_product(raw_product(json!({"id": 2, "stock": -3}))).unwrap();
    assert_eq!(product.stock, Some(0));
}

#[test]
fn product_without_id_is_rejected() {
    let err = normalize_product(raw_product(json!({"name": "Ghost"}))).unwrap_err();
    assert!(matches!(err, ClientError::Normalization { entity: "product", .. }));
}

#[test]
fn odd_field_types_do_not_reject_the_record() {
    let product = normalize_product(raw_product(json!({
        "id": 3,
        "name": "Odd",
        "price": {"amount": 5},
        "stock": [1, 2]
    })))
    .unwrap();
    assert_eq!(product.price, Decimal::ZERO);
    assert_eq!(product.stock, None);
}

#[test]
fn tree_subcategories_inherit_parent_category() {
    let raw: RawCategory = serde_json::from_value(json!({
        "id": 1,
        "name": "Tools",
        "subCats": [
            {"id": 10, "name": "Drills"},
            {"id": 11, "name": "Saws", "category_id": 2},
            {"name": "No id"}
        ]
    }))
    .unwrap();

    let node = normalize_tree_node(raw).unwrap();
    assert_eq!(node.category.name, "Tools");
    assert_eq!(node.subcategories.len(), 2);
    assert_eq!(node.subcategories[0].category_id, Some(EntityId::from(1)));
    assert_eq!(node.subcategories[1].category_id, Some(EntityId::from(2)));
}

#[test]
fn subcategory_key_variants_are_all_accepted() {
    for key in ["sub_categories", "subcategories", "subCats"] {
        let mut body = json!({"id": 1, "nombre": "Hogar"});
        body[key] = json!([{"id": 5, "nombre": "Cocina"}]);
        let raw: RawCategory = serde_json::from_value(body).unwrap();
        let node = normalize_tree_node(raw).unwrap();
        assert_eq!(node.category.name, "Hogar");
        assert_eq!(node.subcategories.len(), 1, "key {key}");
        assert_eq!(node.subcategories[0].name, "Cocina");
    }
}

#[test]
fn normalize_list_skips_bad_records() {
    let items = vec![
        json!({"id": 1, "name": "A"}),
        json!({"name": "no id"}),
        json!("not an object"),
        json!({"id": 2, "name": "B"}),
    ];
    let products = normalize_list(&items, "product", normalize_product);
    let ids: Vec<_> = products.iter().map(|p| p.id.as_str().to_string()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[test]
fn datetime_formats_are_lenient() {
    let with_space = scalar_datetime(&Scalar::Str("2024-01-02 03:04:05".into())).unwrap();
    assert_eq!(with_space.to_rfc3339(), "2024-01-02T03:04:05+00:00");

    let bare = scalar_datetime(&Scalar::Str("2024-01-02".into())).unwrap();
    assert_eq!(bare.to_rfc3339(), "2024-01-02T00:00:00+00:00");

    let millis = scalar_datetime(&Scalar::Int(0)).unwrap();
    assert_eq!(millis.to_rfc3339(), "1970-01-01T00:00:00+00:00");

    assert!(scalar_datetime(&Scalar::Str("yesterday".into())).is_none());
}

#[test]
fn user_blank_fields_become_none() {
    let user = normalize_user(RawUser {
        id: Some(Scalar::Int(1)),
        username: Some("admin".into()),
        role: Some("  ".into()),
    });
    assert_eq!(user.id, Some(EntityId::from(1)));
    assert_eq!(user.username.as_deref(), Some("admin"));
    assert!(user.role.is_none());
}
