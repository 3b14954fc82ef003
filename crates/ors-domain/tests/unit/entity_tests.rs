//! Unit tests for remote entities and orders

use chrono::Utc;
use ors_domain::{EntityKind, Order, OrderItem, ProductDto, RemoteEntity, UserDto};
use uuid::Uuid;

#[test]
fn test_user_wire_format() {
    let json = r#"{"userID":"2b9c3f4e-0d7a-4c1e-8f3b-5a6d7e8f9a0b","email":"ana@example.com","name":"Ana","gender":"Female"}"#;
    let user: UserDto = serde_json::from_str(json).unwrap();
    assert_eq!(user.name.as_deref(), Some("Ana"));
    assert_eq!(UserDto::KIND, EntityKind::User);

    let back = serde_json::to_value(&user).unwrap();
    assert!(back.get("userID").is_some());
}

#[test]
fn test_product_wire_format() {
    let json = r#"{"productID":"2b9c3f4e-0d7a-4c1e-8f3b-5a6d7e8f9a0b","productName":"Lamp","category":"Furniture","unitPrice":19.5,"quantityInStock":3}"#;
    let product: ProductDto = serde_json::from_str(json).unwrap();
    assert_eq!(product.product_name, "Lamp");
    assert_eq!(product.unit_price, Some(19.5));
    assert!(product.img_url.is_none());
}

#[test]
fn test_placeholders_are_marked_unavailable() {
    let user = UserDto::unavailable();
    assert!(user.is_unavailable());
    assert_eq!(user.name.as_deref(), Some("Temporarily Unavailable!"));

    let product = ProductDto::unavailable();
    assert!(product.is_unavailable());
    assert_eq!(product.product_name, "Temporarily Unavailable");
    assert_eq!(product.category, "Unavailable");
}

#[test]
fn test_real_entities_are_not_placeholders() {
    let user = UserDto {
        user_id: Uuid::new_v4(),
        email: None,
        name: Some("Ana".to_string()),
        gender: None,
    };
    assert!(!user.is_unavailable());
}

#[test]
fn test_order_totals_and_product_ids() {
    let lamp = Uuid::new_v4();
    let desk = Uuid::new_v4();
    let order = Order {
        order_id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        order_date: Utc::now(),
        items: vec![
            OrderItem {
                product_id: lamp,
                unit_price: 10.0,
                quantity: 2,
            },
            OrderItem {
                product_id: desk,
                unit_price: 100.0,
                quantity: 1,
            },
            OrderItem {
                product_id: lamp,
                unit_price: 10.0,
                quantity: 1,
            },
        ],
    };

    assert!((order.total_bill() - 130.0).abs() < f64::EPSILON);
    assert_eq!(order.product_ids(), vec![lamp, desk]);
}
