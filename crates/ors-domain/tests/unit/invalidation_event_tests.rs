//! Unit tests for invalidation events

use ors_domain::{ChangeKind, EntityKind, InvalidationEvent, ProductDto};
use uuid::Uuid;

#[test]
fn test_deleted_event_wire_format() {
    let id = Uuid::new_v4();
    let json = format!(r#"{{"entityType":"product","entityId":"{id}","event":"deleted"}}"#);
    let event = InvalidationEvent::from_slice(json.as_bytes()).unwrap();

    assert_eq!(event.entity_type, EntityKind::Product);
    assert_eq!(event.event, ChangeKind::Deleted);
    assert!(event.snapshot.is_none());
    assert_eq!(event.cache_key().to_string(), format!("product:{id}"));
}

#[test]
fn test_updated_event_carries_snapshot() {
    let product = ProductDto {
        product_id: Uuid::new_v4(),
        product_name: "Lamp".to_string(),
        category: "Furniture".to_string(),
        unit_price: Some(12.0),
        quantity_in_stock: Some(4),
        img_url: None,
    };

    let event = InvalidationEvent::updated(&product).unwrap();
    let decoded = InvalidationEvent::from_slice(&event.to_vec().unwrap()).unwrap();

    assert_eq!(decoded.event, ChangeKind::Updated);
    assert_eq!(decoded.entity_id, product.product_id);
    let snapshot: ProductDto = serde_json::from_value(decoded.snapshot.unwrap()).unwrap();
    assert_eq!(snapshot, product);
}

#[test]
fn test_malformed_event_is_invalidation_error() {
    let err = InvalidationEvent::from_slice(b"not json").unwrap_err();
    assert!(matches!(err, ors_domain::Error::Invalidation { .. }));

    let unknown_kind = br#"{"entityType":"product","entityId":"00000000-0000-0000-0000-000000000000","event":"created"}"#;
    assert!(InvalidationEvent::from_slice(unknown_kind).is_err());
}

#[test]
fn test_change_kind_names() {
    assert_eq!(ChangeKind::Updated.as_str(), "updated");
    assert_eq!("deleted".parse::<ChangeKind>().unwrap(), ChangeKind::Deleted);
    assert!("product.delete".parse::<ChangeKind>().is_err());
}
