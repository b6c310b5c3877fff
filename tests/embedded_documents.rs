//! Embedded Document Tests
//!
//! Nested records through the public API:
//! - Flattened `data()` of nested documents and lists
//! - Subtypes accepted wherever the parent type is expected
//! - Shared defaults and clones
//! - Hydration from stored data

use std::rc::Rc;

use docfields::document::{Document, Embedded, EmbeddedList, Value};
use docfields::fields::{EmbeddedField, IntegerField, ListField, StringField};
use docfields::schema::Schema;
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn address() -> Rc<Schema> {
    Schema::embedded("Address")
        .field(StringField::new("street").required())
        .field(StringField::new("city"))
        .build()
}

fn order_line() -> Rc<Schema> {
    Schema::embedded("OrderLine")
        .field(StringField::new("sku").required())
        .field(IntegerField::new("quantity").min_value(1))
        .build()
}

fn order(address: &Rc<Schema>, line: &Rc<Schema>) -> Rc<Schema> {
    Schema::document("Order")
        .field(StringField::new("number").required())
        .field(EmbeddedField::new("ship_to", address).unwrap())
        .field(ListField::new("lines", line).unwrap())
        .build()
}

fn line_doc(line: &Rc<Schema>, sku: &str, quantity: i64) -> Document {
    let mut doc = Document::new(line).unwrap();
    doc.set("sku", sku).unwrap();
    doc.set("quantity", quantity).unwrap();
    doc
}

fn data(value: serde_json::Value) -> docfields::document::Data {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

// =============================================================================
// Flattening
// =============================================================================

#[test]
fn test_data_flattens_nested_documents() {
    let (address, line) = (address(), order_line());
    let mut order = Document::new(&order(&address, &line)).unwrap();

    let mut ship_to = Document::new(&address).unwrap();
    ship_to.set("street", "123 Elm St.").unwrap();
    order.set("number", "A-1").unwrap();
    order.set("ship_to", ship_to).unwrap();

    let lines = order.get("lines").and_then(Value::as_list).cloned().unwrap();
    lines.push(line_doc(&line, "sku-1", 2)).unwrap();
    lines.push(line_doc(&line, "sku-2", 1)).unwrap();

    assert_eq!(
        serde_json::Value::Object(order.data()),
        json!({
            "number": "A-1",
            "ship_to": { "street": "123 Elm St.", "city": null },
            "lines": [
                { "sku": "sku-1", "quantity": 2 },
                { "sku": "sku-2", "quantity": 1 }
            ]
        })
    );
}

#[test]
fn test_data_key_order_follows_declaration() {
    let (address, line) = (address(), order_line());
    let order = Document::new(&order(&address, &line)).unwrap();

    let rendered = serde_json::to_string(&order.data()).unwrap();
    assert_eq!(rendered, r#"{"number":null,"ship_to":null,"lines":[]}"#);
}

// =============================================================================
// Validation does not cascade
// =============================================================================

#[test]
fn test_nested_errors_stay_with_nested_document() {
    let (address, line) = (address(), order_line());
    let mut order = Document::new(&order(&address, &line)).unwrap();
    order.set("number", "A-1").unwrap();
    order.set("ship_to", Document::new(&address).unwrap()).unwrap();

    assert!(order.valid());

    let ship_to = order.get("ship_to").and_then(Value::as_embedded).cloned().unwrap();
    assert!(!ship_to.borrow_mut().valid());
    assert_eq!(
        ship_to.borrow().errors().full_messages().collect::<Vec<_>>(),
        vec!["Street is required"]
    );
}

#[test]
fn test_required_list_needs_items() {
    let line = order_line();
    let schema = Schema::document("Basket")
        .field(ListField::new("lines", &line).unwrap().required())
        .build();
    let mut basket = Document::new(&schema).unwrap();

    assert!(!basket.valid());
    assert_eq!(
        basket.errors().full_messages().collect::<Vec<_>>(),
        vec!["Lines is required"]
    );

    let lines = basket.get("lines").and_then(Value::as_list).cloned().unwrap();
    lines.push(line_doc(&line, "sku-1", 1)).unwrap();
    assert!(basket.valid());
}

// =============================================================================
// Subtypes
// =============================================================================

#[test]
fn test_subtypes_are_accepted() {
    let (address, line) = (address(), order_line());
    let po_box = Schema::extend(&address, "PoBox")
        .field(StringField::new("box_number"))
        .build();
    let mut order = Document::new(&order(&address, &line)).unwrap();

    let mut ship_to = Document::new(&po_box).unwrap();
    ship_to.set("street", "PO").unwrap();
    ship_to.set("box_number", "42").unwrap();
    order.set("ship_to", ship_to).unwrap();

    let stored = order.get("ship_to").and_then(Value::as_embedded).cloned().unwrap();
    assert_eq!(stored.schema().name(), "PoBox");
    assert!(stored.is_a(&address));
}

#[test]
fn test_same_name_different_type_is_rejected() {
    let (address, line) = (address(), order_line());
    let lookalike = Schema::embedded("Address")
        .field(StringField::new("street"))
        .build();
    let mut order = Document::new(&order(&address, &line)).unwrap();

    order.set("ship_to", Document::new(&lookalike).unwrap()).unwrap();
    assert_eq!(order.get("ship_to"), Some(&Value::Null));
}

// =============================================================================
// Shared defaults
// =============================================================================

#[test]
fn test_embedded_default_is_shared() {
    let address = address();
    let mut default = Document::new(&address).unwrap();
    default.set("street", "Main St.").unwrap();
    let default = Embedded::new(default);

    let schema = Schema::document("Customer")
        .field(
            EmbeddedField::new("address", &address)
                .unwrap()
                .default(default.clone()),
        )
        .build();

    let first = Document::new(&schema).unwrap();
    let second = Document::new(&schema).unwrap();

    default.borrow_mut().set("city", "Springfield").unwrap();

    assert_eq!(first.data()["address"]["city"], "Springfield");
    assert_eq!(second.data()["address"]["city"], "Springfield");
}

#[test]
fn test_embedded_default_shared_until_overridden() {
    let address = address();
    let mut default = Document::new(&address).unwrap();
    default.set("street", "Main St.").unwrap();
    let default = Embedded::new(default);

    let schema = Schema::document("Customer")
        .field(
            EmbeddedField::new("address", &address)
                .unwrap()
                .default(default.clone()),
        )
        .build();

    let mut first = Document::new(&schema).unwrap();
    let second = Document::new(&schema).unwrap();

    let mut own = Document::new(&address).unwrap();
    own.set("street", "Elm St.").unwrap();
    first.set("address", own).unwrap();

    assert_eq!(first.data()["address"]["street"], "Elm St.");
    assert_eq!(second.data()["address"]["street"], "Main St.");
    assert_eq!(default.borrow().get("street"), Some(&Value::from("Main St.")));
}

#[test]
fn test_list_default_shared_until_assigned() {
    let line = order_line();
    let default = EmbeddedList::new(&line);
    let schema = Schema::document("Basket")
        .field(ListField::new("lines", &line).unwrap().default(default.clone()))
        .build();

    let mut first = Document::new(&schema).unwrap();
    let second = Document::new(&schema).unwrap();

    first
        .set("lines", vec![Embedded::new(line_doc(&line, "sku-1", 1))])
        .unwrap();

    assert_eq!(first.get("lines").and_then(Value::as_list).unwrap().len(), 1);
    assert!(second.get("lines").and_then(Value::as_list).unwrap().is_empty());
    assert!(default.is_empty());

    // the instance now owns its list; later assignments replace in place
    let owned = first.get("lines").and_then(Value::as_list).cloned().unwrap();
    first
        .set("lines", vec![Embedded::new(line_doc(&line, "sku-2", 2))])
        .unwrap();
    assert!(first.get("lines").and_then(Value::as_list).unwrap().ptr_eq(&owned));
    assert_eq!(owned.len(), 1);
}

#[test]
fn test_mismatched_assignment_keeps_shared_default() {
    let line = order_line();
    let other = Schema::embedded("Other").build();
    let default = EmbeddedList::new(&line);
    let schema = Schema::document("Basket")
        .field(ListField::new("lines", &line).unwrap().default(default.clone()))
        .build();

    let mut basket = Document::new(&schema).unwrap();
    basket
        .set("lines", vec![Embedded::new(Document::new(&other).unwrap())])
        .unwrap();

    assert!(basket.get("lines").and_then(Value::as_list).unwrap().ptr_eq(&default));
}

#[test]
fn test_clone_owns_its_lists() {
    let (address, line) = (address(), order_line());
    let schema = order(&address, &line);

    let original = Document::new(&schema).unwrap();
    let lines = original.get("lines").and_then(Value::as_list).cloned().unwrap();
    lines.push(line_doc(&line, "sku-1", 1)).unwrap();

    let mut copy = original.clone();
    copy.set("lines", vec![Embedded::new(line_doc(&line, "sku-2", 2))])
        .unwrap();
    copy.get("lines")
        .and_then(Value::as_list)
        .unwrap()
        .push(line_doc(&line, "sku-3", 3))
        .unwrap();

    assert_eq!(original.data()["lines"], json!([{ "sku": "sku-1", "quantity": 1 }]));
    assert_eq!(
        copy.data()["lines"],
        json!([
            { "sku": "sku-2", "quantity": 2 },
            { "sku": "sku-3", "quantity": 3 }
        ])
    );
}

#[test]
fn test_list_default_must_hold_declared_type() {
    let line = order_line();
    let other = Schema::embedded("Other").build();

    let wrong = EmbeddedList::new(&other);
    let schema = Schema::document("Basket")
        .field(ListField::new("lines", &line).unwrap().default(wrong))
        .build();

    assert!(Document::new(&schema).is_err());
}

// =============================================================================
// Hydration
// =============================================================================

#[test]
fn test_from_data_rebuilds_nested_values() {
    let (address, line) = (address(), order_line());
    let schema = order(&address, &line);

    let stored = data(json!({
        "number": "A-2",
        "ship_to": { "street": "1 Loop", "city": "Cupertino" },
        "lines": [{ "sku": "sku-9", "quantity": 3 }],
        "unknown": "ignored"
    }));

    let mut order = Document::from_data(&schema, &stored).unwrap();
    assert!(order.valid());

    let ship_to = order.get("ship_to").and_then(Value::as_embedded).cloned().unwrap();
    assert_eq!(ship_to.schema().name(), "Address");
    assert_eq!(ship_to.borrow().get("city"), Some(&Value::from("Cupertino")));

    let lines = order.get("lines").and_then(Value::as_list).cloned().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines.get(0).unwrap().borrow().get("quantity"), Some(&Value::Int(3)));

    let mut expected = stored.clone();
    expected.remove("unknown");
    assert_eq!(order.data(), expected);
}

#[test]
fn test_from_data_skips_list_items_that_are_not_maps() {
    let (address, line) = (address(), order_line());
    let schema = order(&address, &line);

    let stored = data(json!({
        "number": "A-4",
        "lines": [{ "sku": "sku-1", "quantity": 1 }, "sku-2", 3, null]
    }));

    let order = Document::from_data(&schema, &stored).unwrap();
    assert_eq!(
        order.data()["lines"],
        json!([{ "sku": "sku-1", "quantity": 1 }])
    );
}

#[test]
fn test_from_data_missing_keys_keep_defaults() {
    let (address, line) = (address(), order_line());
    let schema = order(&address, &line);

    let order = Document::from_data(&schema, &data(json!({ "number": "A-3" }))).unwrap();
    assert_eq!(order.get("ship_to"), Some(&Value::Null));
    assert!(order.get("lines").and_then(Value::as_list).unwrap().is_empty());
}
