use equivx_core::report::Difference;
use equivx_core::{ObjectRef, TypeCatalog, TypeDescriptor, Value};

/// Catalog with the customer/order/node model used across the scenarios
#[allow(dead_code)]
pub fn sample_catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with_type(TypeDescriptor::class("Person").property("Name", "string"))
        .unwrap()
        .with_type(
            TypeDescriptor::class("Customer")
                .extends("Person")
                .property("Age", "i64")
                .property("Address", "Address"),
        )
        .unwrap()
        .with_type(
            TypeDescriptor::class("Address")
                .property("Street", "string")
                .property("City", "string"),
        )
        .unwrap()
        .with_type(TypeDescriptor::class("List<Customer>").enumerable_of("Customer"))
        .unwrap()
        .with_type(
            TypeDescriptor::class("Order")
                .property("Id", "i64")
                .property("Lines", "List<OrderLine>")
                .property("Tags", "List<string>"),
        )
        .unwrap()
        .with_type(
            TypeDescriptor::class("OrderLine")
                .property("Product", "string")
                .property("Quantity", "i64"),
        )
        .unwrap()
        .with_type(TypeDescriptor::class("List<OrderLine>").enumerable_of("OrderLine"))
        .unwrap()
        .with_type(TypeDescriptor::class("List<string>").enumerable_of("string"))
        .unwrap()
        .with_type(TypeDescriptor::class("List<i64>").enumerable_of("i64"))
        .unwrap()
        .with_type(
            TypeDescriptor::class("Node")
                .property("Name", "string")
                .property("Parent", "Node")
                .property("Children", "List<Node>"),
        )
        .unwrap()
        .with_type(TypeDescriptor::class("List<Node>").enumerable_of("Node"))
        .unwrap()
        .with_type(TypeDescriptor::class("Lookup").dictionary_of("string", "i64"))
        .unwrap()
        .with_type(
            TypeDescriptor::class("MixedBag")
                .enumerable_of("string")
                .enumerable_of("i64"),
        )
        .unwrap()
}

#[allow(dead_code)]
pub fn customer(name: &str, age: i64) -> ObjectRef {
    ObjectRef::instance("Customer")
        .with("Name", name)
        .with("Age", age)
}

#[allow(dead_code)]
pub fn customer_at(name: &str, age: i64, city: &str) -> ObjectRef {
    customer(name, age).with(
        "Address",
        ObjectRef::instance("Address")
            .with("Street", "Main Street 1")
            .with("City", city),
    )
}

#[allow(dead_code)]
pub fn customers(items: Vec<ObjectRef>) -> Value {
    ObjectRef::collection("List<Customer>", items).into()
}

#[allow(dead_code)]
pub fn ints(items: &[i64]) -> Value {
    ObjectRef::collection("List<i64>", items.iter().copied()).into()
}

#[allow(dead_code)]
pub fn order(id: i64, lines: &[(&str, i64)], tags: &[&str]) -> ObjectRef {
    let lines = ObjectRef::collection(
        "List<OrderLine>",
        lines.iter().map(|(product, quantity)| {
            ObjectRef::instance("OrderLine")
                .with("Product", *product)
                .with("Quantity", *quantity)
        }),
    );
    ObjectRef::instance("Order")
        .with("Id", id)
        .with("Lines", lines)
        .with("Tags", ObjectRef::collection("List<string>", tags.iter().copied()))
}

/// A parent node whose only child points back at it
#[allow(dead_code)]
pub fn cyclic_pair(name: &str) -> ObjectRef {
    let parent = ObjectRef::instance("Node").with("Name", name);
    let child = ObjectRef::instance("Node")
        .with("Name", format!("{}-child", name))
        .with("Parent", &parent);
    parent.set("Children", ObjectRef::collection("List<Node>", [child]));
    parent
}

#[allow(dead_code)]
pub fn messages(differences: &[Difference]) -> Vec<String> {
    differences.iter().map(|d| d.message.clone()).collect()
}
