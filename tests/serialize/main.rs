//! Integration tests for serializing models back to documents.

use jsonapi_store::{
    Document, Model, ModelRef, Relationship, SerializeOptions, Store,
};
use serde_json::json;

fn seeded() -> Store {
    let store = Store::new();
    store
        .sync_value(json!({
            "data": {
                "type": "article",
                "id": "1",
                "attributes": {
                    "title": "Rails is Omakase",
                    "tags": ["rails", "opinion"],
                    "stats": { "views": 10 }
                },
                "relationships": {
                    "author": {
                        "data": { "type": "people", "id": "9" },
                        "links": { "self": "/articles/1/relationships/author" }
                    },
                    "comments": {
                        "data": [
                            { "type": "comments", "id": "5" },
                            { "type": "comments", "id": "12" }
                        ],
                        "meta": { "count": 2 }
                    },
                    "editor": { "data": null }
                },
                "links": { "self": "/articles/1" },
                "meta": { "revision": 4 }
            }
        }))
        .unwrap();
    store
}

#[test]
fn round_trip_through_a_second_store() {
    let store = seeded();
    let article = store.find("article", "1").unwrap().unwrap();
    let document = article.serialize(&SerializeOptions::default()).unwrap();

    let copy = Store::new();
    copy.sync(&document).unwrap();
    let restored = copy.find("article", "1").unwrap().unwrap();

    let original = article.read().unwrap();
    let restored = restored.read().unwrap();
    assert_eq!(original.attributes(), restored.attributes());
    assert_eq!(
        original.relationship_names().collect::<Vec<_>>(),
        restored.relationship_names().collect::<Vec<_>>()
    );
    for name in original.relationship_names() {
        assert_eq!(
            original.relationship(name).unwrap().keys(),
            restored.relationship(name).unwrap().keys(),
            "relationship {}",
            name
        );
    }
    assert_eq!(original.links(), restored.links());
    assert_eq!(original.meta(), restored.meta());
    assert_eq!(
        original.relationship_meta("comments"),
        restored.relationship_meta("comments")
    );
    assert!(copy.find("people", "9").unwrap().unwrap().is_placeholder().unwrap());
}

#[test]
fn round_trip_through_json_text() {
    let store = seeded();
    let article = store.find("article", "1").unwrap().unwrap();
    let text = article
        .serialize(&SerializeOptions::default())
        .unwrap()
        .to_json()
        .unwrap();

    let copy = Store::new();
    copy.sync_str(&text).unwrap();

    let restored = copy.find("article", "1").unwrap().unwrap();
    assert_eq!(
        restored.attribute("stats").unwrap(),
        Some(json!({ "views": 10 }))
    );
    assert!(restored.relationship("editor").unwrap().unwrap().is_null());
}

#[test]
fn serialize_subset_for_an_update_request() {
    let store = seeded();
    let article = store.find("article", "1").unwrap().unwrap();

    let options = SerializeOptions::new()
        .attributes(["title"])
        .relationships(["author"]);
    let value = article.serialize(&options).unwrap().to_value().unwrap();

    assert_eq!(
        value,
        json!({
            "data": {
                "type": "article",
                "id": "1",
                "attributes": { "title": "Rails is Omakase" },
                "relationships": {
                    "author": {
                        "data": { "type": "people", "id": "9" },
                        "links": { "self": "/articles/1/relationships/author" }
                    }
                },
                "links": { "self": "/articles/1" },
                "meta": { "revision": 4 }
            }
        })
    );
}

#[test]
fn new_resource_serializes_for_a_create_request() {
    let store = seeded();
    let author = store.find("people", "9").unwrap().unwrap();

    let mut draft = Model::new("comments");
    draft.set_attribute("body", json!("Nice post"));
    draft.set_relationship("author", Relationship::One(author));
    let draft = ModelRef::new(draft);

    let value = draft
        .serialize(&SerializeOptions::default())
        .unwrap()
        .to_value()
        .unwrap();
    assert_eq!(
        value,
        json!({
            "data": {
                "type": "comments",
                "attributes": { "body": "Nice post" },
                "relationships": {
                    "author": { "data": { "type": "people", "id": "9" } }
                }
            }
        })
    );
}

#[test]
fn cyclic_graph_serializes_shallowly() {
    let store = Store::new();
    store
        .sync_value(json!({
            "data": {
                "type": "node", "id": "1",
                "relationships": { "self": { "data": { "type": "node", "id": "1" } } }
            }
        }))
        .unwrap();
    let node = store.find("node", "1").unwrap().unwrap();

    let document: Document = node.serialize(&SerializeOptions::default()).unwrap();
    assert_eq!(
        document.to_value().unwrap(),
        json!({
            "data": {
                "type": "node",
                "id": "1",
                "relationships": { "self": { "data": { "type": "node", "id": "1" } } }
            }
        })
    );
}
