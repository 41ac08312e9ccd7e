use serde_json::{json, Value};

pub fn article(id: &str, title: &str, author: &str) -> Value {
    json!({
        "type": "article",
        "id": id,
        "attributes": { "title": title },
        "relationships": {
            "author": { "data": { "type": "user", "id": author } }
        }
    })
}

pub fn user(id: &str, name: &str) -> Value {
    json!({ "type": "user", "id": id, "attributes": { "name": name } })
}

/// An article with an author, comments and the comments' authors included.
pub fn article_with_comments() -> Value {
    json!({
        "data": {
            "type": "article",
            "id": "1",
            "attributes": { "title": "JSON:API paints my bikeshed!" },
            "relationships": {
                "author": { "data": { "type": "people", "id": "9" } },
                "comments": {
                    "data": [
                        { "type": "comments", "id": "5" },
                        { "type": "comments", "id": "12" }
                    ],
                    "links": { "related": "/articles/1/comments" }
                }
            },
            "links": { "self": "/articles/1" }
        },
        "included": [
            {
                "type": "people",
                "id": "9",
                "attributes": { "first-name": "Dan", "last-name": "Gebhardt" }
            },
            {
                "type": "comments",
                "id": "5",
                "attributes": { "body": "First!" },
                "relationships": { "author": { "data": { "type": "people", "id": "2" } } }
            },
            {
                "type": "comments",
                "id": "12",
                "attributes": { "body": "I like XML better" },
                "relationships": { "author": { "data": { "type": "people", "id": "9" } } }
            }
        ],
        "meta": { "copyright": "Copyright 2015 Example Corp." },
        "links": { "self": "/articles/1" },
        "jsonapi": { "version": "1.0" }
    })
}
