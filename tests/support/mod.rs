#![allow(dead_code)]

use std::any::Any;

use jsonapi_view::{
    Entity, Related, Relationship, Schema, SchemaRegistry,
    application::schema::downcast,
};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone)]
pub struct Person {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: u32,
    pub body: String,
    pub author: Option<Person>,
}

#[derive(Debug, Clone)]
pub struct Article {
    pub id: u32,
    pub title: String,
    pub body: String,
    pub author: Option<Person>,
    pub comments: Vec<Comment>,
}

impl Entity for Person {
    fn entity_name(&self) -> &str {
        "Person"
    }

    fn id(&self) -> String {
        self.id.to_string()
    }

    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".into(), Value::from(self.name.as_str()));
        fields
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Entity for Comment {
    fn entity_name(&self) -> &str {
        "Comment"
    }

    fn id(&self) -> String {
        self.id.to_string()
    }

    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("body".into(), Value::from(self.body.as_str()));
        fields
    }

    fn associations(&self) -> Vec<(&str, Related<'_>)> {
        vec![("author", Related::one(self.author.as_ref()))]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Entity for Article {
    fn entity_name(&self) -> &str {
        "Article"
    }

    fn id(&self) -> String {
        self.id.to_string()
    }

    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("title".into(), Value::from(self.title.as_str()));
        fields.insert("body".into(), Value::from(self.body.as_str()));
        fields
    }

    fn associations(&self) -> Vec<(&str, Related<'_>)> {
        vec![
            ("author", Related::one(self.author.as_ref())),
            ("comments", Related::many(&self.comments)),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Typed schema for articles; includes the author unless told otherwise.
pub struct ArticleSchema;

impl Schema for ArticleSchema {
    fn resource_type(&self) -> &str {
        "articles"
    }

    fn attributes(&self, entity: &dyn Entity) -> Map<String, Value> {
        let Some(article) = downcast::<Article>(entity) else {
            return entity.fields();
        };
        let mut attributes = Map::new();
        attributes.insert("title".into(), json!(article.title));
        attributes.insert("body".into(), json!(article.body));
        attributes
    }

    fn relationships<'a>(&self, entity: &'a dyn Entity) -> Vec<(String, Relationship<'a>)> {
        let Some(article) = downcast::<Article>(entity) else {
            return Vec::new();
        };
        vec![
            (
                "author".to_string(),
                Relationship::new(Related::one(article.author.as_ref())),
            ),
            (
                "comments".to_string(),
                Relationship::new(Related::many(&article.comments)),
            ),
        ]
    }

    fn include_paths(&self) -> Vec<String> {
        vec!["author".to_string()]
    }
}

pub fn registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.register("Article", |_| Box::new(ArticleSchema));
    registry.declare("Person").declare("Comment");
    registry
}

pub fn ada() -> Person {
    Person {
        id: 9,
        name: "Ada".to_string(),
    }
}

pub fn grace() -> Person {
    Person {
        id: 10,
        name: "Grace".to_string(),
    }
}

pub fn article(id: u32) -> Article {
    Article {
        id,
        title: "JSON:API".to_string(),
        body: "Hello".to_string(),
        author: Some(ada()),
        comments: vec![
            Comment {
                id: 1,
                body: "First".to_string(),
                author: Some(ada()),
            },
            Comment {
                id: 2,
                body: "Second".to_string(),
                author: Some(grace()),
            },
        ],
    }
}

pub fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}
