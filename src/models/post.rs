use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

pub const POST_TYPE: &str = "posts";

/// A blog post served by the demo resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub body: String,
}

/// JSON API resource object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Resource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    pub attributes: serde_json::Value,
}

/// JSON API top-level document holding a single resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResourceDocument {
    pub data: Resource,
}

/// JSON API top-level document holding a resource collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CollectionDocument {
    pub data: Vec<Resource>,
}

impl Post {
    pub fn to_resource(&self) -> Resource {
        Resource {
            resource_type: POST_TYPE.to_string(),
            id: self.id.clone(),
            attributes: serde_json::json!({
                "title": self.title,
                "body": self.body,
            }),
        }
    }
}

/// Read-only post catalogue, seeded at startup
#[derive(Debug, Clone, Default)]
pub struct PostCatalog {
    posts: BTreeMap<String, Post>,
}

impl PostCatalog {
    pub fn new(posts: impl IntoIterator<Item = Post>) -> Self {
        Self {
            posts: posts.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn seeded() -> Self {
        Self::new([
            Post {
                id: "1".to_string(),
                title: "Hello World".to_string(),
                body: "The first post.".to_string(),
            },
            Post {
                id: "2".to_string(),
                title: "Error Documents".to_string(),
                body: "Every failure is rendered as a JSON API error document.".to_string(),
            },
        ])
    }

    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.get(id)
    }

    /// Posts ordered by id
    pub fn list(&self) -> Vec<&Post> {
        self.posts.values().collect()
    }
}
