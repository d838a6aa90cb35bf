pub mod post;

pub use post::{CollectionDocument, Post, PostCatalog, Resource, ResourceDocument, POST_TYPE};
