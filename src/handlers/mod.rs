// Resource handlers - generic CRUD over one entity type

pub mod resource_handler;

pub use resource_handler::ResourceHandler;

use crate::entities::{Author, Comment, Page};

pub type AuthorHandler = ResourceHandler<Author>;
pub type PageHandler = ResourceHandler<Page>;
pub type CommentHandler = ResourceHandler<Comment>;
