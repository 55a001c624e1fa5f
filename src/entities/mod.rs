// Blog entities - plain data structs stored as JSON documents

pub mod ent_author;
pub mod ent_comment;
pub mod ent_page;
pub mod ent_product;

pub use crate::ent_framework::Entity;

pub use ent_author::Author;
pub use ent_comment::Comment;
pub use ent_page::Page;
pub use ent_product::Product;
