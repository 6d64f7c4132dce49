mod client;
pub mod models;
pub mod properties;

pub use client::{NotionClient, NOTION_VERSION};
pub use models::{Page, QueryPage};
pub use properties::{PropertyMap, PropertyNames};
