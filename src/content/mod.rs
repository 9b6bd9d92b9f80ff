//! Blog content: typed records, a read-side catalog, and an in-memory
//! store enforcing the backing database's integrity rules.

mod catalog;
mod store;
mod types;

pub use catalog::{BlogCatalog, PostView};
pub use store::ContentStore;
pub use types::{
    Author, Category, InvitationCode, Post, PostStatus, Role, estimate_read_time, slugify,
};
