//! Domain model: posts, their metadata header, and the invariants a post
//! must satisfy before it is published.

pub mod front_matter;
pub mod markup;
pub mod post;
pub mod slug;
pub mod types;
pub mod validate;
