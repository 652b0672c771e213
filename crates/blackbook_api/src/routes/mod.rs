//! Route handlers, one module per resource family.
//!
//! Path parameters share names per position (`:universe_id`, `:id`,
//! `:image_id`) so nested and shallow routes can coexist in one router.

pub mod images;
pub mod named;
pub mod relationships;
pub mod universes;
pub mod users;
