//! SeaORM entities backing the domain model.

pub mod category;
pub mod post;
