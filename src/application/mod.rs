//! Application services, view assembly and the ports they depend on.

pub mod admin;
pub mod blog;
pub mod error;
pub mod markup;
pub mod pagination;
pub mod projections;
pub mod repos;
pub mod view_factory;
