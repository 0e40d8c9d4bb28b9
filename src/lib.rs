//! Lectern: a mountable blogging engine.
//!
//! Posts, tags and author profiles stored in Postgres and rendered through
//! askama templates. The [`infra::http::build_router`] router can run on its
//! own via the `lectern` binary or be merged into a host application that
//! supplies authentication.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
