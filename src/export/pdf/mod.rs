//! PDF reports: a pure block composer and a paginating renderer.

pub mod compose;
pub mod metrics;
pub mod render;

pub use compose::{Block, Document, compose_audit, compose_cost};
pub use render::{page_count, render};
