//! `varimatrix-core` — shared building blocks for the variant engine.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the domain error model and a couple of marker traits.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AxisId, ProductId, SkuId, ValueId};
pub use value_object::ValueObject;
