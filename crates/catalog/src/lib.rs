//! Variant matrix & SKU resolution engine.
//!
//! This crate contains the business rules for products sold in several
//! concrete variants (Color × Size, ...), implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage):
//!
//! - [`catalog`]: variant axes and their values.
//! - [`sku`]: SKUs and the product record that owns them.
//! - [`matrix`]: the axes/values a shopper can actually pick from.
//! - [`resolver`]: mapping a shopper selection to a SKU.
//! - [`validator`]: authoring-time checks run before a save.
//! - [`authoring`]: per-SKU toggle state used while editing.

pub mod assignment;
pub mod authoring;
pub mod catalog;
pub mod config;
pub mod matrix;
pub mod resolver;
pub mod sku;
pub mod validator;

pub use assignment::{AxisValue, Selection, VariantAssignment, set_axis_value};
pub use authoring::{AssignmentState, SkuDraft};
pub use catalog::{VariantAxis, VariantCatalog, VariantValue};
pub use config::EngineConfig;
pub use matrix::{LabelledAxis, MatrixAxis, VariantMatrix, build_matrix};
pub use resolver::{
    CheckoutLine, Offer, ResolutionError, ResolutionReason, ResolutionResult, resolve,
};
pub use sku::{LowStock, PriceQuote, Product, Sku, effective_price};
pub use validator::{
    IssueKind, Severity, ValidationIssue, ValidationReport, validate, validate_product,
};
