//! Per-SKU editing state on the administration side.

use serde::{Deserialize, Serialize};

use varimatrix_core::{AxisId, ProductId, SkuId, ValueId};

use crate::assignment::VariantAssignment;
use crate::sku::Sku;

/// How much of the declared axes a draft has values for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentState {
    Empty,
    PartiallyAssigned,
    FullyAssigned,
}

/// A SKU being edited: fields plus an assignment built one toggle at a time.
///
/// `declared_axes` are the axes the admin marked relevant for the product.
/// Nothing is persisted; a finished draft is turned into a [`Sku`] and run
/// through the validator before saving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuDraft {
    pub declared_axes: Vec<AxisId>,
    pub code: String,
    pub base_price: u64,
    pub discount_price: Option<u64>,
    pub stock_quantity: i64,
    assignment: VariantAssignment,
}

impl SkuDraft {
    pub fn new(declared_axes: Vec<AxisId>) -> Self {
        Self {
            declared_axes,
            code: String::new(),
            base_price: 0,
            discount_price: None,
            stock_quantity: 0,
            assignment: VariantAssignment::new(),
        }
    }

    /// Draft pre-filled from an existing SKU (editing rather than creating).
    pub fn from_sku(sku: &Sku, declared_axes: Vec<AxisId>) -> Self {
        Self {
            declared_axes,
            code: sku.code.clone(),
            base_price: sku.base_price,
            discount_price: sku.discount_price,
            stock_quantity: sku.stock_quantity,
            assignment: sku.assignment.clone(),
        }
    }

    pub fn assignment(&self) -> &VariantAssignment {
        &self.assignment
    }

    /// Select `value_id` for `axis_id`; selecting the current value again
    /// clears the axis instead.
    pub fn toggle(&mut self, axis_id: AxisId, value_id: ValueId) -> AssignmentState {
        self.assignment = if self.assignment.contains(axis_id, value_id) {
            self.assignment.without_axis(axis_id)
        } else {
            self.assignment.with_value(axis_id, value_id)
        };
        self.state()
    }

    pub fn state(&self) -> AssignmentState {
        let assigned = self
            .declared_axes
            .iter()
            .filter(|axis| self.assignment.get(**axis).is_some())
            .count();

        if assigned == 0 {
            AssignmentState::Empty
        } else if assigned == self.declared_axes.len() {
            AssignmentState::FullyAssigned
        } else {
            AssignmentState::PartiallyAssigned
        }
    }

    /// Declared axes still lacking a value, in declaration order.
    pub fn missing_axes(&self) -> Vec<AxisId> {
        self.declared_axes
            .iter()
            .copied()
            .filter(|axis| self.assignment.get(*axis).is_none())
            .collect()
    }

    pub fn into_sku(self, id: SkuId, product_id: ProductId) -> Sku {
        Sku {
            id,
            product_id,
            code: self.code,
            base_price: self.base_price,
            discount_price: self.discount_price,
            stock_quantity: self.stock_quantity,
            assignment: self.assignment,
        }
    }
}
