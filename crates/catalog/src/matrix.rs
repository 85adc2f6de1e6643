//! Variant matrix: the axes and values a shopper can actually choose from.

use serde::{Deserialize, Serialize};

use varimatrix_core::{AxisId, DomainError, DomainResult, ValueId};

use crate::catalog::{VariantAxis, VariantCatalog, VariantValue};
use crate::sku::{Product, Sku};

/// One axis of the matrix and the values in use for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixAxis {
    pub axis_id: AxisId,
    pub values: Vec<ValueId>,
}

/// Axes/values referenced by at least one SKU of a product, first-seen order.
///
/// Derived, never persisted. An empty matrix means "cannot be configured",
/// which is distinct from a product without variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantMatrix {
    axes: Vec<MatrixAxis>,
}

/// Matrix axis rendered with catalog records, ready for a selection UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelledAxis<'a> {
    pub axis: &'a VariantAxis,
    pub values: Vec<&'a VariantValue>,
}

/// Union of every SKU's `(axis, value)` pairs, de-duplicated, first-seen order.
pub fn build_matrix(skus: &[Sku]) -> VariantMatrix {
    let mut axes: Vec<MatrixAxis> = Vec::new();

    for sku in skus {
        for entry in sku.assignment.iter() {
            match axes.iter_mut().find(|a| a.axis_id == entry.axis_id) {
                Some(axis) => {
                    if !axis.values.contains(&entry.value_id) {
                        axis.values.push(entry.value_id);
                    }
                }
                None => axes.push(MatrixAxis {
                    axis_id: entry.axis_id,
                    values: vec![entry.value_id],
                }),
            }
        }
    }

    tracing::debug!(skus = skus.len(), axes = axes.len(), "built variant matrix");
    VariantMatrix { axes }
}

impl VariantMatrix {
    pub fn axes(&self) -> &[MatrixAxis] {
        &self.axes
    }

    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn values(&self, axis_id: AxisId) -> Option<&[ValueId]> {
        self.axes
            .iter()
            .find(|a| a.axis_id == axis_id)
            .map(|a| a.values.as_slice())
    }

    pub fn contains(&self, axis_id: AxisId, value_id: ValueId) -> bool {
        self.values(axis_id)
            .is_some_and(|values| values.contains(&value_id))
    }

    /// Resolve ids against the catalog.
    ///
    /// A SKU referencing an axis or value the catalog does not know is a wiring
    /// fault (the catalog handed over is not the one the SKUs were authored
    /// against) and is reported as an invariant violation.
    pub fn labelled<'a>(&self, catalog: &'a VariantCatalog) -> DomainResult<Vec<LabelledAxis<'a>>> {
        self.axes
            .iter()
            .map(|entry| {
                let axis = catalog.axis(entry.axis_id).ok_or_else(|| {
                    DomainError::invariant(format!(
                        "matrix axis {} missing from catalog",
                        entry.axis_id
                    ))
                })?;
                let values = entry
                    .values
                    .iter()
                    .map(|id| {
                        catalog
                            .value(*id)
                            .filter(|v| v.axis_id == entry.axis_id)
                            .ok_or_else(|| {
                                DomainError::invariant(format!(
                                    "matrix value {id} missing from axis {}",
                                    entry.axis_id
                                ))
                            })
                    })
                    .collect::<DomainResult<Vec<_>>>()?;
                Ok(LabelledAxis { axis, values })
            })
            .collect()
    }
}

impl Product {
    /// Matrix for products sold through SKUs; `None` when the product is
    /// sold as itself.
    pub fn variant_matrix(&self) -> Option<VariantMatrix> {
        self.has_variants.then(|| build_matrix(&self.skus))
    }
}
