//! SKUs and the product record that owns them.

use serde::{Deserialize, Serialize};

use varimatrix_core::{AxisId, DomainError, DomainResult, Entity, ProductId, SkuId};

use crate::assignment::VariantAssignment;
use crate::catalog::VariantCatalog;
use crate::config::EngineConfig;

/// Unit price to charge: the discount price when set, else the base price.
///
/// Prices are in the smallest currency unit (e.g. cents).
pub fn effective_price(base_price: u64, discount_price: Option<u64>) -> u64 {
    discount_price.unwrap_or(base_price)
}

/// A concrete, independently priced and stocked purchasable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sku {
    pub id: SkuId,
    pub product_id: ProductId,
    pub code: String,
    pub base_price: u64,
    #[serde(default)]
    pub discount_price: Option<u64>,
    pub stock_quantity: i64,
    #[serde(default)]
    pub assignment: VariantAssignment,
}

impl Sku {
    pub fn effective_price(&self) -> u64 {
        effective_price(self.base_price, self.discount_price)
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

impl Entity for Sku {
    type Id = SkuId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Price and stock of a sellable unit, whichever record it came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub base_price: u64,
    pub discount_price: Option<u64>,
    pub unit_price: u64,
    pub available_stock: i64,
}

/// A unit whose stock fell below the low-stock threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStock {
    /// SKU code, or the product name for products without variants.
    pub code: String,
    pub stock: i64,
}

/// Catalog item. When `has_variants` is false the product itself is sold and
/// its own price/stock fields apply; otherwise its `skus` are sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub has_variants: bool,
    pub base_price: u64,
    #[serde(default)]
    pub discount_price: Option<u64>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    /// Axes every SKU must assign. Empty means "whatever the SKUs use".
    #[serde(default)]
    pub declared_axes: Vec<AxisId>,
    #[serde(default)]
    pub skus: Vec<Sku>,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Product {
    /// Product sold as itself.
    pub fn simple(id: ProductId, name: impl Into<String>, base_price: u64, stock: i64) -> Self {
        Self {
            id,
            name: name.into(),
            has_variants: false,
            base_price,
            discount_price: None,
            stock_quantity: Some(stock),
            declared_axes: Vec::new(),
            skus: Vec::new(),
        }
    }

    /// Product sold through its SKUs. `base_price` is the listing price only.
    pub fn with_variants(
        id: ProductId,
        name: impl Into<String>,
        base_price: u64,
        skus: Vec<Sku>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            has_variants: true,
            base_price,
            discount_price: None,
            stock_quantity: None,
            declared_axes: Vec::new(),
            skus,
        }
    }

    /// Fix the axes the product's SKUs are authored against.
    pub fn declaring_axes(mut self, axes: impl IntoIterator<Item = AxisId>) -> Self {
        self.declared_axes = axes.into_iter().collect();
        self
    }

    /// Purchasable only if sold as itself or through at least one SKU.
    pub fn is_configurable(&self) -> bool {
        !self.has_variants || !self.skus.is_empty()
    }

    /// Price quote from the product's own fields (products without variants).
    pub fn own_quote(&self) -> PriceQuote {
        PriceQuote {
            base_price: self.base_price,
            discount_price: self.discount_price,
            unit_price: effective_price(self.base_price, self.discount_price),
            available_stock: self.stock_quantity.unwrap_or(0),
        }
    }

    pub fn is_in_stock(&self) -> bool {
        if self.has_variants {
            self.skus.iter().any(Sku::is_in_stock)
        } else {
            self.stock_quantity.unwrap_or(0) > 0
        }
    }

    /// Total sellable units; negative SKU stock counts as zero.
    pub fn available_stock(&self) -> i64 {
        if self.has_variants {
            self.skus.iter().map(|s| s.stock_quantity.max(0)).sum()
        } else {
            self.stock_quantity.unwrap_or(0).max(0)
        }
    }

    /// Units (SKUs, or the product itself) with stock below `threshold`.
    pub fn low_stock(&self, threshold: i64) -> Vec<LowStock> {
        let low: Vec<LowStock> = if self.has_variants {
            self.skus
                .iter()
                .filter(|s| s.stock_quantity < threshold)
                .map(|s| LowStock {
                    code: s.code.clone(),
                    stock: s.stock_quantity,
                })
                .collect()
        } else {
            let stock = self.stock_quantity.unwrap_or(0);
            if stock < threshold {
                vec![LowStock {
                    code: self.name.clone(),
                    stock,
                }]
            } else {
                Vec::new()
            }
        };

        for entry in &low {
            tracing::warn!(
                product_id = %self.id,
                code = %entry.code,
                stock = entry.stock,
                threshold,
                "low stock"
            );
        }
        low
    }

    pub fn low_stock_with(&self, config: &EngineConfig) -> Vec<LowStock> {
        self.low_stock(config.low_stock_threshold)
    }

    pub fn sku(&self, id: SkuId) -> Option<&Sku> {
        self.skus.iter().find(|s| s.id == id)
    }

    /// `(axis name, value label)` pairs of a SKU, in assignment order.
    ///
    /// Fails when the SKU references an axis or value the catalog lacks.
    pub fn variant_labels(
        &self,
        sku: &Sku,
        catalog: &VariantCatalog,
    ) -> DomainResult<Vec<(String, String)>> {
        sku.assignment
            .iter()
            .map(|entry| {
                let axis = catalog
                    .axis(entry.axis_id)
                    .ok_or_else(|| DomainError::not_found(format!("axis {}", entry.axis_id)))?;
                let value = catalog
                    .value(entry.value_id)
                    .ok_or_else(|| DomainError::not_found(format!("value {}", entry.value_id)))?;
                Ok((axis.name.clone(), value.label.clone()))
            })
            .collect()
    }
}
