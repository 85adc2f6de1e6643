//! Selection resolution: mapping a shopper selection to zero or one SKU.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use varimatrix_core::{DomainError, SkuId};

use crate::assignment::VariantAssignment;
use crate::matrix::build_matrix;
use crate::sku::{PriceQuote, Product, Sku};

/// Why a resolution is not (yet) purchasable. Shopper guidance, not an error.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionReason {
    /// Some matrix axis has no value picked yet.
    Incomplete,
    /// Every matrix axis picked, but no SKU carries that combination.
    UnavailableCombination,
    /// Matched a SKU with no stock; price can be shown, purchase is blocked.
    OutOfStock,
}

impl ResolutionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionReason::Incomplete => "incomplete",
            ResolutionReason::UnavailableCombination => "unavailable-combination",
            ResolutionReason::OutOfStock => "out-of-stock",
        }
    }
}

/// Outcome of resolving a selection against a product's SKUs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult<'a> {
    pub matched: Option<&'a Sku>,
    pub reason: Option<ResolutionReason>,
    /// Selection covers every axis of the matrix.
    pub is_complete: bool,
}

/// What checkout needs to add a line item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub sku_id: SkuId,
    pub unit_price: u64,
    pub available_stock: i64,
}

impl ResolutionResult<'_> {
    /// Matched SKU with stock.
    pub fn is_purchasable(&self) -> bool {
        self.matched.is_some() && self.reason.is_none()
    }

    pub fn checkout_line(&self) -> Option<CheckoutLine> {
        if !self.is_purchasable() {
            return None;
        }
        self.matched.map(|sku| CheckoutLine {
            sku_id: sku.id,
            unit_price: sku.effective_price(),
            available_stock: sku.stock_quantity,
        })
    }
}

/// Persisted SKU data that makes resolution impossible to answer safely.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// Several SKUs carry the selected combination; picking one could sell
    /// the wrong item.
    #[error("selection matches {} SKUs: {}", .sku_ids.len(), join_ids(.sku_ids))]
    AmbiguousMatch { sku_ids: Vec<SkuId> },
}

fn join_ids(ids: &[SkuId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

impl From<ResolutionError> for DomainError {
    fn from(err: ResolutionError) -> Self {
        DomainError::invariant(err.to_string())
    }
}

/// A SKU matches when its whole assignment appears in the selection and both
/// cover the same number of axes.
fn sku_matches(sku: &Sku, selection: &VariantAssignment) -> bool {
    sku.assignment.len() == selection.len() && sku.assignment.is_subset_of(selection)
}

/// Resolve `selection` against `skus`.
///
/// Completeness is measured against the matrix built from the same SKUs, so it
/// is defined before anything matches: every matrix axis picked and nothing
/// else. A selection that picks every matrix axis plus axes the product does
/// not vary on is unavailable rather than incomplete. The result does not
/// depend on the order of `skus`.
pub fn resolve<'a>(
    selection: &VariantAssignment,
    skus: &'a [Sku],
) -> Result<ResolutionResult<'a>, ResolutionError> {
    let matrix = build_matrix(skus);
    let covers_matrix = matrix
        .axes()
        .iter()
        .all(|axis| selection.get(axis.axis_id).is_some());
    let is_complete = covers_matrix && selection.len() == matrix.axis_count();

    let found: Vec<&Sku> = skus.iter().filter(|sku| sku_matches(sku, selection)).collect();

    let result = match found.as_slice() {
        [] => ResolutionResult {
            matched: None,
            reason: Some(if covers_matrix {
                ResolutionReason::UnavailableCombination
            } else {
                ResolutionReason::Incomplete
            }),
            is_complete,
        },
        [sku] => ResolutionResult {
            matched: Some(*sku),
            reason: (sku.stock_quantity <= 0).then_some(ResolutionReason::OutOfStock),
            is_complete,
        },
        many => {
            let sku_ids: Vec<SkuId> = many.iter().map(|s| s.id).collect();
            tracing::error!(
                selected_axes = selection.len(),
                skus = %join_ids(&sku_ids),
                "duplicate SKU combination found at resolve time"
            );
            return Err(ResolutionError::AmbiguousMatch { sku_ids });
        }
    };

    tracing::debug!(
        selected_axes = selection.len(),
        matrix_axes = matrix.axis_count(),
        matched = ?result.matched.map(|s| s.id),
        reason = result.reason.map(|r| r.as_str()),
        "resolved selection"
    );
    Ok(result)
}

/// What a product page can sell for the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Offer<'a> {
    /// Product without variants: priced and stocked from its own fields.
    Simple(PriceQuote),
    /// Product sold through SKUs.
    Variant(ResolutionResult<'a>),
}

impl Product {
    /// Offer for `selection`. Products without variants never touch the
    /// matrix or resolver, whatever the selection holds.
    pub fn offer(&self, selection: &VariantAssignment) -> Result<Offer<'_>, ResolutionError> {
        if !self.has_variants {
            return Ok(Offer::Simple(self.own_quote()));
        }
        resolve(selection, &self.skus).map(Offer::Variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use varimatrix_core::{AxisId, ProductId, ValueId};

    const COLOR: AxisId = AxisId::from_u128(1);
    const SIZE: AxisId = AxisId::from_u128(2);
    const RED: ValueId = ValueId::from_u128(11);
    const BLUE: ValueId = ValueId::from_u128(12);
    const S: ValueId = ValueId::from_u128(21);
    const M: ValueId = ValueId::from_u128(22);

    fn sku(n: u128, pairs: &[(AxisId, ValueId)], stock: i64) -> Sku {
        Sku {
            id: SkuId::from_u128(n),
            product_id: ProductId::from_u128(1),
            code: format!("SKU-{n}"),
            base_price: 2_500,
            discount_price: None,
            stock_quantity: stock,
            assignment: VariantAssignment::from_pairs(pairs.iter().copied()),
        }
    }

    fn pick(pairs: &[(AxisId, ValueId)]) -> VariantAssignment {
        VariantAssignment::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn partial_selection_is_incomplete() {
        let skus = vec![sku(1, &[(COLOR, RED), (SIZE, S)], 5)];
        let result = resolve(&pick(&[(COLOR, RED)]), &skus).unwrap();
        assert_eq!(result.matched, None);
        assert_eq!(result.reason, Some(ResolutionReason::Incomplete));
        assert!(!result.is_complete);
    }

    #[test]
    fn complete_selection_without_sku_is_unavailable() {
        let skus = vec![
            sku(1, &[(COLOR, RED), (SIZE, S)], 5),
            sku(2, &[(COLOR, BLUE), (SIZE, M)], 5),
        ];
        let result = resolve(&pick(&[(COLOR, RED), (SIZE, M)]), &skus).unwrap();
        assert_eq!(result.matched, None);
        assert_eq!(result.reason, Some(ResolutionReason::UnavailableCombination));
        assert!(result.is_complete);
    }

    #[test]
    fn stocked_match_is_purchasable() {
        let skus = vec![sku(1, &[(COLOR, RED), (SIZE, S)], 5)];
        let result = resolve(&pick(&[(SIZE, S), (COLOR, RED)]), &skus).unwrap();
        assert_eq!(result.matched.map(|s| s.id), Some(SkuId::from_u128(1)));
        assert_eq!(result.reason, None);
        assert!(result.is_purchasable());
    }

    #[test]
    fn unstocked_match_still_returns_sku() {
        let skus = vec![sku(1, &[(COLOR, RED), (SIZE, M)], 0)];
        let result = resolve(&pick(&[(COLOR, RED), (SIZE, M)]), &skus).unwrap();
        assert_eq!(result.matched.map(|s| s.base_price), Some(2_500));
        assert_eq!(result.reason, Some(ResolutionReason::OutOfStock));
        assert!(result.checkout_line().is_none());
    }

    #[test]
    fn duplicate_combination_is_a_hard_error() {
        let skus = vec![
            sku(1, &[(COLOR, RED), (SIZE, S)], 5),
            sku(2, &[(SIZE, S), (COLOR, RED)], 3),
        ];
        let err = resolve(&pick(&[(COLOR, RED), (SIZE, S)]), &skus).unwrap_err();
        assert_eq!(
            err,
            ResolutionError::AmbiguousMatch {
                sku_ids: vec![SkuId::from_u128(1), SkuId::from_u128(2)]
            }
        );

        let domain: DomainError = err.into();
        assert!(matches!(domain, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn foreign_axis_does_not_stand_in_for_a_missing_one() {
        let skus = vec![sku(1, &[(COLOR, RED), (SIZE, S)], 5)];
        let material = AxisId::from_u128(9);
        let selection = pick(&[(COLOR, RED), (material, ValueId::from_u128(99))]);

        let result = resolve(&selection, &skus).unwrap();
        assert!(!result.is_complete);
        assert_eq!(result.reason, Some(ResolutionReason::Incomplete));
    }

    #[test]
    fn surplus_axis_is_unavailable_not_incomplete() {
        let skus = vec![sku(1, &[(COLOR, RED), (SIZE, S)], 5)];
        let material = AxisId::from_u128(9);
        let selection = pick(&[(COLOR, RED), (SIZE, S), (material, ValueId::from_u128(99))]);

        let result = resolve(&selection, &skus).unwrap();
        assert!(result.matched.is_none());
        assert!(!result.is_complete);
        assert_eq!(result.reason, Some(ResolutionReason::UnavailableCombination));
    }

    #[test]
    fn extra_axes_in_selection_do_not_match() {
        let skus = vec![sku(1, &[(COLOR, RED)], 5)];
        let result = resolve(&pick(&[(COLOR, RED), (SIZE, S)]), &skus).unwrap();
        assert_eq!(result.matched, None);
    }

    #[test]
    fn empty_sku_set_never_resolves() {
        let result = resolve(&VariantAssignment::new(), &[]).unwrap();
        assert_eq!(result.matched, None);
        assert!(result.is_complete);
        assert_eq!(result.reason, Some(ResolutionReason::UnavailableCombination));
    }

    #[test]
    fn checkout_line_uses_discount_price() {
        let mut discounted = sku(1, &[(COLOR, RED)], 4);
        discounted.discount_price = Some(1_999);
        let skus = vec![discounted];

        let line = resolve(&pick(&[(COLOR, RED)]), &skus)
            .unwrap()
            .checkout_line()
            .unwrap();
        assert_eq!(
            line,
            CheckoutLine {
                sku_id: SkuId::from_u128(1),
                unit_price: 1_999,
                available_stock: 4,
            }
        );
    }

    #[test]
    fn simple_product_offer_ignores_selection() {
        let product = Product::simple(ProductId::from_u128(1), "Mug", 1_200, 7);
        let offer = product.offer(&pick(&[(COLOR, RED)])).unwrap();
        match offer {
            Offer::Simple(quote) => {
                assert_eq!(quote.unit_price, 1_200);
                assert_eq!(quote.available_stock, 7);
            }
            other => panic!("expected simple offer, got {other:?}"),
        }
    }

    #[test]
    fn reason_serializes_kebab_case() {
        let json = serde_json::to_string(&ResolutionReason::UnavailableCombination).unwrap();
        assert_eq!(json, "\"unavailable-combination\"");
        assert_eq!(ResolutionReason::OutOfStock.as_str(), "out-of-stock");
    }

    /// Full 3x3 grid over two axes; each cell's stock is derived from its index.
    fn grid() -> Vec<Sku> {
        let mut skus = Vec::new();
        for c in 0..3u128 {
            for s in 0..3u128 {
                let n = c * 3 + s;
                skus.push(sku(
                    n,
                    &[(COLOR, ValueId::from_u128(10 + c)), (SIZE, ValueId::from_u128(20 + s))],
                    (n % 3) as i64,
                ));
            }
        }
        skus
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: resolution does not depend on the order SKUs are scanned.
        #[test]
        fn resolution_is_order_independent(
            keep in prop::collection::vec(any::<bool>(), 9),
            order in Just((0..9usize).collect::<Vec<_>>()).prop_shuffle(),
            color in prop::option::of(10u128..13),
            size in prop::option::of(20u128..23),
        ) {
            let skus: Vec<Sku> = grid()
                .into_iter()
                .zip(keep)
                .filter_map(|(s, k)| k.then_some(s))
                .collect();
            let reordered: Vec<Sku> = order.iter().filter_map(|i| skus.get(*i).cloned()).collect();

            let mut selection = VariantAssignment::new();
            if let Some(c) = color {
                selection = selection.with_value(COLOR, ValueId::from_u128(c));
            }
            if let Some(s) = size {
                selection = selection.with_value(SIZE, ValueId::from_u128(s));
            }

            let a = resolve(&selection, &skus).unwrap();
            let b = resolve(&selection, &reordered).unwrap();
            prop_assert_eq!(a.matched.map(|s| s.id), b.matched.map(|s| s.id));
            prop_assert_eq!(a.reason, b.reason);
            prop_assert_eq!(a.is_complete, b.is_complete);
        }

        /// Property: fewer picked axes than a SKU defines never resolve to it.
        #[test]
        fn partial_selection_never_matches(
            cell in 0usize..9,
            drop_color in any::<bool>(),
        ) {
            let skus = grid();
            let target = &skus[cell];
            let axis = if drop_color { COLOR } else { SIZE };
            let partial = target.assignment.without_axis(axis);

            let result = resolve(&partial, &skus).unwrap();
            prop_assert!(result.matched.is_none());
            prop_assert_eq!(result.reason, Some(ResolutionReason::Incomplete));
        }
    }
}
