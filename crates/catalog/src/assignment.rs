//! Variant assignments and shopper selections.

use serde::{Deserialize, Serialize};

use varimatrix_core::{AxisId, DomainError, ProductId, ValueId, ValueObject};

/// One `(axis, value)` entry of an assignment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AxisValue {
    pub axis_id: AxisId,
    pub value_id: ValueId,
}

impl AxisValue {
    pub fn new(axis_id: AxisId, value_id: ValueId) -> Self {
        Self { axis_id, value_id }
    }
}

/// Mapping from axis to exactly one value of that axis.
///
/// Entries keep the order in which axes were first assigned; re-assigning an
/// axis replaces its value in place. Equality ignores order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<AxisValue>", into = "Vec<AxisValue>")]
pub struct VariantAssignment {
    entries: Vec<AxisValue>,
}

impl ValueObject for VariantAssignment {}

impl VariantAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pairs; a later pair for the same axis wins.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (AxisId, ValueId)>) -> Self {
        pairs
            .into_iter()
            .fold(Self::new(), |acc, (axis, value)| acc.with_value(axis, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, axis_id: AxisId) -> Option<ValueId> {
        self.entries
            .iter()
            .find(|e| e.axis_id == axis_id)
            .map(|e| e.value_id)
    }

    pub fn contains(&self, axis_id: AxisId, value_id: ValueId) -> bool {
        self.get(axis_id) == Some(value_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = AxisValue> + '_ {
        self.entries.iter().copied()
    }

    pub fn axis_ids(&self) -> impl Iterator<Item = AxisId> + '_ {
        self.entries.iter().map(|e| e.axis_id)
    }

    /// New assignment with `axis_id` set to `value_id`, replacing any prior value.
    pub fn with_value(&self, axis_id: AxisId, value_id: ValueId) -> Self {
        let mut next = self.clone();
        next.set(axis_id, value_id);
        next
    }

    /// New assignment with `axis_id` removed.
    pub fn without_axis(&self, axis_id: AxisId) -> Self {
        let mut next = self.clone();
        next.entries.retain(|e| e.axis_id != axis_id);
        next
    }

    /// Entries sorted by axis; two assignments are equal iff their keys are.
    pub fn canonical_key(&self) -> Vec<AxisValue> {
        let mut key = self.entries.clone();
        key.sort();
        key
    }

    /// `true` when every entry of `self` is present and equal in `other`.
    pub fn is_subset_of(&self, other: &VariantAssignment) -> bool {
        self.entries
            .iter()
            .all(|e| other.contains(e.axis_id, e.value_id))
    }

    /// `true` when both assignments cover the same axes (values may differ).
    pub fn covers_same_axes(&self, other: &VariantAssignment) -> bool {
        self.len() == other.len() && self.axis_ids().all(|axis| other.get(axis).is_some())
    }

    fn set(&mut self, axis_id: AxisId, value_id: ValueId) {
        match self.entries.iter_mut().find(|e| e.axis_id == axis_id) {
            Some(entry) => entry.value_id = value_id,
            None => self.entries.push(AxisValue::new(axis_id, value_id)),
        }
    }
}

impl PartialEq for VariantAssignment {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.is_subset_of(other)
    }
}

impl Eq for VariantAssignment {}

impl TryFrom<Vec<AxisValue>> for VariantAssignment {
    type Error = DomainError;

    fn try_from(entries: Vec<AxisValue>) -> Result<Self, Self::Error> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.axis_id == entry.axis_id) {
                return Err(DomainError::validation(format!(
                    "axis {} assigned more than one value",
                    entry.axis_id
                )));
            }
        }
        Ok(Self { entries })
    }
}

impl From<VariantAssignment> for Vec<AxisValue> {
    fn from(assignment: VariantAssignment) -> Self {
        assignment.entries
    }
}

/// Set one axis of a selection; pure, no validation against SKUs.
pub fn set_axis_value(
    selection: &VariantAssignment,
    axis_id: AxisId,
    value_id: ValueId,
) -> VariantAssignment {
    selection.with_value(axis_id, value_id)
}

/// A shopper's in-progress pick on one product page.
///
/// Created empty when the page opens, grown one axis at a time, and cleared
/// when the shopper moves to another product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    product_id: ProductId,
    assignment: VariantAssignment,
}

impl Selection {
    pub fn open(product_id: ProductId) -> Self {
        Self {
            product_id,
            assignment: VariantAssignment::new(),
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn assignment(&self) -> &VariantAssignment {
        &self.assignment
    }

    pub fn set_axis_value(&self, axis_id: AxisId, value_id: ValueId) -> Self {
        Self {
            product_id: self.product_id,
            assignment: set_axis_value(&self.assignment, axis_id, value_id),
        }
    }

    /// Selection to use after navigating to `product_id`.
    pub fn navigate_to(&self, product_id: ProductId) -> Self {
        if product_id == self.product_id {
            self.clone()
        } else {
            Self::open(product_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn axis(n: u128) -> AxisId {
        AxisId::from_u128(n)
    }

    fn value(n: u128) -> ValueId {
        ValueId::from_u128(n)
    }

    #[test]
    fn with_value_replaces_in_place() {
        let a = VariantAssignment::new()
            .with_value(axis(1), value(11))
            .with_value(axis(2), value(21))
            .with_value(axis(1), value(12));

        let axes: Vec<_> = a.axis_ids().collect();
        assert_eq!(axes, vec![axis(1), axis(2)]);
        assert_eq!(a.get(axis(1)), Some(value(12)));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn with_value_leaves_original_untouched() {
        let a = VariantAssignment::new().with_value(axis(1), value(11));
        let _b = a.with_value(axis(2), value(21));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn equality_ignores_entry_order() {
        let a = VariantAssignment::from_pairs([(axis(1), value(11)), (axis(2), value(21))]);
        let b = VariantAssignment::from_pairs([(axis(2), value(21)), (axis(1), value(11))]);
        assert_eq!(a, b);
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn subset_is_not_equality() {
        let small = VariantAssignment::from_pairs([(axis(1), value(11))]);
        let big = VariantAssignment::from_pairs([(axis(1), value(11)), (axis(2), value(21))]);
        assert!(small.is_subset_of(&big));
        assert!(!big.is_subset_of(&small));
        assert_ne!(small, big);
    }

    #[test]
    fn covers_same_axes_ignores_values() {
        let a = VariantAssignment::from_pairs([(axis(1), value(11)), (axis(2), value(21))]);
        let b = VariantAssignment::from_pairs([(axis(2), value(22)), (axis(1), value(12))]);
        let c = VariantAssignment::from_pairs([(axis(1), value(11))]);
        assert!(a.covers_same_axes(&b));
        assert!(!a.covers_same_axes(&c));
    }

    #[test]
    fn deserialize_rejects_axis_assigned_twice() {
        let json = format!(
            r#"[{{"axis_id":"{a}","value_id":"{v1}"}},{{"axis_id":"{a}","value_id":"{v2}"}}]"#,
            a = axis(1),
            v1 = value(11),
            v2 = value(12),
        );
        assert!(serde_json::from_str::<VariantAssignment>(&json).is_err());
    }

    #[test]
    fn selection_navigation_clears_only_on_product_change() {
        let p1 = ProductId::from_u128(1);
        let p2 = ProductId::from_u128(2);
        let sel = Selection::open(p1).set_axis_value(axis(1), value(11));

        assert_eq!(sel.navigate_to(p1).assignment().len(), 1);

        let moved = sel.navigate_to(p2);
        assert_eq!(moved.product_id(), p2);
        assert!(moved.assignment().is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a second update of the same axis fully overwrites the first.
        #[test]
        fn set_axis_value_is_last_write_wins(
            seed in prop::collection::vec((0u128..4, 0u128..6), 0..6),
            target in 0u128..4,
            v1 in 0u128..6,
            v2 in 0u128..6,
        ) {
            let sel = VariantAssignment::from_pairs(
                seed.into_iter().map(|(a, v)| (axis(a), value(v))),
            );
            let first = set_axis_value(&sel, axis(target), value(v1));
            let twice = set_axis_value(&first, axis(target), value(v2));
            let once = set_axis_value(&sel, axis(target), value(v2));
            prop_assert_eq!(twice, once);
        }

        /// Property: an assignment never holds two entries for one axis.
        #[test]
        fn at_most_one_value_per_axis(
            pairs in prop::collection::vec((0u128..4, 0u128..6), 0..12),
        ) {
            let a = VariantAssignment::from_pairs(
                pairs.iter().map(|(a, v)| (axis(*a), value(*v))),
            );
            let mut axes: Vec<_> = a.axis_ids().collect();
            let total = axes.len();
            axes.sort();
            axes.dedup();
            prop_assert_eq!(axes.len(), total);
        }
    }
}
