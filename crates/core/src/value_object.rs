//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are immutable: to "modify" one, build a
/// new one. In this workspace the variant assignment (and therefore every
/// shopper selection) is a value object, which is what lets resolution stay a
/// pure function of its inputs.
///
/// ```ignore
/// let a = VariantAssignment::new().with_value(color, red);
/// let b = a.with_value(size, small);
/// assert_ne!(a, b); // `a` is untouched
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
