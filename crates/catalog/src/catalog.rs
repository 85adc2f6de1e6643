//! Variant axes and values (the catalog of what a product may vary on).

use serde::{Deserialize, Serialize};

use varimatrix_core::{AxisId, DomainError, DomainResult, Entity, ValueId};

/// A dimension of variation (e.g. "Color").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantAxis {
    pub id: AxisId,
    /// Display name; identity is `id`.
    pub name: String,
    /// URL-friendly form of `name`. Derived from `name` when left blank.
    #[serde(default)]
    pub slug: String,
}

impl VariantAxis {
    pub fn new(id: AxisId, name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self { id, name, slug }
    }

    /// Slug to use for this axis, falling back to one derived from the name.
    pub fn slug(&self) -> String {
        if self.slug.trim().is_empty() {
            slugify(&self.name)
        } else {
            self.slug.clone()
        }
    }
}

impl Entity for VariantAxis {
    type Id = AxisId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// One concrete value of an axis (e.g. "Red" under "Color").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantValue {
    pub id: ValueId,
    pub axis_id: AxisId,
    pub label: String,
}

impl VariantValue {
    pub fn new(id: ValueId, axis_id: AxisId, label: impl Into<String>) -> Self {
        Self {
            id,
            axis_id,
            label: label.into(),
        }
    }
}

impl Entity for VariantValue {
    type Id = ValueId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Lowercase ASCII alphanumeric runs joined by `-`.
///
/// `"Shoe Size (EU)"` becomes `"shoe-size-eu"`.
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Axes and values known to the catalog, in authoring order.
///
/// Pure data: the only behavior is lookup. Construction checks that every
/// value points at a known axis and that ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogRecords", into = "CatalogRecords")]
pub struct VariantCatalog {
    axes: Vec<VariantAxis>,
    values: Vec<VariantValue>,
}

#[derive(Serialize, Deserialize)]
struct CatalogRecords {
    axes: Vec<VariantAxis>,
    values: Vec<VariantValue>,
}

impl TryFrom<CatalogRecords> for VariantCatalog {
    type Error = DomainError;

    fn try_from(records: CatalogRecords) -> Result<Self, Self::Error> {
        VariantCatalog::new(records.axes, records.values)
    }
}

impl From<VariantCatalog> for CatalogRecords {
    fn from(catalog: VariantCatalog) -> Self {
        CatalogRecords {
            axes: catalog.axes,
            values: catalog.values,
        }
    }
}

impl VariantCatalog {
    pub fn new(axes: Vec<VariantAxis>, values: Vec<VariantValue>) -> DomainResult<Self> {
        for (i, axis) in axes.iter().enumerate() {
            if axes[..i].iter().any(|a| a.id == axis.id) {
                return Err(DomainError::validation(format!(
                    "duplicate axis id {}",
                    axis.id
                )));
            }
        }

        for (i, value) in values.iter().enumerate() {
            if values[..i].iter().any(|v| v.id == value.id) {
                return Err(DomainError::validation(format!(
                    "duplicate value id {}",
                    value.id
                )));
            }
            if !axes.iter().any(|a| a.id == value.axis_id) {
                return Err(DomainError::validation(format!(
                    "value {} ({}) references unknown axis {}",
                    value.id, value.label, value.axis_id
                )));
            }
        }

        Ok(Self { axes, values })
    }

    pub fn axes(&self) -> &[VariantAxis] {
        &self.axes
    }

    pub fn values(&self) -> &[VariantValue] {
        &self.values
    }

    pub fn axis(&self, id: AxisId) -> Option<&VariantAxis> {
        self.axes.iter().find(|a| a.id == id)
    }

    pub fn value(&self, id: ValueId) -> Option<&VariantValue> {
        self.values.iter().find(|v| v.id == id)
    }

    /// Values of one axis, in authoring order.
    pub fn values_of(&self, axis_id: AxisId) -> impl Iterator<Item = &VariantValue> + '_ {
        self.values.iter().filter(move |v| v.axis_id == axis_id)
    }

    /// `true` when the axis exists and `value_id` is one of its values.
    pub fn value_belongs_to(&self, axis_id: AxisId, value_id: ValueId) -> bool {
        self.axis(axis_id).is_some()
            && self
                .value(value_id)
                .is_some_and(|value| value.axis_id == axis_id)
    }
}
