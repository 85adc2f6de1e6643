//! Authoring-time SKU validation.
//!
//! Advisory/gating logic run before a create/update request is sent to
//! catalog storage. Nothing here mutates or persists; the outcome is a
//! [`ValidationReport`] the authoring UI renders, plus a save gate
//! ([`ValidationReport::ensure_savable`]).

use serde::{Deserialize, Serialize};

use varimatrix_core::{AxisId, DomainError, DomainResult};

use crate::assignment::VariantAssignment;
use crate::catalog::VariantCatalog;
use crate::config::EngineConfig;
use crate::sku::{Product, Sku};

/// Whether an issue blocks the save outright.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Data-integrity defect; the save must be refused.
    Error,
    /// Advisory; the save may proceed once acknowledged.
    Warning,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    InconsistentAxisCoverage,
    DuplicateCombination,
    UnknownVariantReference,
    DuplicateSkuCode,
    InvalidPrice,
    InvalidStock,
    MissingSkus,
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::InconsistentAxisCoverage
            | IssueKind::DuplicateCombination
            | IssueKind::UnknownVariantReference
            | IssueKind::DuplicateSkuCode => Severity::Error,
            IssueKind::InvalidPrice | IssueKind::InvalidStock | IssueKind::MissingSkus => {
                Severity::Warning
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::InconsistentAxisCoverage => "inconsistent-axis-coverage",
            IssueKind::DuplicateCombination => "duplicate-combination",
            IssueKind::UnknownVariantReference => "unknown-variant-reference",
            IssueKind::DuplicateSkuCode => "duplicate-sku-code",
            IssueKind::InvalidPrice => "invalid-price",
            IssueKind::InvalidStock => "invalid-stock",
            IssueKind::MissingSkus => "missing-skus",
        }
    }
}

/// One finding, naming the offending SKU positions in the candidate list.
///
/// Product-level findings carry no indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub sku_indices: Vec<usize>,
    pub message: String,
}

impl ValidationIssue {
    fn new(kind: IssueKind, sku_indices: Vec<usize>, message: impl Into<String>) -> Self {
        Self {
            kind,
            sku_indices,
            message: message.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

/// Ordered list of issues found for one candidate SKU set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn of_kind(&self, kind: IssueKind) -> impl Iterator<Item = &ValidationIssue> + '_ {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> + '_ {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> + '_ {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    /// Save gate with acknowledgement always required for warnings.
    pub fn ensure_savable(&self, acknowledged: bool) -> DomainResult<()> {
        self.gate(acknowledged, true)
    }

    /// Save gate using the configured acknowledgement policy.
    pub fn ensure_savable_with(
        &self,
        config: &EngineConfig,
        acknowledged: bool,
    ) -> DomainResult<()> {
        self.gate(acknowledged, config.require_warning_acknowledgement)
    }

    fn gate(&self, acknowledged: bool, ack_required: bool) -> DomainResult<()> {
        if self.has_errors() {
            let kinds: Vec<&str> = self.errors().map(|i| i.kind.as_str()).collect();
            return Err(DomainError::validation(format!(
                "save refused: {}",
                kinds.join(", ")
            )));
        }
        if ack_required && !acknowledged && self.has_warnings() {
            return Err(DomainError::validation(
                "save requires acknowledgement of warnings",
            ));
        }
        Ok(())
    }

    fn push(&mut self, issue: ValidationIssue) {
        if issue.severity() == Severity::Error {
            tracing::warn!(
                kind = issue.kind.as_str(),
                skus = ?issue.sku_indices,
                "{}",
                issue.message
            );
        }
        self.issues.push(issue);
    }
}

/// Check a candidate SKU set against the catalog it was authored with.
///
/// `declared_axes` are the axes the admin marked relevant for the product;
/// every SKU must assign exactly those. When none are declared, the axes used
/// across the set stand in for them.
pub fn validate(
    candidate_skus: &[Sku],
    catalog: &VariantCatalog,
    declared_axes: &[AxisId],
) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_references(candidate_skus, catalog, &mut report);
    check_coverage(candidate_skus, declared_axes, &mut report);
    check_duplicate_combinations(candidate_skus, &mut report);
    check_duplicate_codes(candidate_skus, &mut report);
    for (index, sku) in candidate_skus.iter().enumerate() {
        check_numbers(
            Some(index),
            &sku.code,
            sku.base_price,
            sku.discount_price,
            sku.stock_quantity,
            &mut report,
        );
    }

    tracing::debug!(
        skus = candidate_skus.len(),
        issues = report.issues.len(),
        errors = report.errors().count(),
        "validated SKU set"
    );
    report
}

/// Product-aware entry point.
///
/// Products sold as themselves only get their own price/stock checked; a
/// variant product without SKUs is flagged but otherwise has nothing to check.
pub fn validate_product(product: &Product, catalog: &VariantCatalog) -> ValidationReport {
    if !product.has_variants {
        let mut report = ValidationReport::default();
        check_numbers(
            None,
            &product.name,
            product.base_price,
            product.discount_price,
            product.stock_quantity.unwrap_or(0),
            &mut report,
        );
        return report;
    }

    if product.skus.is_empty() {
        let mut report = ValidationReport::default();
        report.push(ValidationIssue::new(
            IssueKind::MissingSkus,
            Vec::new(),
            format!("product {} has variants enabled but no SKUs", product.name),
        ));
        return report;
    }

    validate(&product.skus, catalog, &product.declared_axes)
}

fn check_references(skus: &[Sku], catalog: &VariantCatalog, report: &mut ValidationReport) {
    for (index, sku) in skus.iter().enumerate() {
        for entry in sku.assignment.iter() {
            let problem = if catalog.axis(entry.axis_id).is_none() {
                Some(format!("unknown axis {}", entry.axis_id))
            } else if catalog.value(entry.value_id).is_none() {
                Some(format!("unknown value {}", entry.value_id))
            } else if !catalog.value_belongs_to(entry.axis_id, entry.value_id) {
                Some(format!(
                    "value {} does not belong to axis {}",
                    entry.value_id, entry.axis_id
                ))
            } else {
                None
            };

            if let Some(problem) = problem {
                report.push(ValidationIssue::new(
                    IssueKind::UnknownVariantReference,
                    vec![index],
                    format!("SKU #{index} ({}): {problem}", sku.code),
                ));
            }
        }
    }
}

/// Every SKU must assign exactly the reference axes: the declared ones, or the
/// union of axes used across the set when nothing is declared.
fn check_coverage(skus: &[Sku], declared_axes: &[AxisId], report: &mut ValidationReport) {
    let mut reference: Vec<AxisId> = Vec::new();
    let source: Vec<AxisId> = if declared_axes.is_empty() {
        skus.iter().flat_map(|s| s.assignment.axis_ids()).collect()
    } else {
        declared_axes.to_vec()
    };
    for axis in source {
        if !reference.contains(&axis) {
            reference.push(axis);
        }
    }

    for (index, sku) in skus.iter().enumerate() {
        let missing = reference
            .iter()
            .filter(|axis| sku.assignment.get(**axis).is_none())
            .count();
        let undeclared = sku
            .assignment
            .axis_ids()
            .filter(|axis| !reference.contains(axis))
            .count();
        if missing > 0 || undeclared > 0 {
            report.push(ValidationIssue::new(
                IssueKind::InconsistentAxisCoverage,
                vec![index],
                format!(
                    "SKU #{index} ({}) covers {} of {} product axes and {undeclared} other axes",
                    sku.code,
                    reference.len() - missing,
                    reference.len()
                ),
            ));
        }
    }
}

fn check_duplicate_combinations(skus: &[Sku], report: &mut ValidationReport) {
    let keys: Vec<_> = skus
        .iter()
        .map(|s| VariantAssignment::canonical_key(&s.assignment))
        .collect();

    for i in 0..keys.len() {
        for j in (i + 1)..keys.len() {
            if keys[i] == keys[j] {
                report.push(ValidationIssue::new(
                    IssueKind::DuplicateCombination,
                    vec![i, j],
                    format!(
                        "SKU #{i} ({}) and SKU #{j} ({}) carry the same combination",
                        skus[i].code, skus[j].code
                    ),
                ));
            }
        }
    }
}

fn check_duplicate_codes(skus: &[Sku], report: &mut ValidationReport) {
    for i in 0..skus.len() {
        let code = skus[i].code.trim();
        if code.is_empty() {
            continue;
        }
        for j in (i + 1)..skus.len() {
            if skus[j].code.trim() == code {
                report.push(ValidationIssue::new(
                    IssueKind::DuplicateSkuCode,
                    vec![i, j],
                    format!("SKU #{i} and SKU #{j} share code {code}"),
                ));
            }
        }
    }
}

fn check_numbers(
    index: Option<usize>,
    label: &str,
    base_price: u64,
    discount_price: Option<u64>,
    stock_quantity: i64,
    report: &mut ValidationReport,
) {
    let indices: Vec<usize> = index.into_iter().collect();

    if base_price == 0 {
        report.push(ValidationIssue::new(
            IssueKind::InvalidPrice,
            indices.clone(),
            format!("{label}: base price must be positive"),
        ));
    }
    if let Some(discount) = discount_price {
        if discount > base_price {
            report.push(ValidationIssue::new(
                IssueKind::InvalidPrice,
                indices.clone(),
                format!("{label}: discount price {discount} exceeds base price {base_price}"),
            ));
        }
    }
    if stock_quantity < 0 {
        report.push(ValidationIssue::new(
            IssueKind::InvalidStock,
            indices,
            format!("{label}: stock {stock_quantity} is negative"),
        ));
    }
}
