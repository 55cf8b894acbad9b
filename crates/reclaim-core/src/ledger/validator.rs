//! Whole-batch amount validation.

use tracing::{error, info};

use crate::error::{AmountViolation, ValidationError};
use crate::models::config::ValidationConfig;
use crate::models::receipt::{ExtractedReceipt, ReceiptRecord};

/// Checks every extracted amount against an inclusive plausible range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountValidator {
    min: u64,
    max: u64,
}

impl AmountValidator {
    /// Create a validator for `[min, max]`.
    pub fn new(min: u64, max: u64) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::InvalidBounds { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn from_config(config: &ValidationConfig) -> Result<Self, ValidationError> {
        Self::new(config.min_amount, config.max_amount)
    }

    pub fn contains(&self, amount: u64) -> bool {
        (self.min..=self.max).contains(&amount)
    }

    /// Validate a complete batch.
    ///
    /// Amounts are coerced first, so a missing amount becomes 0 and fails.
    /// Any violation rejects the whole batch, listing every offender.
    pub fn validate(&self, receipts: Vec<ExtractedReceipt>) -> Result<Vec<ReceiptRecord>, ValidationError> {
        let mut records = Vec::with_capacity(receipts.len());
        let mut violations = Vec::new();

        for receipt in receipts {
            let amount = receipt.coerced_amount();
            if !self.contains(amount) {
                error!(source_id = %receipt.source_id, amount, "amount outside plausible range");
                violations.push(AmountViolation {
                    source_id: receipt.source_id,
                    amount,
                });
                continue;
            }
            records.push(ReceiptRecord {
                source_id: receipt.source_id,
                date: receipt.date,
                time: receipt.time,
                amount,
                category: receipt.category,
            });
        }

        if !violations.is_empty() {
            return Err(ValidationError::AmountsOutOfRange {
                min: self.min,
                max: self.max,
                violations,
            });
        }

        info!(count = records.len(), min = self.min, max = self.max, "all amounts within range");
        Ok(records)
    }

    /// Validate amounts that are already numeric, such as a ledger read back
    /// from disk. Same whole-batch semantics as [`validate`](Self::validate).
    pub fn check<I>(&self, amounts: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        let violations: Vec<AmountViolation> = amounts
            .into_iter()
            .filter(|(_, amount)| !self.contains(*amount))
            .map(|(source_id, amount)| {
                error!(%source_id, amount, "amount outside plausible range");
                AmountViolation { source_id, amount }
            })
            .collect();

        if violations.is_empty() {
            return Ok(());
        }
        Err(ValidationError::AmountsOutOfRange {
            min: self.min,
            max: self.max,
            violations,
        })
    }
}

impl Default for AmountValidator {
    fn default() -> Self {
        let config = ValidationConfig::default();
        Self {
            min: config.min_amount,
            max: config.max_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::receipt::VendorCategory;

    fn receipt(source_id: &str, amount: Option<&str>) -> ExtractedReceipt {
        ExtractedReceipt {
            source_id: source_id.into(),
            date: None,
            time: None,
            amount: amount.map(String::from),
            category: VendorCategory::Unknown,
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let validator = AmountValidator::default();
        assert!(validator.contains(1000));
        assert!(validator.contains(99_999));
        assert!(!validator.contains(999));
        assert!(!validator.contains(100_000));
    }

    #[test]
    fn test_valid_batch_passes_in_order() {
        let records = AmountValidator::default()
            .validate(vec![receipt("a.jpg", Some("1000")), receipt("b.jpg", Some("99999"))])
            .unwrap();
        let amounts: Vec<_> = records.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![1000, 99_999]);
    }

    #[test]
    fn test_missing_amount_fails_validation() {
        let err = AmountValidator::default()
            .validate(vec![receipt("a.jpg", Some("5000")), receipt("blank.jpg", None)])
            .unwrap_err();

        match err {
            ValidationError::AmountsOutOfRange { violations, .. } => {
                assert_eq!(
                    violations,
                    vec![AmountViolation { source_id: "blank.jpg".into(), amount: 0 }]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_every_offender_is_reported() {
        let err = AmountValidator::default()
            .validate(vec![
                receipt("low.jpg", Some("120")),
                receipt("ok.jpg", Some("4500")),
                receipt("high.jpg", Some("1234567")),
            ])
            .unwrap_err();

        let ValidationError::AmountsOutOfRange { violations, .. } = err else {
            panic!("expected range violation");
        };
        let ids: Vec<_> = violations.iter().map(|v| v.source_id.as_str()).collect();
        assert_eq!(ids, vec!["low.jpg", "high.jpg"]);
    }

    #[test]
    fn test_check_numeric_amounts() {
        let validator = AmountValidator::default();
        assert!(validator.check(vec![("1".to_string(), 5000)]).is_ok());

        let err = validator
            .check(vec![
                ("1".to_string(), 0),
                ("2".to_string(), 500),
                ("3".to_string(), 7000),
                ("4".to_string(), 250_000),
            ])
            .unwrap_err();
        let ValidationError::AmountsOutOfRange { violations, .. } = err else {
            panic!("expected range violation");
        };
        let amounts: Vec<_> = violations.iter().map(|v| v.amount).collect();
        assert_eq!(amounts, vec![0, 500, 250_000]);
    }

    #[test]
    fn test_custom_bounds() {
        let validator = AmountValidator::new(10, 20).unwrap();
        assert!(validator.validate(vec![receipt("a.jpg", Some("15"))]).is_ok());
        assert!(matches!(
            AmountValidator::new(20, 10),
            Err(ValidationError::InvalidBounds { min: 20, max: 10 })
        ));
    }
}
