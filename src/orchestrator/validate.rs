//! Input validation (spec §4.11 `validating` state, §7 error kind (1)).
//!
//! Fail-fast checks: no data, missing required fields, non-numeric
//! (NaN/Infinity) values when `validateSchema` is on. When off, NaN/
//! Infinity values flow through and simply produce NaN/Infinity outputs
//! later (spec §7).

use crate::config::ProcessOptions;
use crate::error::ValidationError;
use crate::types::Observation;

/// One validation finding, either fatal (schema mode) or merely reported
/// (`validate_economic_data`'s `issues[]`, spec §6).
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub index: usize,
    pub message: String,
}

/// Checks a batch for the fail-fast conditions (spec §7 item 1). Returns
/// `Err` with the first fatal error when `validate_schema` is on and a
/// required field is missing or a value is non-numeric; otherwise `Ok`
/// with whatever non-fatal issues were still observed.
pub fn validate(items: &[Observation], options: &ProcessOptions) -> Result<Vec<ValidationIssue>, ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::NoData);
    }

    let mut issues = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if item.value.is_nan() || item.value.is_infinite() {
            if options.validate_schema {
                return Err(ValidationError::NonNumericValue { index });
            }
            issues.push(ValidationIssue {
                index,
                message: format!("observation {index} has a non-numeric (NaN/Infinity) value"),
            });
        }

        for field in &options.required_fields {
            if !has_field(item, field) {
                if options.validate_schema {
                    return Err(ValidationError::MissingField {
                        index,
                        field: field.clone(),
                    });
                }
                issues.push(ValidationIssue {
                    index,
                    message: format!("observation {index} is missing required field '{field}'"),
                });
            }
        }
    }

    Ok(issues)
}

fn has_field(item: &Observation, field: &str) -> bool {
    match field {
        "id" => item.id.is_some(),
        "value" => !item.value.is_nan(),
        "unit" => !item.unit.trim().is_empty(),
        "periodicity" => item.periodicity.is_some(),
        "scale" => item.scale.is_some(),
        "currency" => item.currency.is_some(),
        "name" => item.name.as_deref().is_some_and(|n| !n.trim().is_empty()),
        "description" => item.description.is_some(),
        "date" => item.date.is_some(),
        "year" => item.year.is_some(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_is_fatal() {
        let options = ProcessOptions::default();
        assert!(matches!(validate(&[], &options), Err(ValidationError::NoData)));
    }

    #[test]
    fn nan_value_is_fatal_when_schema_validation_is_on() {
        let mut options = ProcessOptions::default();
        options.validate_schema = true;
        let items = vec![Observation::new(f64::NAN).with_unit("USD Million")];
        assert!(matches!(
            validate(&items, &options),
            Err(ValidationError::NonNumericValue { index: 0 })
        ));
    }

    #[test]
    fn nan_value_is_a_non_fatal_issue_when_schema_validation_is_off() {
        let options = ProcessOptions::default();
        let items = vec![Observation::new(f64::NAN).with_unit("USD Million")];
        let issues = validate(&items, &options).unwrap();
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn missing_required_field_is_fatal_under_schema_validation() {
        let mut options = ProcessOptions::default();
        options.validate_schema = true;
        options.required_fields = vec!["name".to_string()];
        let items = vec![Observation::new(1.0).with_unit("USD Million")];
        assert!(matches!(
            validate(&items, &options),
            Err(ValidationError::MissingField { index: 0, .. })
        ));
    }
}
