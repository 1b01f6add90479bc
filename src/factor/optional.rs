//! The optionality combinator.

use std::sync::Arc;

use super::{Factor, FactorError};

/// Makes a factor accept "absent" as valid.
///
/// The returned factor accepts a missing value as `None`, delegates present
/// values to the wrapped check and wraps acceptances in `Some`. Rejections pass
/// through unchanged. The tag is copied verbatim, so introspection reports the
/// inner type and optionality shows up only through [`Factor::is_optional`].
///
/// Wrapping an already optional factor fails with
/// [`FactorError::NestedOptional`].
///
/// # Example
///
/// ```rust
/// use typist::{factors, optional};
/// use serde_json::json;
///
/// let tree = optional(&factors::string()).unwrap();
///
/// assert_eq!(tree.tag(), "string");
/// assert!(tree.is_optional());
/// assert!(tree.accepts(None));
/// assert!(tree.accepts(Some(&json!("apple tree"))));
/// assert!(!tree.accepts(Some(&json!(7))));
/// ```
pub fn optional(factor: &Factor) -> Result<Factor, FactorError> {
    if factor.optional {
        return Err(FactorError::NestedOptional {
            tag: factor.tag().to_string(),
        });
    }

    Ok(Factor {
        tag: Arc::clone(&factor.tag),
        optional: true,
        check: Arc::clone(&factor.check),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factor::builtin;
    use serde_json::json;

    #[test]
    fn test_absent_is_accepted_as_none() {
        let factor = optional(&builtin::int32()).unwrap();
        let result = factor.apply(None);
        assert_eq!(result.into_result().unwrap(), None);
    }

    #[test]
    fn test_present_is_wrapped_in_some() {
        let factor = optional(&builtin::int32()).unwrap();
        let result = factor.apply(Some(&json!(12)));
        assert_eq!(result.into_result().unwrap(), Some(json!(12)));
    }

    #[test]
    fn test_rejection_propagates_unchanged() {
        let inner = builtin::int32();
        let factor = optional(&inner).unwrap();

        let direct = inner.check(&json!("twelve")).into_result().unwrap_err();
        let wrapped = factor.apply(Some(&json!("twelve"))).into_result().unwrap_err();
        assert_eq!(direct, wrapped);
    }

    #[test]
    fn test_tag_is_inner_tag() {
        let inner = builtin::string().retag("country");
        let factor = optional(&inner).unwrap();
        assert_eq!(factor.tag(), "string(country)");
        assert!(factor.shares_check_with(&inner));
    }

    #[test]
    fn test_inner_factor_is_untouched() {
        let inner = builtin::string();
        let _ = optional(&inner).unwrap();
        assert!(!inner.is_optional());
    }

    #[test]
    fn test_nested_optional_is_rejected() {
        let once = optional(&builtin::string()).unwrap();
        let err = optional(&once).unwrap_err();
        assert!(matches!(err, FactorError::NestedOptional { ref tag } if tag == "string"));
    }

    #[test]
    fn test_retagged_optional_stays_optional() {
        let once = optional(&builtin::string()).unwrap();
        let retagged = once.retag("nickname");
        assert!(retagged.is_optional());
        assert!(retagged.optional().is_err());
    }
}
