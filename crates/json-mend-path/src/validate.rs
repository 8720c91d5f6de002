//! Path expression validation.

use thiserror::Error;

/// Errors for malformed path expressions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unbalanced brackets in path: {0}")]
    UnbalancedBrackets(String),
    #[error("invalid array index '{index}' in path: {path}")]
    InvalidIndex { path: String, index: String },
    #[error("root marker '$' is only valid at the start of a path: {0}")]
    MisplacedRoot(String),
}

/// Validate a path expression against the grammar: an optional leading `$`,
/// then `.name` and `[n]` segments with non-negative integer indices.
///
/// Parsing itself is forgiving (it discards malformed tokens); this check is
/// for callers that want to reject bad input up front.
///
/// # Example
///
/// ```
/// use json_mend_path::validate_path;
///
/// assert!(validate_path("$.a[0].b").is_ok());
/// assert!(validate_path("$.a[x]").is_err());
/// assert!(validate_path("$.a[0").is_err());
/// ```
pub fn validate_path(path: &str) -> Result<(), ValidationError> {
    let trimmed = path.trim();
    let rest = trimmed.strip_prefix('$').unwrap_or(trimmed);
    if rest.contains('$') {
        return Err(ValidationError::MisplacedRoot(path.to_string()));
    }

    let mut index: Option<String> = None;
    for c in rest.chars() {
        match c {
            '[' => {
                if index.is_some() {
                    return Err(ValidationError::UnbalancedBrackets(path.to_string()));
                }
                index = Some(String::new());
            }
            ']' => match index.take() {
                Some(idx) if crate::is_valid_index(&idx) => {}
                Some(idx) => {
                    return Err(ValidationError::InvalidIndex {
                        path: path.to_string(),
                        index: idx,
                    })
                }
                None => return Err(ValidationError::UnbalancedBrackets(path.to_string())),
            },
            other => {
                if let Some(idx) = index.as_mut() {
                    idx.push(other);
                }
            }
        }
    }
    if index.is_some() {
        return Err(ValidationError::UnbalancedBrackets(path.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_paths() {
        for path in ["", "$", "$.a", "$.a[0].b", "a.b.c", "$[2]"] {
            assert_eq!(validate_path(path), Ok(()), "path: {path}");
        }
    }

    #[test]
    fn rejects_bad_indices() {
        assert!(matches!(
            validate_path("$.a[x]"),
            Err(ValidationError::InvalidIndex { .. })
        ));
        assert!(matches!(
            validate_path("$.a[-1]"),
            Err(ValidationError::InvalidIndex { .. })
        ));
        assert!(matches!(
            validate_path("$.a[]"),
            Err(ValidationError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn rejects_unbalanced_brackets() {
        for path in ["$.a[0", "$.a]", "$.a[[0]]"] {
            assert!(
                matches!(validate_path(path), Err(ValidationError::UnbalancedBrackets(_))),
                "path: {path}"
            );
        }
    }

    #[test]
    fn rejects_misplaced_root() {
        assert!(matches!(
            validate_path("$.a.$"),
            Err(ValidationError::MisplacedRoot(_))
        ));
    }
}
