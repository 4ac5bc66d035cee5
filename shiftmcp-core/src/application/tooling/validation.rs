//! Argument validation against a descriptor's parameter specs.

use crate::domain::outcome::ErrorKind;
use crate::domain::types::{ParamKind, ToolArguments, ToolDescriptor};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required parameter '{param}'")]
    MissingParameter { param: String },
    #[error("parameter '{param}' must be {expected}")]
    TypeMismatch { param: String, expected: String },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArguments
    }
}

/// Check `args` against the descriptor and fill in defaults.
///
/// Unknown keys are kept untouched. `null` counts as absent, so a required
/// parameter passed as `null` is missing and an optional one receives its
/// default.
pub fn validate_arguments(
    descriptor: &ToolDescriptor,
    mut args: ToolArguments,
) -> Result<ToolArguments, ValidationError> {
    for param in descriptor.params() {
        match args.get(&param.name) {
            Some(value) if !param.kind.accepts(value) => {
                return Err(ValidationError::TypeMismatch {
                    param: param.name.clone(),
                    expected: expected(&param.kind),
                });
            }
            Some(_) => {}
            None if param.required => {
                return Err(ValidationError::MissingParameter {
                    param: param.name.clone(),
                });
            }
            None => {
                if let Some(default) = &param.default {
                    args.insert(param.name.clone(), default.clone());
                }
            }
        }
    }
    Ok(args)
}

fn expected(kind: &ParamKind) -> String {
    match kind {
        ParamKind::Integer => "an integer".to_string(),
        ParamKind::Object => "an object".to_string(),
        ParamKind::Enum(_) => kind.to_string(),
        other => format!("a {other}"),
    }
}
