//! Ruby-style argument checking against a declared signature.

use armock_analysis::MethodSignature;
use armock_core::errors::MockError;

use super::CallArgs;

/// `1`, `1..2` or `1+`, as Ruby prints the expected argument count.
pub fn expected_arity(signature: &MethodSignature) -> String {
    let required = signature.required_count();
    let optional = signature.optional_count();
    if signature.has_rest() {
        format!("{required}+")
    } else if optional > 0 {
        format!("{required}..{}", required + optional)
    } else {
        required.to_string()
    }
}

/// Check `args` against `signature`. `method` is the qualified name used in errors.
///
/// Keywords given to a method without keyword parameters are folded into a
/// trailing positional hash before counting.
pub fn check_arity(
    signature: &MethodSignature,
    method: &str,
    args: &mut CallArgs,
) -> Result<(), MockError> {
    if !signature.accepts_keywords() {
        args.fold_keywords();
    }

    let given = args.positional.len();
    let required = signature.required_count();
    let max = required + signature.optional_count();
    if given < required || (!signature.has_rest() && given > max) {
        return Err(MockError::WrongArity {
            method: method.to_string(),
            given,
            expected: expected_arity(signature),
        });
    }

    let missing: Vec<String> = signature
        .required_keywords()
        .filter(|k| !args.keywords.contains_key(*k))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(MockError::MissingKeywords {
            method: method.to_string(),
            keywords: missing,
        });
    }

    if !signature.has_keyword_rest() {
        let unknown: Vec<String> = args
            .keywords
            .keys()
            .filter(|k| !signature.keyword_names().any(|name| name == k.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(MockError::UnknownKeywords {
                method: method.to_string(),
                keywords: unknown,
            });
        }
    }
    Ok(())
}
