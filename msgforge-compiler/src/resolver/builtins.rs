//! Built-in validator registrations.

use crate::ir::{ValidatorArg, ValidatorRef};
use crate::resolver::condition::{Bound, Check, CompareOp, Condition};
use crate::resolver::{Applicability, ValidatorRegistration};

/// The built-in validator set, in registration order.
pub fn builtin_validators() -> Vec<ValidatorRegistration> {
    vec![
        numeric_bound("min", CompareOp::Ge, "must be at least", "range.min"),
        numeric_bound("max", CompareOp::Le, "must be at most", "range.max"),
        numeric_bound("gt", CompareOp::Gt, "must be greater than", "range.gt"),
        numeric_bound("lt", CompareOp::Lt, "must be less than", "range.lt"),
        ValidatorRegistration::new("positive", Applicability::Numeric, |r| {
            expect_no_args(r)?;
            Ok(Check::new(
                Condition::Compare {
                    op: CompareOp::Gt,
                    bound: Bound::Int(0),
                },
                "must be positive",
                "range.positive",
            ))
        }),
        ValidatorRegistration::new("nonnegative", Applicability::Numeric, |r| {
            expect_no_args(r)?;
            Ok(Check::new(
                Condition::Compare {
                    op: CompareOp::Ge,
                    bound: Bound::Int(0),
                },
                "must not be negative",
                "range.nonnegative",
            ))
        }),
        ValidatorRegistration::new("int", Applicability::Numeric, |r| {
            expect_no_args(r)?;
            Ok(Check::new(
                Condition::IsInteger,
                "must be a whole number",
                "number.int",
            ))
        }),
        length_bound("min_len", CompareOp::Ge, "length must be at least", "length.min"),
        length_bound("max_len", CompareOp::Le, "length must be at most", "length.max"),
        length_bound("len", CompareOp::Eq, "length must be exactly", "length.exact"),
        ValidatorRegistration::new("nonempty", Applicability::Sized, |r| {
            expect_no_args(r)?;
            Ok(Check::new(Condition::NonEmpty, "must not be empty", "length.nonempty"))
        }),
        ValidatorRegistration::new("matches", Applicability::Text, |r| {
            let pattern = expect_str(r)?;
            Ok(Check::new(
                Condition::Matches {
                    pattern: pattern.clone(),
                },
                format!("must match `{}`", pattern),
                "string.matches",
            ))
        }),
        ValidatorRegistration::new("starts_with", Applicability::Text, |r| {
            let prefix = expect_str(r)?;
            Ok(Check::new(
                Condition::StartsWith {
                    prefix: prefix.clone(),
                },
                format!("must start with `{}`", prefix),
                "string.starts-with",
            ))
        }),
        ValidatorRegistration::new("ends_with", Applicability::Text, |r| {
            let suffix = expect_str(r)?;
            Ok(Check::new(
                Condition::EndsWith {
                    suffix: suffix.clone(),
                },
                format!("must end with `{}`", suffix),
                "string.ends-with",
            ))
        }),
    ]
}

fn numeric_bound(
    name: &'static str,
    op: CompareOp,
    phrase: &'static str,
    code: &'static str,
) -> ValidatorRegistration {
    ValidatorRegistration::new(name, Applicability::Numeric, move |r| {
        let bound = expect_bound(r)?;
        Ok(Check::new(
            Condition::Compare { op, bound },
            format!("{} {}", phrase, bound.display()),
            code,
        ))
    })
}

fn length_bound(
    name: &'static str,
    op: CompareOp,
    phrase: &'static str,
    code: &'static str,
) -> ValidatorRegistration {
    ValidatorRegistration::new(name, Applicability::Sized, move |r| {
        let len = expect_len(r)?;
        Ok(Check::new(
            Condition::LengthCompare { op, len },
            format!("{} {}", phrase, len),
            code,
        ))
    })
}

fn expect_no_args(r: &ValidatorRef) -> Result<(), String> {
    if r.args.is_empty() {
        Ok(())
    } else {
        Err(format!("`{}` takes no arguments", r.name))
    }
}

fn expect_bound(r: &ValidatorRef) -> Result<Bound, String> {
    match r.args.as_slice() {
        [ValidatorArg::Int(value)] => Ok(Bound::Int(*value)),
        [ValidatorArg::Float(value)] => Ok(Bound::Float(*value)),
        _ => Err(format!("`{}` takes one numeric argument", r.name)),
    }
}

fn expect_len(r: &ValidatorRef) -> Result<usize, String> {
    match r.args.as_slice() {
        [arg] => arg
            .as_usize()
            .ok_or_else(|| format!("`{}` takes one non-negative integer argument", r.name)),
        _ => Err(format!("`{}` takes one non-negative integer argument", r.name)),
    }
}

fn expect_str(r: &ValidatorRef) -> Result<String, String> {
    match r.args.as_slice() {
        [ValidatorArg::Str(value)] => Ok(value.clone()),
        _ => Err(format!("`{}` takes one string argument", r.name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_are_unique() {
        let validators = builtin_validators();
        let mut names: Vec<&str> = validators.iter().map(|v| v.name.as_str()).collect();
        names.sort_unstable();
        let len_before = names.len();
        names.dedup();
        assert_eq!(names.len(), len_before);
    }

    #[test]
    fn test_min_builds_ge_check() {
        let validators = builtin_validators();
        let min = validators.iter().find(|v| v.name == "min").unwrap();
        let check = (min.build)(&ValidatorRef::new("min", vec![ValidatorArg::Int(3)])).unwrap();

        assert_eq!(
            check.condition,
            Condition::Compare {
                op: CompareOp::Ge,
                bound: Bound::Int(3)
            }
        );
        assert_eq!(check.code, "range.min");
        assert!(check.message.contains('3'));
    }

    #[test]
    fn test_arity_errors() {
        let validators = builtin_validators();
        let min = validators.iter().find(|v| v.name == "min").unwrap();
        assert!((min.build)(&ValidatorRef::new("min", vec![])).is_err());

        let nonempty = validators.iter().find(|v| v.name == "nonempty").unwrap();
        assert!((nonempty.build)(&ValidatorRef::new(
            "nonempty",
            vec![ValidatorArg::Int(1)]
        ))
        .is_err());

        let matches = validators.iter().find(|v| v.name == "matches").unwrap();
        assert!((matches.build)(&ValidatorRef::new("matches", vec![ValidatorArg::Int(1)])).is_err());
    }
}
