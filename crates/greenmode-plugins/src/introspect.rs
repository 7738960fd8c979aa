//! Signature helpers.
//!
//! Decorator unwrapping follows the explicit `wraps` relation of
//! [`FunctionSig`]: a wrapper lists the functions it wraps, which may be
//! wrappers themselves.

use greenmode_core::model::SettingValue;

use crate::plugin::FunctionSig;

/// Every parameter in declaration order, with its default if it has one.
pub fn get_all_args(sig: &FunctionSig) -> Vec<(String, Option<SettingValue>)> {
    sig.params
        .iter()
        .map(|p| (p.name.clone(), p.default.clone()))
        .collect()
}

/// Parameters that declare a default, in declaration order.
pub fn get_default_args(sig: &FunctionSig) -> Vec<(String, SettingValue)> {
    sig.params
        .iter()
        .filter_map(|p| p.default.clone().map(|d| (p.name.clone(), d)))
        .collect()
}

/// Find the function named `target` wrapped (at any depth) by `sig`.
///
/// Wrapped functions are searched depth first in declaration order. Returns
/// `None` when `sig` wraps nothing or no wrapped function has that name.
pub fn find_undecorated<'a>(sig: &'a FunctionSig, target: &str) -> Option<&'a FunctionSig> {
    for inner in &sig.wraps {
        if inner.name == target {
            return Some(inner.as_ref());
        }
        if let Some(found) = find_undecorated(inner, target) {
            return Some(found);
        }
    }
    None
}

/// The original function behind `sig`, or `sig` itself when it is not
/// decorated.
pub fn undecorated(sig: &FunctionSig) -> &FunctionSig {
    find_undecorated(sig, &sig.name).unwrap_or(sig)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::plugin::{Annotation, Param};

    fn original_run() -> FunctionSig {
        FunctionSig::new("run")
            .param(Param::required("filename"))
            .param(Param::required("file"))
            .param(Param::required("max_line_length").annotated(Annotation::Int))
            .param(Param::optional("use_spaces", true).annotated(Annotation::Bool))
            .param(Param::optional("tab_width", 4i64))
    }

    fn generic_params() -> Vec<Param> {
        vec![Param::required("args"), Param::required("kwargs")]
    }

    #[test]
    fn all_and_default_args_keep_declaration_order() {
        let sig = original_run();
        let all: Vec<String> = get_all_args(&sig).into_iter().map(|(n, _)| n).collect();
        assert_eq!(all, vec!["filename", "file", "max_line_length", "use_spaces", "tab_width"]);

        let defaults = get_default_args(&sig);
        assert_eq!(
            defaults,
            vec![
                ("use_spaces".to_string(), SettingValue::Bool(true)),
                ("tab_width".to_string(), SettingValue::Int(4)),
            ]
        );
    }

    #[test]
    fn undecorated_function_is_itself() {
        let sig = original_run();
        assert!(find_undecorated(&sig, "run").is_none());
        assert_eq!(undecorated(&sig), &sig);
    }

    #[test]
    fn single_wrapper_is_unwrapped() {
        let inner = Arc::new(original_run());
        let wrapped = FunctionSig::wrapper("run", generic_params(), vec![inner.clone()]);
        assert_eq!(undecorated(&wrapped), inner.as_ref());
    }

    #[test]
    fn nested_wrappers_are_unwrapped() {
        let inner = Arc::new(original_run());
        let middle = Arc::new(FunctionSig::wrapper(
            "checked",
            generic_params(),
            vec![Arc::new(FunctionSig::new("helper")), inner.clone()],
        ));
        let outer = FunctionSig::wrapper("run", generic_params(), vec![middle]);
        assert_eq!(find_undecorated(&outer, "run"), Some(inner.as_ref()));
        assert_eq!(find_undecorated(&outer, "missing"), None);
    }
}
