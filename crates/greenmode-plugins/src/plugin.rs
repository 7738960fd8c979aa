//! Bear interface.
//!
//! A bear is an analysis unit that reports findings for a file (local bears)
//! or for the whole project (global bears). Green mode never looks inside a
//! bear: it reads the declared call signature to find the bear's settings and
//! calls `run` with concrete setting values.
//!
//! Signatures are declared data. A bear whose entry point is wrapped by some
//! decorating layer declares the wrapper's signature and records the wrapped
//! function(s) in [`FunctionSig::wraps`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use greenmode_core::model::{Assignment, FileDict, Finding, IgnoreRange, SettingValue};

/// Whether a bear runs per file or once over the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BearKind {
    Local,
    Global,
}

impl BearKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Global => "global",
        }
    }
}

/// Declared type of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Annotation {
    Bool,
    Int,
    Str,
    List,
    Other(String),
}

impl Annotation {
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }
}

/// One parameter of a bear function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    /// `None` means the parameter is required.
    pub default: Option<SettingValue>,
    pub annotation: Option<Annotation>,
}

impl Param {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            annotation: None,
        }
    }

    pub fn optional(name: impl Into<String>, default: impl Into<SettingValue>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
            annotation: None,
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Call signature of a bear function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSig {
    pub name: String,
    pub params: Vec<Param>,
    /// Functions this one wraps, innermost last. Empty for undecorated
    /// functions.
    pub wraps: Vec<Arc<FunctionSig>>,
}

impl FunctionSig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            wraps: Vec::new(),
        }
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// A decorating wrapper named `name` with its own parameter list around
    /// `wrapped`.
    pub fn wrapper(name: impl Into<String>, params: Vec<Param>, wrapped: Vec<Arc<FunctionSig>>) -> Self {
        Self {
            name: name.into(),
            params,
            wraps: wrapped,
        }
    }

    pub fn param_named(&self, key: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == key)
    }

    pub fn annotation(&self, key: &str) -> Option<&Annotation> {
        self.param_named(key).and_then(|p| p.annotation.as_ref())
    }
}

/// Entry point of a bear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A bear implemented by a single `run` function.
    Run(FunctionSig),
    /// A bear wrapping an external tool: settings are consumed when building
    /// the command line and, optionally, a generated config file.
    Linter {
        create_arguments: FunctionSig,
        generate_config: Option<FunctionSig>,
    },
}

impl Entry {
    pub fn is_run(&self) -> bool {
        matches!(self, Self::Run(_))
    }

    /// Declared functions, decorated as they are.
    pub fn functions(&self) -> Vec<&FunctionSig> {
        match self {
            Self::Run(run) => vec![run],
            Self::Linter {
                create_arguments,
                generate_config,
            } => {
                let mut out = vec![create_arguments];
                out.extend(generate_config.as_ref());
                out
            }
        }
    }

    /// Parameter names the host fills in itself; they are never settings.
    pub fn host_supplied(&self) -> &'static [&'static str] {
        match self {
            Self::Run(_) => &["file", "filename", "dependency_results"],
            Self::Linter { .. } => &["file", "filename", "config_file"],
        }
    }
}

/// What a single trial hands to a bear.
#[derive(Debug, Clone, Copy)]
pub enum TrialInput<'a> {
    Local { filename: &'a str, file: &'a [String] },
    Global { files: &'a FileDict },
}

impl<'a> TrialInput<'a> {
    pub fn filename(&self) -> Option<&'a str> {
        match self {
            Self::Local { filename, .. } => Some(*filename),
            Self::Global { .. } => None,
        }
    }
}

/// An analysis unit.
pub trait Bear: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> BearKind {
        BearKind::Local
    }

    fn entry(&self) -> Entry;

    /// Bears that must report green before this one is tried.
    fn deps(&self) -> Vec<Arc<dyn Bear>> {
        Vec::new()
    }

    fn run(&self, settings: &Assignment, input: &TrialInput<'_>) -> anyhow::Result<Vec<Finding>>;
}

impl std::fmt::Debug for dyn Bear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bear")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}

/// Typed access to assignment values from inside `run`.
pub trait SettingsExt {
    fn int_or(&self, key: &str, default: i64) -> anyhow::Result<i64>;
    fn bool_or(&self, key: &str, default: bool) -> anyhow::Result<bool>;
    fn require_int(&self, key: &str) -> anyhow::Result<i64>;
}

impl SettingsExt for Assignment {
    fn int_or(&self, key: &str, default: i64) -> anyhow::Result<i64> {
        match self.get(key) {
            None => Ok(default),
            Some(v) => v
                .as_int()
                .ok_or_else(|| anyhow::anyhow!("setting {key} must be an integer, got {v}")),
        }
    }

    fn bool_or(&self, key: &str, default: bool) -> anyhow::Result<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(v) => v
                .as_bool()
                .ok_or_else(|| anyhow::anyhow!("setting {key} must be a boolean, got {v}")),
        }
    }

    fn require_int(&self, key: &str) -> anyhow::Result<i64> {
        let v = self
            .get(key)
            .ok_or_else(|| anyhow::anyhow!("missing required setting {key}"))?;
        v.as_int()
            .ok_or_else(|| anyhow::anyhow!("setting {key} must be an integer, got {v}"))
    }
}

/// Source of code regions exempted from findings.
pub trait IgnoreRangeProvider: Send + Sync {
    fn ignore_ranges(&self, files: &FileDict) -> Vec<IgnoreRange>;
}
