//! Bear settings: classification into boolean/other and resolution of
//! non-boolean settings to their value domains.

pub mod classify;
pub mod resolver;

pub use classify::{
    collect_bear_settings, BearSettings, DepNode, DependencyTree, SettingClassifier, SettingTypes,
    Trigger,
};
pub use resolver::{SettingDomain, SettingTypeResolver, SettingTypeTable, TableError};
