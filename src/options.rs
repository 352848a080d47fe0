//! Report options, presets and per-child option derivation.
//!
//! An [`OptionSet`] carries the handful of keys the aggregator interprets
//! itself (`version`, `hash`, `children`, `colors`) and passes every other
//! key through to the child results untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Three-valued switch: derive automatically, force on, or force off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Toggle {
    /// Not specified; derive from the children.
    #[default]
    Auto,
    /// Explicitly enabled.
    On,
    /// Explicitly disabled.
    Off,
}

impl Toggle {
    /// Returns true when the option was left unspecified.
    pub fn is_auto(&self) -> bool {
        matches!(self, Toggle::Auto)
    }

    /// Resolve the switch, calling `derive` only for [`Toggle::Auto`].
    pub fn resolve(self, derive: impl FnOnce() -> bool) -> bool {
        match self {
            Toggle::Auto => derive(),
            Toggle::On => true,
            Toggle::Off => false,
        }
    }
}

impl From<Option<bool>> for Toggle {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Toggle::Auto,
            Some(true) => Toggle::On,
            Some(false) => Toggle::Off,
        }
    }
}

impl From<Toggle> for Option<bool> {
    fn from(toggle: Toggle) -> Self {
        match toggle {
            Toggle::Auto => None,
            Toggle::On => Some(true),
            Toggle::Off => Some(false),
        }
    }
}

/// Value of the `children` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChildrenOption {
    /// `false` hides the per-child reports, `true` keeps them.
    Flag(bool),
    /// One option entry per child, matched by position; `null` entries
    /// carry no inner options.
    PerChild(Vec<Option<OptionsInput>>),
    /// The same inner options for every child.
    Shared(Box<OptionSet>),
}

/// Structured report options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionSet {
    /// Top-level version field.
    #[serde(default, skip_serializing_if = "Toggle::is_auto")]
    pub version: Toggle,

    /// Top-level hash field.
    #[serde(default, skip_serializing_if = "Toggle::is_auto")]
    pub hash: Toggle,

    /// Per-child reports and per-child option overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<ChildrenOption>,

    /// Colored text output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<bool>,

    /// Every other key, forwarded to the children as given.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl OptionSet {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`OptionSet::insert`].
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a key, routing the recognized ones to their typed fields.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        match key {
            "version" => self.version = Toggle::from(value.as_bool()),
            "hash" => self.hash = Toggle::from(value.as_bool()),
            "colors" => self.colors = value.as_bool(),
            "children" => {
                self.children = if value.is_null() {
                    None
                } else {
                    serde_json::from_value(value).ok()
                }
            }
            _ => {
                self.other.insert(key.to_string(), value);
            }
        }
    }

    /// Boolean value of a passthrough key, if it is set to a boolean.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.other.get(key).and_then(Value::as_bool)
    }

    /// Returns true only when `children` is explicitly `false`.
    pub fn hides_children(&self) -> bool {
        matches!(self.children, Some(ChildrenOption::Flag(false)))
    }

    /// Copy every key `inner` specifies over this set.
    pub fn merge(&mut self, inner: OptionSet) {
        if !inner.version.is_auto() {
            self.version = inner.version;
        }
        if !inner.hash.is_auto() {
            self.hash = inner.hash;
        }
        if inner.children.is_some() {
            self.children = inner.children;
        }
        if inner.colors.is_some() {
            self.colors = inner.colors;
        }
        self.other.extend(inner.other);
    }
}

/// Options as accepted by the aggregator: a preset flag, a preset name, or a
/// full option set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionsInput {
    Flag(bool),
    Preset(String),
    Set(OptionSet),
}

impl Default for OptionsInput {
    fn default() -> Self {
        OptionsInput::Set(OptionSet::default())
    }
}

impl OptionsInput {
    /// Expand presets into a structured option set.
    pub fn normalize(self) -> OptionSet {
        match self {
            OptionsInput::Flag(true) => OptionSet::default(),
            OptionsInput::Flag(false) => preset_to_options("none"),
            OptionsInput::Preset(name) => preset_to_options(&name),
            OptionsInput::Set(set) => set,
        }
    }
}

impl From<bool> for OptionsInput {
    fn from(flag: bool) -> Self {
        OptionsInput::Flag(flag)
    }
}

impl From<&str> for OptionsInput {
    fn from(name: &str) -> Self {
        OptionsInput::Preset(name.to_string())
    }
}

impl From<String> for OptionsInput {
    fn from(name: String) -> Self {
        OptionsInput::Preset(name)
    }
}

impl From<OptionSet> for OptionsInput {
    fn from(set: OptionSet) -> Self {
        OptionsInput::Set(set)
    }
}

impl<T: Into<OptionsInput>> From<Option<T>> for OptionsInput {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Expand a preset name into an option set.
///
/// Matching is case-insensitive. An empty name means `none`; unknown names
/// expand to the empty set.
pub fn preset_to_options(name: &str) -> OptionSet {
    let name = if name.is_empty() {
        "none".to_string()
    } else {
        name.to_lowercase()
    };

    match name.as_str() {
        "none" => OptionSet::new().with("all", false),
        "verbose" => OptionSet::new()
            .with("entrypoints", true)
            .with("chunkGroups", true)
            .with("modules", false)
            .with("chunks", true)
            .with("chunkModules", true)
            .with("chunkOrigins", true)
            .with("depth", true)
            .with("env", true)
            .with("reasons", true)
            .with("usedExports", true)
            .with("providedExports", true)
            .with("optimizationBailout", true)
            .with("errorDetails", true)
            .with("publicPath", true)
            .with("logging", "verbose")
            .with("exclude", false)
            .with("maxModules", u64::MAX),
        "detailed" => OptionSet::new()
            .with("entrypoints", true)
            .with("chunkGroups", true)
            .with("chunks", true)
            .with("chunkModules", false)
            .with("chunkOrigins", true)
            .with("depth", true)
            .with("usedExports", true)
            .with("providedExports", true)
            .with("optimizationBailout", true)
            .with("errorDetails", true)
            .with("publicPath", true)
            .with("logging", true)
            .with("exclude", false)
            .with("maxModules", u64::MAX),
        "minimal" => OptionSet::new()
            .with("all", false)
            .with("modules", true)
            .with("maxModules", 0)
            .with("errors", true)
            .with("warnings", true)
            .with("logging", "warn"),
        "errors-only" => OptionSet::new()
            .with("all", false)
            .with("errors", true)
            .with("moduleTrace", true)
            .with("logging", "error"),
        "errors-warnings" => OptionSet::new()
            .with("all", false)
            .with("errors", true)
            .with("warnings", true)
            .with("logging", "warn"),
        _ => OptionSet::new(),
    }
}

/// Derive the options one child should render with.
///
/// A `children` array supplies the inner options by position, a `children`
/// object supplies them for every child. Without inner options the shared set
/// is returned as is; otherwise the shared set minus `children` is overlaid
/// with the inner options.
pub fn child_options(options: &OptionSet, index: usize) -> OptionSet {
    let inner = match &options.children {
        Some(ChildrenOption::PerChild(entries)) => entries.get(index).cloned().flatten(),
        Some(ChildrenOption::Shared(set)) => Some(OptionsInput::Set(set.as_ref().clone())),
        Some(ChildrenOption::Flag(_)) | None => None,
    };

    let Some(inner) = inner else {
        return options.clone();
    };

    debug!("Deriving inner options for child #{}", index);

    let mut derived = options.clone();
    derived.children = None;
    derived.merge(inner.normalize());
    derived
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_toggle_resolve() {
        assert!(Toggle::Auto.resolve(|| true));
        assert!(!Toggle::Auto.resolve(|| false));
        assert!(Toggle::On.resolve(|| false));
        assert!(!Toggle::Off.resolve(|| true));
    }

    #[test]
    fn test_parse_option_set() {
        let set: OptionSet = serde_json::from_value(json!({
            "version": false,
            "colors": true,
            "modules": false,
            "logging": "warn"
        }))
        .unwrap();

        assert_eq!(set.version, Toggle::Off);
        assert_eq!(set.hash, Toggle::Auto);
        assert_eq!(set.colors, Some(true));
        assert!(set.children.is_none());
        assert_eq!(set.flag("modules"), Some(false));
        assert_eq!(set.other.get("logging"), Some(&json!("warn")));
    }

    #[test]
    fn test_parse_children_forms() {
        let hidden: OptionSet = serde_json::from_value(json!({ "children": false })).unwrap();
        assert!(hidden.hides_children());

        let shared: OptionSet =
            serde_json::from_value(json!({ "children": { "hash": false } })).unwrap();
        assert!(matches!(shared.children, Some(ChildrenOption::Shared(_))));
        assert!(!shared.hides_children());

        let per_child: OptionSet =
            serde_json::from_value(json!({ "children": ["minimal", false, { "hash": true }] }))
                .unwrap();
        match per_child.children {
            Some(ChildrenOption::PerChild(entries)) => {
                assert_eq!(entries.len(), 3);
                assert_eq!(entries[0], Some(OptionsInput::Preset("minimal".to_string())));
                assert_eq!(entries[1], Some(OptionsInput::Flag(false)));
            }
            other => panic!("unexpected children option: {:?}", other),
        }
    }

    #[test]
    fn test_serialize_skips_unset_keys() {
        let set = OptionSet::new().with("hash", true).with("modules", false);
        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(value, json!({ "hash": true, "modules": false }));
    }

    #[test]
    fn test_insert_routes_known_keys() {
        let set = OptionSet::new()
            .with("version", false)
            .with("colors", true)
            .with("children", false);

        assert_eq!(set.version, Toggle::Off);
        assert_eq!(set.colors, Some(true));
        assert!(set.hides_children());
        assert!(set.other.is_empty());
    }

    #[test]
    fn test_presets() {
        assert_eq!(preset_to_options("none").flag("all"), Some(false));
        assert_eq!(preset_to_options("").flag("all"), Some(false));
        assert_eq!(preset_to_options("unknown-preset"), OptionSet::default());

        let errors_only = preset_to_options("Errors-Only");
        assert_eq!(errors_only.flag("errors"), Some(true));
        assert_eq!(errors_only.flag("moduleTrace"), Some(true));
        assert_eq!(errors_only.flag("warnings"), None);

        let verbose = preset_to_options("verbose");
        assert_eq!(verbose.flag("errorDetails"), Some(true));
        assert_eq!(verbose.other.get("maxModules"), Some(&json!(u64::MAX)));

        let minimal = preset_to_options("minimal");
        assert_eq!(minimal.other.get("maxModules"), Some(&json!(0)));
    }

    #[test]
    fn test_normalize_input() {
        assert_eq!(OptionsInput::from(true).normalize(), OptionSet::default());
        assert_eq!(
            OptionsInput::from(false).normalize(),
            preset_to_options("none")
        );
        assert_eq!(
            OptionsInput::from("errors-warnings").normalize(),
            preset_to_options("errors-warnings")
        );
        assert_eq!(
            OptionsInput::from(None::<OptionSet>).normalize(),
            OptionSet::default()
        );

        let set = OptionSet::new().with("hash", false);
        assert_eq!(OptionsInput::from(set.clone()).normalize(), set);
    }

    #[test]
    fn test_child_options_without_inner_returns_shared() {
        let options = OptionSet::new().with("modules", false).with("children", true);
        assert_eq!(child_options(&options, 0), options);
        assert_eq!(child_options(&options, 5), options);

        let plain = OptionSet::new().with("hash", false);
        assert_eq!(child_options(&plain, 1), plain);
    }

    #[test]
    fn test_child_options_shared_object() {
        let options: OptionSet = serde_json::from_value(json!({
            "hash": false,
            "modules": true,
            "children": { "modules": false, "version": false }
        }))
        .unwrap();

        for index in 0..3 {
            let derived = child_options(&options, index);
            assert!(derived.children.is_none());
            assert_eq!(derived.hash, Toggle::Off);
            assert_eq!(derived.version, Toggle::Off);
            assert_eq!(derived.flag("modules"), Some(false));
        }
    }

    #[test]
    fn test_child_options_per_child_array() {
        let options: OptionSet = serde_json::from_value(json!({
            "colors": true,
            "children": ["errors-only", { "hash": true }]
        }))
        .unwrap();

        let first = child_options(&options, 0);
        assert_eq!(first.flag("all"), Some(false));
        assert_eq!(first.flag("errors"), Some(true));
        assert_eq!(first.colors, Some(true));
        assert!(first.children.is_none());

        let second = child_options(&options, 1);
        assert_eq!(second.hash, Toggle::On);
        assert_eq!(second.flag("all"), None);

        // Past the end of the array the shared set is used unchanged.
        assert_eq!(child_options(&options, 2), options);
    }

    #[test]
    fn test_child_options_null_entry() {
        let options: OptionSet = serde_json::from_value(json!({
            "modules": false,
            "children": [null, { "modules": true }]
        }))
        .unwrap();

        assert_eq!(child_options(&options, 0), options);

        let second = child_options(&options, 1);
        assert_eq!(second.flag("modules"), Some(true));
        assert!(second.children.is_none());
    }
}
