//! Canonical entity model for component usage payloads.
//!
//! These types mirror the JSON document produced by the usage analyzer
//! after its keys have been normalized to camelCase. They are built by
//! [`super::normalize`] and are read-only afterwards.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name used for components and instances without a package.
pub const NO_PACKAGE: &str = "(no package)";

/// Synthetic prop value standing for "this instance does not set the prop".
pub const NO_VALUE: &str = "(no value)";

/// The full usage payload for one analyzed codebase.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Payload {
    /// Information about the analysis run.
    pub meta: Meta,

    /// Every component discovered, with all of its usage sites.
    pub components: Vec<ComponentRecord>,
}

/// Metadata attached to a payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Meta {
    /// Root directory the analyzer ran against.
    pub base_path: String,
}

/// A component as it arrives on the wire, before any derived data is attached.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComponentRecord {
    pub id: String,
    pub name: String,
    pub package: PackageIdentity,
    pub instances: Vec<Instance>,
}

/// One concrete usage site of a component.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Instance {
    /// File containing the usage.
    pub file_path: String,

    /// Literal JSX source of the usage.
    pub raw: String,

    /// Location of the usage within `file_path`.
    pub span: Span,

    /// Import specifier the component was imported through, if any.
    pub import_specifier: Option<String>,

    /// Module path the import resolved to.
    pub resolved_path: String,

    /// Package the usage site belongs to.
    pub package: PackageIdentity,

    /// Props passed at this usage site, in source order.
    pub props: Vec<Prop>,
}

impl Instance {
    /// Returns the first prop carrying `key`, if any.
    pub fn prop(&self, key: &str) -> Option<&Prop> {
        self.props.iter().find(|p| p.key == key)
    }

    /// Returns true if any prop on this instance carries `key`.
    pub fn has_prop(&self, key: &str) -> bool {
        self.props.iter().any(|p| p.key == key)
    }
}

/// A single prop occurrence on an instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Prop {
    pub key: String,

    /// Literal source text of the prop value.
    pub raw: String,

    /// Syntactic kind inferred by the analyzer (e.g. "string", "expression").
    pub prop_type: String,

    /// Normalized display value, when the analyzer could compute one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Byte offsets and line/column bounds of a usage site.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Span {
    pub start: u64,
    pub end: u64,
    pub start_line: u64,
    pub end_line: u64,
    pub start_col: u64,
    pub end_col: u64,
}

/// The three kinds of package a component can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    /// Host elements such as `div` or `button`.
    Native,
    /// A package that lives inside the analyzed workspace.
    Internal,
    /// A third-party dependency.
    External,
}

impl PackageKind {
    /// Returns the wire tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageKind::Native => "native",
            PackageKind::Internal => "internal",
            PackageKind::External => "external",
        }
    }

    /// Listing priority: external packages first, native elements last.
    pub fn priority(&self) -> u8 {
        match self {
            PackageKind::External => 2,
            PackageKind::Internal => 1,
            PackageKind::Native => 0,
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a component (or a usage site) comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PackageIdentity {
    Native,
    Internal { name: String, version: String },
    External { name: String, version: String },
}

impl PackageIdentity {
    /// Creates an internal package identity.
    pub fn internal(name: impl Into<String>, version: impl Into<String>) -> Self {
        PackageIdentity::Internal {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Creates an external package identity.
    pub fn external(name: impl Into<String>, version: impl Into<String>) -> Self {
        PackageIdentity::External {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn kind(&self) -> PackageKind {
        match self {
            PackageIdentity::Native => PackageKind::Native,
            PackageIdentity::Internal { .. } => PackageKind::Internal,
            PackageIdentity::External { .. } => PackageKind::External,
        }
    }

    /// Package name, or `None` for native elements.
    pub fn name(&self) -> Option<&str> {
        match self {
            PackageIdentity::Native => None,
            PackageIdentity::Internal { name, .. } | PackageIdentity::External { name, .. } => {
                Some(name)
            }
        }
    }

    /// Package version, or `None` for native elements.
    pub fn version(&self) -> Option<&str> {
        match self {
            PackageIdentity::Native => None,
            PackageIdentity::Internal { version, .. }
            | PackageIdentity::External { version, .. } => Some(version),
        }
    }

    /// Name shown in package filters; native elements use [`NO_PACKAGE`].
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or(NO_PACKAGE)
    }

    pub fn is_native(&self) -> bool {
        matches!(self, PackageIdentity::Native)
    }
}

/// Package object as it appears on the wire: a `type` tag plus a name and
/// version that only non-native packages must carry.
#[derive(Deserialize)]
struct WirePackage {
    #[serde(rename = "type")]
    kind: PackageKind,
    name: Option<String>,
    version: Option<String>,
}

impl<'de> Deserialize<'de> for PackageIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let WirePackage {
            kind,
            name,
            version,
        } = WirePackage::deserialize(deserializer)?;

        if kind == PackageKind::Native {
            return Ok(PackageIdentity::Native);
        }

        let name = name.ok_or_else(|| <D::Error as de::Error>::missing_field("name"))?;
        let version = version.ok_or_else(|| <D::Error as de::Error>::missing_field("version"))?;
        Ok(match kind {
            PackageKind::Internal => PackageIdentity::Internal { name, version },
            _ => PackageIdentity::External { name, version },
        })
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageIdentity::Native => write!(f, "native"),
            PackageIdentity::Internal { name, version }
            | PackageIdentity::External { name, version } => write!(f, "{}@{}", name, version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(key: &str, raw: &str) -> Prop {
        Prop {
            key: key.to_string(),
            raw: raw.to_string(),
            prop_type: "string".to_string(),
            value: None,
        }
    }

    #[test]
    fn test_package_kind_priority_order() {
        assert!(PackageKind::External.priority() > PackageKind::Internal.priority());
        assert!(PackageKind::Internal.priority() > PackageKind::Native.priority());
    }

    #[test]
    fn test_package_kind_wire_tags() {
        for kind in [PackageKind::Native, PackageKind::Internal, PackageKind::External] {
            let parsed: PackageKind = serde_json::from_value(serde_json::json!(kind.as_str())).unwrap();
            assert_eq!(parsed, kind);
        }
        assert!(serde_json::from_value::<PackageKind>(serde_json::json!("npm")).is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(PackageIdentity::Native.display_name(), "(no package)");
        assert_eq!(PackageIdentity::external("ui", "1.0.0").display_name(), "ui");
        assert_eq!(PackageIdentity::internal("app", "0.0.1").display_name(), "app");
    }

    #[test]
    fn test_identity_display() {
        assert_eq!(format!("{}", PackageIdentity::Native), "native");
        assert_eq!(
            format!("{}", PackageIdentity::external("ui", "1.0.0")),
            "ui@1.0.0"
        );
    }

    #[test]
    fn test_identity_serializes_with_type_tag() {
        let json = serde_json::to_value(PackageIdentity::external("ui", "1.0.0")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "external", "name": "ui", "version": "1.0.0"})
        );
        let json = serde_json::to_value(PackageIdentity::Native).unwrap();
        assert_eq!(json, serde_json::json!({"type": "native"}));
    }

    #[test]
    fn test_identity_deserializes_from_wire() {
        let ui: PackageIdentity =
            serde_json::from_value(serde_json::json!({"type": "external", "name": "ui", "version": "1.0.0"}))
                .unwrap();
        assert_eq!(ui, PackageIdentity::external("ui", "1.0.0"));

        let native: PackageIdentity =
            serde_json::from_value(serde_json::json!({"type": "native", "name": "ignored"})).unwrap();
        assert_eq!(native, PackageIdentity::Native);

        let err = serde_json::from_value::<PackageIdentity>(serde_json::json!({"type": "internal", "name": "app"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "missing field `version`");
    }

    #[test]
    fn test_instance_prop_lookup_uses_first_occurrence() {
        let instance = Instance {
            file_path: "src/App.tsx".to_string(),
            raw: "<Button />".to_string(),
            span: Span::default(),
            import_specifier: None,
            resolved_path: "ui".to_string(),
            package: PackageIdentity::Native,
            props: vec![prop("size", "\"sm\""), prop("size", "\"lg\"")],
        };

        assert!(instance.has_prop("size"));
        assert!(!instance.has_prop("variant"));
        assert_eq!(instance.prop("size").map(|p| p.raw.as_str()), Some("\"sm\""));
    }
}
