//! Export descriptor domain model

use crate::error::CoreError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of an export definition on the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportId(i64);

impl ExportId {
    /// Creates an export id from its numeric value
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ExportId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for ExportId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| CoreError::InvalidExportId {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for ExportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One exportable dataset as listed by the export service
///
/// The service serializes the SQL view location as `schema`/`view`; the admin
/// model names the same columns `schema_name`/`view_name`, both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDescriptor {
    /// Export identifier
    pub id: ExportId,

    /// Human readable name
    pub label: String,

    /// PostgreSQL schema holding the source view
    #[serde(alias = "schema_name")]
    pub schema: String,

    /// Source SQL view
    #[serde(alias = "view_name")]
    pub view: String,

    /// Free-text description
    #[serde(default, deserialize_with = "null_as_empty")]
    pub desc: String,

    /// Geometry column, if the view has one
    #[serde(default)]
    pub geometry_field: Option<String>,

    /// Spatial reference identifier of the geometry column
    #[serde(default)]
    pub geometry_srid: Option<i32>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ExportDescriptor {
    /// Creates a descriptor without geometry information
    pub fn new(
        id: i64,
        label: impl Into<String>,
        schema: impl Into<String>,
        view: impl Into<String>,
    ) -> Self {
        Self {
            id: ExportId::new(id),
            label: label.into(),
            schema: schema.into(),
            view: view.into(),
            desc: String::new(),
            geometry_field: None,
            geometry_srid: None,
        }
    }

    /// Sets the description
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    /// Sets the geometry column and its SRID
    pub fn with_geometry(mut self, field: impl Into<String>, srid: i32) -> Self {
        self.geometry_field = Some(field.into());
        self.geometry_srid = Some(srid);
        self
    }

    /// Returns true if the export carries a geometry column
    pub fn has_geometry(&self) -> bool {
        self.geometry_field
            .as_deref()
            .is_some_and(|field| !field.trim().is_empty())
    }

    /// Fully qualified `schema.view` name of the source view
    pub fn qualified_view(&self) -> String {
        format!("{}.{}", self.schema, self.view)
    }
}

impl fmt::Display for ExportDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_record() {
        let json = r#"{
            "id": 3,
            "label": "Occurrences",
            "schema": "gn_exports",
            "view": "v_synthese_sinp",
            "desc": "All observations",
            "geometry_field": "geom_4326",
            "geometry_srid": 4326
        }"#;

        let descriptor: ExportDescriptor = serde_json::from_str(json).expect("valid record");
        assert_eq!(descriptor.id, ExportId::new(3));
        assert_eq!(descriptor.label, "Occurrences");
        assert_eq!(descriptor.qualified_view(), "gn_exports.v_synthese_sinp");
        assert_eq!(descriptor.geometry_srid, Some(4326));
        assert!(descriptor.has_geometry());
    }

    #[test]
    fn test_deserialize_admin_column_names() {
        let json = r#"{
            "id": 1,
            "label": "Taxa",
            "schema_name": "taxonomie",
            "view_name": "v_taxref",
            "desc": null,
            "geometry_field": null,
            "geometry_srid": null
        }"#;
        let descriptor: ExportDescriptor = serde_json::from_str(json).expect("valid record");
        assert_eq!(descriptor.schema, "taxonomie");
        assert_eq!(descriptor.view, "v_taxref");
        assert!(descriptor.desc.is_empty());
        assert!(!descriptor.has_geometry());
    }

    #[test]
    fn test_builder_and_display() {
        let descriptor = ExportDescriptor::new(7, "Sites", "gn_exports", "v_sites")
            .with_desc("Monitoring sites")
            .with_geometry("geom", 2154);

        assert_eq!(descriptor.to_string(), "[7] Sites");
        assert_eq!(descriptor.geometry_field.as_deref(), Some("geom"));
        assert_eq!(descriptor.geometry_srid, Some(2154));
    }

    #[test]
    fn test_missing_desc_defaults_to_empty() {
        let json = r#"{"id": 2, "label": "x", "schema": "s", "view": "v"}"#;
        let descriptor: ExportDescriptor = serde_json::from_str(json).expect("valid record");
        assert!(descriptor.desc.is_empty());
        assert_eq!(descriptor.geometry_field, None);
    }

    #[test]
    fn test_export_id_parse() {
        assert_eq!("42".parse::<ExportId>(), Ok(ExportId::new(42)));
        assert_eq!(" 7 ".parse::<ExportId>(), Ok(ExportId::new(7)));
        assert!("seven".parse::<ExportId>().is_err());
    }

    #[test]
    fn test_blank_geometry_field_is_not_geometry() {
        let mut descriptor = ExportDescriptor::new(1, "a", "s", "v");
        descriptor.geometry_field = Some("  ".to_string());
        assert!(!descriptor.has_geometry());
    }
}
