// file: src/models/metadata.rs
// description: project metadata record, its enums and the partial form returned by extraction
// reference: internal data structures

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
pub enum DataClassification {
    #[serde(rename = "P3 (Moderate)")]
    #[value(name = "p3")]
    P3,
    #[default]
    #[serde(rename = "P4 (High)")]
    #[value(name = "p4")]
    P4,
    #[serde(rename = "HIPAA")]
    #[value(name = "hipaa")]
    Hipaa,
    #[serde(rename = "CUI")]
    #[value(name = "cui")]
    Cui,
    #[serde(rename = "Export Controlled")]
    #[value(name = "export-controlled")]
    ExportControlled,
}

impl DataClassification {
    pub const ALL: [DataClassification; 5] = [
        Self::P3,
        Self::P4,
        Self::Hipaa,
        Self::Cui,
        Self::ExportControlled,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::P3 => "P3 (Moderate)",
            Self::P4 => "P4 (High)",
            Self::Hipaa => "HIPAA",
            Self::Cui => "CUI",
            Self::ExportControlled => "Export Controlled",
        }
    }
}

impl fmt::Display for DataClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
pub enum InfrastructureType {
    #[default]
    #[serde(rename = "Standalone Workstation")]
    #[value(name = "workstation")]
    Workstation,
    #[serde(rename = "UCR Research Cluster")]
    #[value(name = "cluster")]
    Cluster,
    #[serde(rename = "Cloud (AWS/GCP)")]
    #[value(name = "cloud")]
    Cloud,
    #[serde(rename = "Air-Gapped Server")]
    #[value(name = "air-gap")]
    AirGap,
}

impl InfrastructureType {
    pub const ALL: [InfrastructureType; 4] =
        [Self::Workstation, Self::Cluster, Self::Cloud, Self::AirGap];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Workstation => "Standalone Workstation",
            Self::Cluster => "UCR Research Cluster",
            Self::Cloud => "Cloud (AWS/GCP)",
            Self::AirGap => "Air-Gapped Server",
        }
    }
}

impl fmt::Display for InfrastructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fixed description of the project being planned. Built once per run and
/// only read afterwards, to render the prose summary handed to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub project_name: String,
    pub pi_name: String,
    pub uisl_name: String,
    pub department: String,
    pub classification: DataClassification,
    pub is_cui: bool,
    pub data_provider: String,
    pub infrastructure: InfrastructureType,
    pub os_type: String,
    pub transfer_method: String,
    pub retention_date: String,
    pub destruction_method: String,
}

/// Metadata as extracted from free text: every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PartialMetadata {
    /// Official name of the research project
    pub project_name: Option<String>,
    /// Principal Investigator name
    pub pi_name: Option<String>,
    /// Unit Information Security Lead name
    pub uisl_name: Option<String>,
    /// Research department or unit
    pub department: Option<String>,
    /// Highest data classification level
    pub classification: Option<DataClassification>,
    /// Whether the project involves Controlled Unclassified Information
    pub is_cui: Option<bool>,
    /// External data provider, e.g. NIH
    pub data_provider: Option<String>,
    /// Primary storage infrastructure
    pub infrastructure: Option<InfrastructureType>,
    /// Operating system
    pub os_type: Option<String>,
    /// Data transfer method
    pub transfer_method: Option<String>,
    /// Project end or retention date, YYYY-MM-DD
    pub retention_date: Option<String>,
    /// Data destruction standard
    pub destruction_method: Option<String>,
}

impl PartialMetadata {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self {
            project_name: "My Research Project".to_string(),
            pi_name: "Unknown PI".to_string(),
            uisl_name: "Unknown UISL".to_string(),
            department: "Research Computing".to_string(),
            classification: DataClassification::P4,
            is_cui: false,
            data_provider: "External Agency".to_string(),
            infrastructure: InfrastructureType::Workstation,
            os_type: "Linux".to_string(),
            transfer_method: "Secure Transfer".to_string(),
            retention_date: "2030-01-01".to_string(),
            destruction_method: "DoD Wipe".to_string(),
        }
    }
}

impl ProjectMetadata {
    /// Fills every field the partial record lacks from `defaults`.
    pub fn from_partial(partial: PartialMetadata, defaults: ProjectMetadata) -> Self {
        Self {
            project_name: partial.project_name.unwrap_or(defaults.project_name),
            pi_name: partial.pi_name.unwrap_or(defaults.pi_name),
            uisl_name: partial.uisl_name.unwrap_or(defaults.uisl_name),
            department: partial.department.unwrap_or(defaults.department),
            classification: partial.classification.unwrap_or(defaults.classification),
            is_cui: partial.is_cui.unwrap_or(defaults.is_cui),
            data_provider: partial.data_provider.unwrap_or(defaults.data_provider),
            infrastructure: partial.infrastructure.unwrap_or(defaults.infrastructure),
            os_type: partial.os_type.unwrap_or(defaults.os_type),
            transfer_method: partial.transfer_method.unwrap_or(defaults.transfer_method),
            retention_date: partial.retention_date.unwrap_or(defaults.retention_date),
            destruction_method: partial
                .destruction_method
                .unwrap_or(defaults.destruction_method),
        }
    }

    pub fn to_summary_text(&self) -> String {
        format!(
            "**Project Identity:**\n\
             Project: {}\n\
             PI: {}\n\
             UISL: {}\n\
             Department: {}\n\
             \n\
             **Data Sensitivity:**\n\
             Classification: {}\n\
             CUI: {}\n\
             Data Provider: {}\n\
             \n\
             **Infrastructure:**\n\
             Type: {}\n\
             OS: {}\n\
             Transfer Method: {}\n\
             \n\
             **Lifecycle:**\n\
             Retention Date: {}\n\
             Destruction: {}\n",
            self.project_name,
            self.pi_name,
            self.uisl_name,
            self.department,
            self.classification,
            if self.is_cui { "Yes" } else { "No" },
            self.data_provider,
            self.infrastructure,
            self.os_type,
            self.transfer_method,
            self.retention_date,
            self.destruction_method,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classification_serde_uses_labels() {
        let json = serde_json::to_string(&DataClassification::ExportControlled).unwrap();
        assert_eq!(json, "\"Export Controlled\"");

        let parsed: DataClassification = serde_json::from_str("\"P3 (Moderate)\"").unwrap();
        assert_eq!(parsed, DataClassification::P3);
    }

    #[test]
    fn test_from_partial_fills_missing_fields() {
        let partial = PartialMetadata {
            project_name: Some("Nebula".to_string()),
            is_cui: Some(true),
            infrastructure: Some(InfrastructureType::AirGap),
            ..Default::default()
        };

        let metadata = ProjectMetadata::from_partial(partial, ProjectMetadata::default());

        assert_eq!(metadata.project_name, "Nebula");
        assert!(metadata.is_cui);
        assert_eq!(metadata.infrastructure, InfrastructureType::AirGap);
        assert_eq!(metadata.pi_name, "Unknown PI");
        assert_eq!(metadata.classification, DataClassification::P4);
    }

    #[test]
    fn test_partial_tolerates_missing_keys() {
        let partial: PartialMetadata =
            serde_json::from_str(r#"{"pi_name": "Dr. Vega", "classification": "HIPAA"}"#)
                .unwrap();

        assert_eq!(partial.pi_name.as_deref(), Some("Dr. Vega"));
        assert_eq!(partial.classification, Some(DataClassification::Hipaa));
        assert!(partial.project_name.is_none());
        assert!(!partial.is_empty());
        assert!(PartialMetadata::default().is_empty());
    }

    #[test]
    fn test_summary_text_mentions_every_field() {
        let metadata = ProjectMetadata {
            is_cui: true,
            ..ProjectMetadata::default()
        };
        let summary = metadata.to_summary_text();

        assert!(summary.contains("Project: My Research Project"));
        assert!(summary.contains("Classification: P4 (High)"));
        assert!(summary.contains("CUI: Yes"));
        assert!(summary.contains("Type: Standalone Workstation"));
        assert!(summary.contains("Destruction: DoD Wipe"));
    }
}
