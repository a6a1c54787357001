use serde::{Deserialize, Deserializer, Serialize};

/// The relationship a connection documents.
///
/// Each kind carries a default label, stroke color, and animation flag that
/// new edges of that kind start out with; both label and style can be
/// overridden per edge afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Default,
    Imports,
    Extends,
    Dependency,
}

/// Presentation defaults associated with an edge kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeConfig {
    pub label: &'static str,
    pub color: &'static str,
    pub animated: bool,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Imports => "imports",
            Self::Extends => "extends",
            Self::Dependency => "dependency",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "default" => Some(Self::Default),
            "imports" => Some(Self::Imports),
            "extends" => Some(Self::Extends),
            "dependency" => Some(Self::Dependency),
            _ => None,
        }
    }

    pub fn config(&self) -> EdgeConfig {
        match self {
            Self::Default => EdgeConfig {
                label: "calls",
                color: "#6366f1",
                animated: true,
            },
            Self::Imports => EdgeConfig {
                label: "imports",
                color: "#8b5cf6",
                animated: false,
            },
            Self::Extends => EdgeConfig {
                label: "extends",
                color: "#ec4899",
                animated: false,
            },
            Self::Dependency => EdgeConfig {
                label: "depends on",
                color: "#14b8a6",
                animated: true,
            },
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EdgeKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_str(&s).unwrap_or_else(|| {
            tracing::warn!("unknown edge kind {:?}, using default", s);
            Self::default()
        }))
    }
}

/// Per-edge overrides for the kind's default label and color.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Per-edge stroke style override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A directed, typed relationship between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default)]
    pub kind: EdgeKind,
    #[serde(default, skip_serializing_if = "is_false")]
    pub animated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EdgeData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<EdgeStyle>,
}

impl Edge {
    /// The label shown on this edge: the override if present, otherwise
    /// the kind's default.
    pub fn label(&self) -> &str {
        self.data
            .as_ref()
            .and_then(|d| d.label.as_deref())
            .unwrap_or_else(|| self.kind.config().label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_edge_kind_coerces_to_default() {
        let edge: Edge = serde_json::from_str(
            r#"{"id":"e1","source":"a","target":"b","type":"teleports"}"#,
        )
        .unwrap();
        assert_eq!(edge.kind, EdgeKind::Default);
    }

    #[test]
    fn label_falls_back_to_kind_default() {
        let edge: Edge =
            serde_json::from_str(r#"{"id":"e1","source":"a","target":"b","type":"imports"}"#)
                .unwrap();
        assert_eq!(edge.label(), "imports");

        let edge: Edge = serde_json::from_str(
            r#"{"id":"e2","source":"a","target":"b","type":"imports","data":{"label":"re-exports"}}"#,
        )
        .unwrap();
        assert_eq!(edge.label(), "re-exports");
    }
}
