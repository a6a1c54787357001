use serde::{Deserialize, Deserializer, Serialize};

/// A position in the parent's content-area coordinate space.
///
/// Top-level nodes (projects and unparented components) use absolute canvas
/// coordinates; nested nodes are local to their container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Stored geometry for nodes that carry an explicit size.
///
/// Heights on components and files are derived by the layout pass and only
/// stored here so renderers and the export format can read them back;
/// component width is the one user-chosen dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// The kind of a documented entity.
///
/// Kinds form a fixed containment hierarchy: projects contain components,
/// components contain files, files contain functions. A node's kind is
/// immutable after creation, which is what makes containment cycles
/// impossible — every kind sits at exactly one depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Project,
    Component,
    File,
    Function,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Component => "component",
            Self::File => "file",
            Self::Function => "function",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "project" => Some(Self::Project),
            "component" => Some(Self::Component),
            "file" => Some(Self::File),
            "function" => Some(Self::Function),
            _ => None,
        }
    }

    /// The kind allowed to contain this kind, if any.
    pub fn container(&self) -> Option<NodeKind> {
        match self {
            Self::Project => None,
            Self::Component => Some(Self::Project),
            Self::File => Some(Self::Component),
            Self::Function => Some(Self::File),
        }
    }

    /// Whether a node of this kind must have a parent.
    ///
    /// Components may float at the top level; files and functions may not.
    pub fn parent_required(&self) -> bool {
        matches!(self, Self::File | Self::Function)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown node kind: {s}")))
    }
}

/// How involved a function's logic is. Drives badge color in renderers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    #[default]
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// The language or format a file node documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Typescript,
    Javascript,
    React,
    Python,
    Css,
    Json,
    #[default]
    Other,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Typescript => "typescript",
            Self::Javascript => "javascript",
            Self::React => "react",
            Self::Python => "python",
            Self::Css => "css",
            Self::Json => "json",
            Self::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "typescript" => Some(Self::Typescript),
            "javascript" => Some(Self::Javascript),
            "react" => Some(Self::React),
            "python" => Some(Self::Python),
            "css" => Some(Self::Css),
            "json" => Some(Self::Json),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Maturity of a component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Planning,
    InProgress,
    Stable,
    Deprecated,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::InProgress => "in-progress",
            Self::Stable => "stable",
            Self::Deprecated => "deprecated",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "planning" => Some(Self::Planning),
            "in-progress" => Some(Self::InProgress),
            "stable" => Some(Self::Stable),
            "deprecated" => Some(Self::Deprecated),
            _ => None,
        }
    }
}

/// Lifecycle stage of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Concept,
    Development,
    Production,
    Maintenance,
    Idea,
    Prototyping,
    Archived,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concept => "concept",
            Self::Development => "development",
            Self::Production => "production",
            Self::Maintenance => "maintenance",
            Self::Idea => "idea",
            Self::Prototyping => "prototyping",
            Self::Archived => "archived",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "concept" => Some(Self::Concept),
            "development" => Some(Self::Development),
            "production" => Some(Self::Production),
            "maintenance" => Some(Self::Maintenance),
            "idea" => Some(Self::Idea),
            "prototyping" => Some(Self::Prototyping),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

// Enum fields in imported or hand-edited files may carry stale values.
// Coerce to the default instead of rejecting the whole document.
macro_rules! coerce_on_deserialize {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Ok(Self::from_str(&s).unwrap_or_else(|| {
                    tracing::warn!("unknown {} {:?}, using default", $name, s);
                    Self::default()
                }))
            }
        }
    )*};
}

coerce_on_deserialize! {
    Complexity => "complexity",
    FileType => "file type",
    Status => "status",
    Stage => "stage",
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// The annotation bag attached to every node.
///
/// Which fields are meaningful depends on the node kind (exports belong to
/// files, params/returns/complexity to functions, tech stack and status to
/// components, stage to projects), but the bag is one shape so partial
/// updates and the file format stay uniform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeData {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exports: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tech_stack: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    /// Files only: collapsed files hide their functions without deleting them.
    #[serde(skip_serializing_if = "is_false")]
    pub collapsed: bool,
}

impl NodeData {
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

/// Partial update for a node's annotation bag. All fields are optional;
/// only present fields are merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodePatch {
    pub label: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub complexity: Option<Complexity>,
    pub file_type: Option<FileType>,
    pub exports: Option<Vec<String>>,
    pub params: Option<Vec<String>>,
    pub returns: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub status: Option<Status>,
    pub stage: Option<Stage>,
    pub collapsed: Option<bool>,
}

/// One documented entity on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Weak back-reference to the containing node. Never an owning link;
    /// the store resolves it by id lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
    #[serde(default)]
    pub data: NodeData,
    /// Transient UI selection flag. Never serialized and ignored by
    /// history snapshots.
    #[serde(skip)]
    pub selected: bool,
}

impl Node {
    pub fn width(&self) -> Option<f64> {
        self.style.and_then(|s| s.width)
    }

    pub fn height(&self) -> Option<f64> {
        self.style.and_then(|s| s.height)
    }

    pub fn set_width(&mut self, width: f64) {
        self.style.get_or_insert_with(NodeStyle::default).width = Some(width);
    }

    pub fn set_height(&mut self, height: f64) {
        self.style.get_or_insert_with(NodeStyle::default).height = Some(height);
    }
}
