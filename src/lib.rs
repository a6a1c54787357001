//! devnotes — a hierarchical diagram engine for visually documenting
//! codebases.
//!
//! Projects contain components, components contain files, files contain
//! functions; typed edges connect any of them. This crate is the state
//! core behind that picture: the flat node/edge store with containment
//! rules, the layout pass that keeps containers sized to their contents,
//! the debounced undo/redo journal, input sanitization, and the versioned
//! `*.diagram.json` import/export format. Rendering, persistence, and the
//! rest of the interactive surface live in host applications that drive
//! the [`engine::Diagram`] facade.
//!
//! ```
//! use devnotes::engine::Diagram;
//! use devnotes::models::NodeKind;
//!
//! let mut diagram = Diagram::new();
//! let component = diagram.create(NodeKind::Component, None).unwrap();
//! let file = diagram.create(NodeKind::File, Some(&component)).unwrap();
//! diagram.create(NodeKind::Function, Some(&file)).unwrap();
//!
//! // The component's height grew to fit the file and its function.
//! assert!(diagram.store().node(&component).unwrap().height().unwrap() >= 200.0);
//! ```

pub mod engine;
pub mod error;
pub mod history;
pub mod layout;
pub mod models;
pub mod render;
pub mod sanitize;
pub mod serialize;
pub mod store;
pub mod validate;

pub use engine::Diagram;
pub use error::GraphError;
pub use store::GraphStore;
