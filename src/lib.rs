//! Codetree - control-structure summaries of source code.
//!
//! Codetree parses a source file with tree-sitter, finds every function and
//! reduces its body to a tree of control structures: `if`, `switch`/`case`,
//! `for`, `while`, `doWhile`, and the plain instructions between them. Each
//! node keeps the source text of its test expression or statement.
//!
//! # Architecture
//!
//! - `parser`: grammar profiles per language and tree-sitter parsing
//! - `tree`: summary node model, function locator and control tree builder
//! - `transform`: source in, outline out (single text or files on disk)
//! - `server`: blocking HTTP service exposing `POST /tree/{language}`
//! - `config`: YAML server configuration
//! - `report`: pretty and JSON output for the CLI
//!
//! # Adding a New Language
//!
//! See `src/parser/languages/` for examples. Describe the grammar's function
//! kinds and statement kinds in a `Grammar` and add it to `languages::ALL`.

pub mod cli;
pub mod config;
pub mod parser;
pub mod report;
pub mod server;
pub mod transform;
pub mod tree;

pub use config::ServerConfig;
pub use parser::{for_extension, for_selector, selectors, Grammar, TreeError};
pub use server::Server;
pub use transform::{transform, transform_file, transform_files, FileOutline};
pub use tree::{NodeKind, Outline, SummaryNode, TreeWarning};
