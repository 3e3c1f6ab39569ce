//! # block-factory
//!
//! **block-factory** generates the source files of a WordPress block from a
//! single field schema. Authors declare fields (text, images, repeaters, ...)
//! and an HTML template with `{{key}}` tokens; the generator derives the
//! attribute definitions in `block.json`, the editor UI in `edit.js` and the
//! server render template in `render.php`.
//!
//! ## Architecture
//!
//! - **[`registry`]** - closed table of field types: storage type, sidebar control, escaping rule
//! - **[`schema`]** - field schema types and JSON loading
//! - **[`interpolate`]** - token grammar, parsed once and rendered for PHP and JSX
//! - **[`generator`]** - attribute synthesis, sidebar controls, `edit.js`, `render.php`, field reference
//! - **[`linter`]** - schema checks run before anything is written
//! - **[`component`]** - the orchestrator: the only module that touches the filesystem
//! - **[`config`]** - `block-factory.toml` project settings
//! - **[`hot_reload`]** - regenerate on schema changes
//! - **[`cli`]** - the `block-factory` binary
//!
//! ### Save Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(block-factory save)
//!     participant Orch as component::save_schema
//!     participant Lint as linter
//!     participant Gen as generator
//!     participant FS as File System
//!
//!     User->>CLI: save hero --schema hero.json
//!     CLI->>Orch: save_schema(config, "hero", raw)
//!     Orch->>Orch: validate slug, claim single-flight guard
//!     Orch->>Lint: lint_schema(schema)
//!     alt Error-level issues
//!         Lint-->>CLI: GenerateError::Rejected (nothing written)
//!     end
//!     Orch->>FS: read block.json
//!     Orch->>Gen: generate_artifacts(slug, schema, metadata)
//!     Gen->>Gen: merge attributes
//!     Gen->>Gen: build sidebar controls + capability imports
//!     Gen->>Gen: parse template once, render PHP and JSX
//!     Gen-->>Orch: GeneratedArtifacts
//!     Orch->>FS: write config.json, block.json, edit.js,<br/>render.php, style.scss, fields.md
//!     Orch-->>CLI: GenerationReport
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use block_factory::component::{create_component, save_schema};
//! use block_factory::config::FactoryConfig;
//!
//! let config = FactoryConfig::load(None)?;
//! create_component(&config, "Hero Banner", None)?;
//! let report = save_schema(
//!     &config,
//!     "hero-banner",
//!     r#"{"fields":[{"key":"title","label":"Title","type":"text"}],
//!         "template":"<h2>{{title}}</h2>"}"#,
//! )?;
//! println!("{:?}", report.outcome);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Generated Component
//!
//! ```text
//! blocks/hero-banner/
//! ├── config.json     # the schema
//! ├── block.json      # metadata + generated attributes
//! ├── edit.js         # sidebar controls and live preview
//! ├── render.php      # escaped server output
//! ├── style.scss      # schema css
//! ├── fields.md       # token reference
//! ├── index.js        # registration (scaffolded once)
//! ├── save.js         # returns null (server rendered)
//! └── editor.scss     # editor-only styles
//! ```
//!
//! Generation is deterministic: the same schema and metadata always produce
//! byte-identical artifacts.

pub mod capability;
pub mod cli;
pub mod component;
pub mod config;
pub mod error;
pub mod generator;
pub mod hot_reload;
pub mod interpolate;
pub mod linter;
pub mod logging;
pub mod registry;
pub mod schema;

pub use component::{GenerationReport, Outcome};
pub use config::FactoryConfig;
pub use error::{GenerateError, GenerateWarning};
pub use registry::FieldRegistry;
pub use schema::{parse_schema, Field, FieldSchema, FieldType};
