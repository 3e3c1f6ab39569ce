//! # CLI Module
//!
//! Command-line front end for the component orchestrator.
//!
//! ## Commands
//!
//! ### `create`
//!
//! Scaffold a component from a display name and generate its first artifacts:
//!
//! ```bash
//! block-factory create "Hero Banner" --icon cover-image
//! ```
//!
//! ### `save`
//!
//! Replace a component's schema and regenerate everything:
//!
//! ```bash
//! block-factory save hero-banner --schema hero.json
//! ```
//!
//! ### `generate`
//!
//! Regenerate from the persisted schema. Without a slug every component is
//! processed; components whose outputs are newer than their schema are
//! skipped unless `--force` is given.
//!
//! ### `lint`
//!
//! Check a schema without writing anything:
//!
//! ```bash
//! block-factory lint hero-banner --fail-on-error
//! block-factory lint --schema draft.json
//! ```
//!
//! ### `delete`, `build`, `watch`, `cheatsheet`
//!
//! Remove a component and its build output, run the asset build, regenerate
//! on schema changes, print a component's token reference.
//!
//! ## Global Options
//!
//! - `--config <FILE>` - project config, default `./block-factory.toml`
//! - `--blocks-dir`, `--build-dir`, `--namespace` - override the config
//! - `-v, --verbose` - debug logging

mod commands;


pub use commands::{execute, run_cli, Cli, Commands};
