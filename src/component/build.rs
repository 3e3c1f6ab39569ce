//! Running the external asset build.

use super::ComponentState;
use crate::config::FactoryConfig;
use std::process::Command;
use tracing::{info, warn};

/// Result of one build run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// `BuildCompiled` or `BuildFailed`
    pub state: ComponentState,
    pub command: Vec<String>,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl BuildReport {
    pub fn succeeded(&self) -> bool {
        self.state == ComponentState::BuildCompiled
    }

    fn failed(command: &[String], stderr: String) -> Self {
        BuildReport {
            state: ComponentState::BuildFailed,
            command: command.to_vec(),
            exit_code: None,
            stdout: String::new(),
            stderr,
        }
    }
}

/// Run the configured build command in the project root and wait for it.
///
/// A missing program or a non-zero exit is a [`ComponentState::BuildFailed`]
/// report, never an error.
pub fn run_build(config: &FactoryConfig) -> BuildReport {
    let command = &config.build_command;
    let Some((program, args)) = command.split_first() else {
        warn!("build command is empty");
        return BuildReport::failed(command, "build command is empty".to_string());
    };

    info!(command = %command.join(" "), root = %config.project_root.display(), "running build");
    let output = match Command::new(program)
        .args(args)
        .current_dir(&config.project_root)
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            warn!(program = %program, error = %e, "build command could not be started");
            return BuildReport::failed(command, format!("failed to run '{program}': {e}"));
        }
    };

    let state = if output.status.success() {
        info!("build finished");
        ComponentState::BuildCompiled
    } else {
        warn!(code = ?output.status.code(), "build failed");
        ComponentState::BuildFailed
    };
    BuildReport {
        state,
        command: command.clone(),
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
