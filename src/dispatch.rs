use std::{
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

use serde::Serialize;

use crate::{context::RunContext, project::GradleProject};

pub const COMMAND_TEST: &str = "test";
pub const COMMAND_BUILD: &str = "build";
pub const COMMAND_CLEAN: &str = "clean";
pub const COMMAND_REBUILD: &str = "rebuild";

const TESTS_FILTER_OPTION: &str = "--tests";

/// Runs project actions on behalf of the test-results session.
pub trait ActionDispatcher: Send + Sync {
    /// The command to run for `context`: the command it carries, else `default_command`.
    fn command_str(&self, context: &RunContext, default_command: &str) -> String {
        context.command().unwrap_or(default_command).to_owned()
    }

    fn invoke_action(&self, project: &dyn GradleProject, command: &str, context: &RunContext);
}

/// A Gradle invocation derived from an action and its context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradleInvocation {
    pub project_dir: PathBuf,
    pub args: Vec<String>,
}

impl GradleInvocation {
    pub fn command_line(&self) -> String {
        std::iter::once("gradle")
            .chain(self.args.iter().map(String::as_str))
            .map(quote_arg)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote_arg(arg: &str) -> String {
    if arg.is_empty() || arg.contains(|c: char| c.is_whitespace() || c == '\'') {
        format!("'{}'", arg.replace('\'', r"'\''"))
    } else {
        String::from(arg)
    }
}

/// Derives Gradle command lines from actions and records them.
///
/// Nothing is executed; callers read the recorded invocations back.
#[derive(Debug, Default)]
pub struct GradleCommandDispatcher {
    invocations: Mutex<Vec<GradleInvocation>>,
}

impl GradleCommandDispatcher {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn invocations(&self) -> Vec<GradleInvocation> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn to_invocation(
        project: &dyn GradleProject,
        command: &str,
        context: &RunContext,
    ) -> GradleInvocation {
        let mut args: Vec<String> = match command {
            COMMAND_TEST => {
                vec![context
                    .test_task_name()
                    .unwrap_or(COMMAND_TEST)
                    .to_owned()]
            }
            COMMAND_REBUILD => vec![COMMAND_CLEAN.to_owned(), COMMAND_BUILD.to_owned()],
            other => vec![other.to_owned()],
        };

        for testcase in context.specific_testcases().unwrap_or_default() {
            args.push(TESTS_FILTER_OPTION.to_owned());
            args.push(testcase.filter_pattern());
        }

        GradleInvocation {
            project_dir: project.project_dir().to_path_buf(),
            args,
        }
    }
}

impl ActionDispatcher for GradleCommandDispatcher {
    fn invoke_action(&self, project: &dyn GradleProject, command: &str, context: &RunContext) {
        let invocation = Self::to_invocation(project, command, context);
        tracing::debug!(
            "Dispatching `{}` in {}",
            invocation.command_line(),
            invocation.project_dir.display()
        );
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(invocation);
    }
}
