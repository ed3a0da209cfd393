use std::sync::Arc;

use crate::{
    context::{RunContext, SpecificTestcase},
    dispatch::{ActionDispatcher, COMMAND_TEST},
    project::GradleProject,
    session::TestcaseAccessor,
};

const ALL_KIND_NAME: &str = "ALL";

/// The kind of rerun the host asks about in [`RerunHandler::enabled`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RerunKind {
    All,
    Custom,
    /// An enumeration value of a host version this crate does not know by type.
    Named(String),
    /// A marker that is not an enumeration value at all.
    Opaque,
}

/// Whether `kind` is the host's "rerun everything" marker.
pub fn is_all_kind(kind: &RerunKind) -> bool {
    match kind {
        RerunKind::All => true,
        RerunKind::Named(name) => name == ALL_KIND_NAME,
        RerunKind::Custom | RerunKind::Opaque => false,
    }
}

pub type ChangeListener = Arc<dyn Fn() + Send + Sync>;

/// Rerun capability the host invokes from its test-results view, possibly from another
/// thread.
pub trait RerunHandler<T>: Send + Sync {
    fn rerun(&self);
    /// Reruns an unordered selection of testcase handles previously emitted by the session.
    fn rerun_tests(&self, tests: &[T]);
    fn enabled(&self, kind: &RerunKind) -> bool;
    fn add_change_listener(&self, listener: ChangeListener);
    fn remove_change_listener(&self, listener: &ChangeListener);
}

/// Reruns a Gradle test task, either with the context it was first run with or narrowed
/// to selected testcases.
pub struct TestTaskRerunHandler<T> {
    project: Arc<dyn GradleProject>,
    dispatcher: Arc<dyn ActionDispatcher>,
    rerun_context: RunContext,
    test_name: String,
    accessor: Arc<dyn TestcaseAccessor<T>>,
}

impl<T> TestTaskRerunHandler<T> {
    pub fn new(
        project: Arc<dyn GradleProject>,
        dispatcher: Arc<dyn ActionDispatcher>,
        rerun_context: RunContext,
        test_name: String,
        accessor: Arc<dyn TestcaseAccessor<T>>,
    ) -> Self {
        Self {
            project,
            dispatcher,
            rerun_context,
            test_name,
            accessor,
        }
    }

    fn specific_testcases(&self, tests: &[T]) -> Vec<SpecificTestcase> {
        tests
            .iter()
            .filter_map(|test| {
                let name = self.accessor.name(test)?;
                let class_name = self.accessor.class_name(test)?;
                Some(SpecificTestcase::new(class_name, name))
            })
            .collect()
    }
}

impl<T> RerunHandler<T> for TestTaskRerunHandler<T> {
    fn rerun(&self) {
        let command = self
            .dispatcher
            .command_str(&self.rerun_context, COMMAND_TEST);
        tracing::info!("Rerunning `{}` for test task {}", command, self.test_name);
        self.dispatcher
            .invoke_action(self.project.as_ref(), &command, &self.rerun_context);
    }

    fn rerun_tests(&self, tests: &[T]) {
        if tests.is_empty() {
            tracing::warn!("Rerun test requested with an empty test set.");
            return;
        }

        let testcases = self.specific_testcases(tests);
        tracing::info!(
            "Rerunning {} selected testcases of test task {}",
            testcases.len(),
            self.test_name
        );
        let context = RunContext::fixed(self.test_name.clone(), testcases);
        self.dispatcher
            .invoke_action(self.project.as_ref(), COMMAND_TEST, &context);
    }

    fn enabled(&self, kind: &RerunKind) -> bool {
        is_all_kind(kind)
    }

    // The rerun state never changes, so listeners are accepted and never notified.
    fn add_change_listener(&self, _listener: ChangeListener) {}

    fn remove_change_listener(&self, _listener: &ChangeListener) {}
}
