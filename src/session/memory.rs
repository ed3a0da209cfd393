use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use super::{SessionTestcase, TestSession, TestStatus, TestcaseAccessor, Trouble};
use crate::{
    project::GradleProject,
    rerun::{RerunHandler, RerunKind},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestcaseRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub time_millis: u64,
    pub status: TestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trouble: Option<Trouble>,
}

impl TestcaseRecord {
    fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            class_name: None,
            time_millis: 0,
            status: TestStatus::Passed,
            trouble: None,
        }
    }
}

/// Shared handle on a testcase held by an [`InMemorySession`].
#[derive(Debug, Clone)]
pub struct TestcaseRef(Arc<Mutex<TestcaseRecord>>);

impl TestcaseRef {
    fn lock(&self) -> MutexGuard<'_, TestcaseRecord> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> TestcaseRecord {
        self.lock().clone()
    }

    pub fn status(&self) -> TestStatus {
        self.lock().status
    }
}

impl SessionTestcase for TestcaseRef {
    fn set_class_name(&mut self, class_name: &str) {
        self.lock().class_name = Some(String::from(class_name));
    }

    fn set_time_millis(&mut self, millis: u64) {
        self.lock().time_millis = millis;
    }

    fn set_status(&mut self, status: TestStatus) {
        self.lock().status = status;
    }

    fn set_trouble(&mut self, is_error: bool, stack_lines: Vec<String>) {
        self.lock().trouble = Some(Trouble {
            is_error,
            stack_lines,
        });
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryTestcaseAccessor;

impl TestcaseAccessor<TestcaseRef> for InMemoryTestcaseAccessor {
    fn name(&self, testcase: &TestcaseRef) -> Option<String> {
        Some(testcase.lock().name.clone())
    }

    fn class_name(&self, testcase: &TestcaseRef) -> Option<String> {
        testcase.lock().class_name.clone()
    }
}

#[derive(Debug, Clone)]
struct SuiteEntry {
    name: String,
    time_millis: Option<u64>,
    testcases: Vec<TestcaseRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    pub name: String,
    /// `None` while the suite has not been ended.
    pub time_millis: Option<u64>,
    pub testcases: Vec<TestcaseRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub passed: usize,
    pub ignored: usize,
    pub failed: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.passed + self.ignored + self.failed + self.error
    }

    pub fn has_failures(&self) -> bool {
        self.failed + self.error > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub project_name: Option<String>,
    pub ended: bool,
    pub counts: StatusCounts,
    pub suites: Vec<SuiteReport>,
}

/// A [`TestSession`] that keeps everything it is told in memory.
#[derive(Default)]
pub struct InMemorySession {
    project_name: Option<String>,
    rerun_handler: Option<Arc<dyn RerunHandler<TestcaseRef>>>,
    suites: Vec<SuiteEntry>,
    ended: bool,
}

impl InMemorySession {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn rerun_handler(&self) -> Option<&Arc<dyn RerunHandler<TestcaseRef>>> {
        self.rerun_handler.as_ref()
    }

    pub fn testcases(&self) -> impl Iterator<Item = &TestcaseRef> {
        self.suites.iter().flat_map(|suite| suite.testcases.iter())
    }

    /// Failed and errored testcases, the selection offered for a partial rerun.
    pub fn failed_testcases(&self) -> Vec<TestcaseRef> {
        self.testcases()
            .filter(|testcase| testcase.status().is_failure())
            .cloned()
            .collect()
    }

    /// Reruns the failed testcases, or the whole task when asked for everything.
    ///
    /// `RerunKind::All` replays the task; any other kind, `RerunKind::Custom` included,
    /// selects the failed and errored testcases.
    ///
    /// Returns `false` when no session has been opened or nothing matched.
    pub fn rerun(&self, kind: &RerunKind) -> bool {
        let Some(handler) = self.rerun_handler.as_ref() else {
            return false;
        };

        if handler.enabled(kind) {
            handler.rerun();
            return true;
        }

        let failed = self.failed_testcases();
        if failed.is_empty() {
            return false;
        }
        handler.rerun_tests(&failed);
        true
    }

    pub fn counts(&self) -> StatusCounts {
        self.testcases()
            .fold(StatusCounts::default(), |mut counts, testcase| {
                match testcase.status() {
                    TestStatus::Passed => counts.passed += 1,
                    TestStatus::Ignored => counts.ignored += 1,
                    TestStatus::Failed => counts.failed += 1,
                    TestStatus::Error => counts.error += 1,
                }
                counts
            })
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            project_name: self.project_name.clone(),
            ended: self.ended,
            counts: self.counts(),
            suites: self
                .suites
                .iter()
                .map(|suite| SuiteReport {
                    name: suite.name.clone(),
                    time_millis: suite.time_millis,
                    testcases: suite.testcases.iter().map(TestcaseRef::snapshot).collect(),
                })
                .collect(),
        }
    }
}

impl TestSession for InMemorySession {
    type Testcase = TestcaseRef;

    fn new_session(
        &mut self,
        project_name: &str,
        _project: Arc<dyn GradleProject>,
        rerun_handler: Arc<dyn RerunHandler<TestcaseRef>>,
    ) {
        self.project_name = Some(String::from(project_name));
        self.rerun_handler = Some(rerun_handler);
        self.suites.clear();
        self.ended = false;
    }

    fn new_suite(&mut self, name: &str) {
        self.suites.push(SuiteEntry {
            name: String::from(name),
            time_millis: None,
            testcases: Vec::new(),
        });
    }

    fn end_suite(&mut self, total_millis: u64) {
        if let Some(suite) = self.suites.last_mut() {
            suite.time_millis = Some(total_millis);
        }
    }

    fn new_testcase(&mut self, name: &str) -> TestcaseRef {
        let testcase = TestcaseRef(Arc::new(Mutex::new(TestcaseRecord::new(name))));
        if self.suites.is_empty() {
            self.new_suite("");
        }
        if let Some(suite) = self.suites.last_mut() {
            suite.testcases.push(testcase.clone());
        }
        testcase
    }

    fn end_session(&mut self) {
        self.ended = true;
    }

    fn testcase_accessor(&self) -> Arc<dyn TestcaseAccessor<TestcaseRef>> {
        Arc::new(InMemoryTestcaseAccessor)
    }
}
