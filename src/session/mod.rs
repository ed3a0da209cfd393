//! The test-results session the report ingestion writes into.
//!
//! All calls on a session come from the thread that runs
//! [`TestXmlDisplayer::display_report`](crate::displayer::TestXmlDisplayer::display_report),
//! in document order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{project::GradleProject, rerun::RerunHandler};

pub mod memory;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    Passed,
    Ignored,
    Failed,
    Error,
}

impl TestStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, TestStatus::Failed | TestStatus::Error)
    }
}

/// Failure or error payload attached to a testcase: the message first, then the frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trouble {
    pub is_error: bool,
    pub stack_lines: Vec<String>,
}

pub trait SessionTestcase {
    fn set_class_name(&mut self, class_name: &str);
    fn set_time_millis(&mut self, millis: u64);
    fn set_status(&mut self, status: TestStatus);
    fn set_trouble(&mut self, is_error: bool, stack_lines: Vec<String>);
}

/// Reads the identity of testcase handles emitted by a session.
///
/// Used by the rerun controller to turn a selection back into `(class, method)` pairs. An
/// accessor that cannot read a value returns `None`.
pub trait TestcaseAccessor<T>: Send + Sync {
    fn name(&self, testcase: &T) -> Option<String>;
    fn class_name(&self, testcase: &T) -> Option<String>;
}

pub trait TestSession {
    type Testcase: SessionTestcase;

    fn new_session(
        &mut self,
        project_name: &str,
        project: Arc<dyn GradleProject>,
        rerun_handler: Arc<dyn RerunHandler<Self::Testcase>>,
    );
    fn new_suite(&mut self, name: &str);
    fn end_suite(&mut self, total_millis: u64);
    fn new_testcase(&mut self, name: &str) -> Self::Testcase;
    fn end_session(&mut self);

    /// Accessor able to read back the handles this session hands out.
    fn testcase_accessor(&self) -> Arc<dyn TestcaseAccessor<Self::Testcase>>;
}
