use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use gradle_test_xml::{
    context::RunContext,
    dispatch::ActionDispatcher,
    project::{GradleProject, JavaTestTask, StaticGradleProject},
    rerun::RerunHandler,
    session::{SessionTestcase, TestSession, TestStatus, TestcaseAccessor},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    NewSession(String),
    NewSuite(String),
    EndSuite(u64),
    NewTestcase(String),
    SetClassName(String),
    SetTimeMillis(u64),
    SetStatus(TestStatus),
    SetTrouble(bool, Vec<String>),
    EndSession,
}

type EventLog = Arc<Mutex<Vec<SessionEvent>>>;

#[derive(Debug, Clone)]
pub struct RecordedTestcase {
    name: String,
    class_name: Arc<Mutex<Option<String>>>,
    events: EventLog,
}

impl RecordedTestcase {
    fn record(&self, event: SessionEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl SessionTestcase for RecordedTestcase {
    fn set_class_name(&mut self, class_name: &str) {
        *self.class_name.lock().unwrap() = Some(String::from(class_name));
        self.record(SessionEvent::SetClassName(String::from(class_name)));
    }

    fn set_time_millis(&mut self, millis: u64) {
        self.record(SessionEvent::SetTimeMillis(millis));
    }

    fn set_status(&mut self, status: TestStatus) {
        self.record(SessionEvent::SetStatus(status));
    }

    fn set_trouble(&mut self, is_error: bool, stack_lines: Vec<String>) {
        self.record(SessionEvent::SetTrouble(is_error, stack_lines));
    }
}

pub struct RecordedTestcaseAccessor;

impl TestcaseAccessor<RecordedTestcase> for RecordedTestcaseAccessor {
    fn name(&self, testcase: &RecordedTestcase) -> Option<String> {
        Some(testcase.name.clone())
    }

    fn class_name(&self, testcase: &RecordedTestcase) -> Option<String> {
        testcase.class_name.lock().unwrap().clone()
    }
}

/// Records every session call, in order.
#[derive(Default)]
pub struct RecordingSession {
    events: EventLog,
    testcases: Vec<RecordedTestcase>,
    rerun_handler: Option<Arc<dyn RerunHandler<RecordedTestcase>>>,
}

impl RecordingSession {
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn testcases(&self) -> &[RecordedTestcase] {
        &self.testcases
    }

    pub fn rerun_handler(&self) -> Arc<dyn RerunHandler<RecordedTestcase>> {
        self.rerun_handler.clone().expect("no session was opened")
    }

    pub fn count(&self, matches: impl Fn(&SessionEvent) -> bool) -> usize {
        self.events().iter().filter(|event| matches(*event)).count()
    }

    fn record(&self, event: SessionEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl TestSession for RecordingSession {
    type Testcase = RecordedTestcase;

    fn new_session(
        &mut self,
        project_name: &str,
        _project: Arc<dyn GradleProject>,
        rerun_handler: Arc<dyn RerunHandler<RecordedTestcase>>,
    ) {
        self.rerun_handler = Some(rerun_handler);
        self.record(SessionEvent::NewSession(String::from(project_name)));
    }

    fn new_suite(&mut self, name: &str) {
        self.record(SessionEvent::NewSuite(String::from(name)));
    }

    fn end_suite(&mut self, total_millis: u64) {
        self.record(SessionEvent::EndSuite(total_millis));
    }

    fn new_testcase(&mut self, name: &str) -> RecordedTestcase {
        self.record(SessionEvent::NewTestcase(String::from(name)));
        let testcase = RecordedTestcase {
            name: String::from(name),
            class_name: Arc::new(Mutex::new(None)),
            events: self.events.clone(),
        };
        self.testcases.push(testcase.clone());
        testcase
    }

    fn end_session(&mut self) {
        self.record(SessionEvent::EndSession);
    }

    fn testcase_accessor(&self) -> Arc<dyn TestcaseAccessor<RecordedTestcase>> {
        Arc::new(RecordedTestcaseAccessor)
    }
}

#[derive(Default)]
pub struct RecordingDispatcher {
    actions: Mutex<Vec<(String, RunContext)>>,
}

impl RecordingDispatcher {
    pub fn actions(&self) -> Vec<(String, RunContext)> {
        self.actions.lock().unwrap().clone()
    }
}

impl ActionDispatcher for RecordingDispatcher {
    fn invoke_action(&self, _project: &dyn GradleProject, command: &str, context: &RunContext) {
        self.actions
            .lock()
            .unwrap()
            .push((String::from(command), context.clone()));
    }
}

/// A project named `app` whose `test` task reports into `report_dir`.
pub fn project_with_reports(report_dir: PathBuf) -> Arc<StaticGradleProject> {
    let project_dir = report_dir
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| report_dir.clone());
    Arc::new(
        StaticGradleProject::new("app", project_dir)
            .with_test_task(JavaTestTask::new("test", Some(report_dir))),
    )
}
