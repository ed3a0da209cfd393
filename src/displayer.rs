use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    context::RunContext,
    dispatch::ActionDispatcher,
    junit::{
        reader::{ParserOptions, ReportError, ReportReader},
        suite_handler::SuiteContentHandler,
    },
    project::GradleProject,
    report_dir,
    rerun::TestTaskRerunHandler,
    session::TestSession,
};

/// Shows the XML reports of one Gradle test task in a test-results session.
pub struct TestXmlDisplayer {
    project: Arc<dyn GradleProject>,
    dispatcher: Arc<dyn ActionDispatcher>,
    test_name: String,
    parser_options: ParserOptions,
}

impl TestXmlDisplayer {
    pub fn new<T: Into<String>>(
        project: Arc<dyn GradleProject>,
        dispatcher: Arc<dyn ActionDispatcher>,
        test_name: T,
    ) -> Self {
        Self {
            project,
            dispatcher,
            test_name: test_name.into(),
            parser_options: ParserOptions::default(),
        }
    }

    pub fn with_parser_options(mut self, parser_options: ParserOptions) -> Self {
        self.parser_options = parser_options;
        self
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    pub fn try_get_report_directory(&self) -> Option<PathBuf> {
        report_dir::try_get_report_directory(self.project.as_ref(), &self.test_name)
    }

    /// Ingests every report of the test task into `session`.
    ///
    /// Returns `false` when there is nothing to show. Files that fail to parse are logged and
    /// skipped; the others are still displayed.
    pub fn display_report<S>(&self, run_context: RunContext, session: &mut S) -> bool
    where
        S: TestSession,
        S::Testcase: 'static,
    {
        let report_files =
            report_dir::get_test_report_files(self.project.as_ref(), &self.test_name);
        if report_files.is_empty() {
            tracing::warn!(
                "Could not find output for test task \"{}\" in {:?}",
                self.test_name,
                self.try_get_report_directory()
            );
            return false;
        }

        let mut reader = match ReportReader::new(self.parser_options) {
            Ok(reader) => reader,
            Err(e) => {
                tracing::warn!("Unexpected parser configuration error: {}", e);
                return false;
            }
        };

        let rerun_handler = TestTaskRerunHandler::new(
            self.project.clone(),
            self.dispatcher.clone(),
            run_context,
            self.test_name.clone(),
            session.testcase_accessor(),
        );
        session.new_session(
            &self.project.display_name(),
            self.project.clone(),
            Arc::new(rerun_handler),
        );

        for report_file in &report_files {
            if let Err(e) = display_test_suite(report_file, &mut reader, session) {
                tracing::info!("Error while parsing {}: {:?}", report_file.display(), e);
            }
        }

        session.end_session();
        true
    }
}

fn display_test_suite<S: TestSession>(
    report_file: &Path,
    reader: &mut ReportReader,
    session: &mut S,
) -> Result<(), ReportError> {
    tracing::debug!("Reading test report {}", report_file.display());
    reader.reset();

    let mut handler = SuiteContentHandler::new(session, report_file);
    let result = reader.parse_file(report_file, &mut handler);
    handler.finish();
    result
}
