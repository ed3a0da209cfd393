use std::{borrow::Cow, path::Path};

use quick_xml::events::BytesStart;

use super::{reader::ContentHandler, stack_trace::extract_stack_trace, time::read_millis};
use crate::session::{SessionTestcase, TestSession, TestStatus};

const TAG_TEST_CASE: &[u8] = b"testcase";
const TAG_IGNORED_TEST_CASE: &[u8] = b"ignored-testcase";
const TAG_FAILURE: &[u8] = b"failure";
const TAG_ERROR: &[u8] = b"error";

const FAILURE_CONTENT_CAPACITY: usize = 1024;

/// Translates the elements of one suite report into session calls.
///
/// Everything is keyed on the nesting depth of the element: the root opens a suite, its
/// children are testcases, and their children carry the failure payload. One handler is
/// built per report file.
pub struct SuiteContentHandler<'a, S: TestSession> {
    session: &'a mut S,
    report_file: &'a Path,
    level: usize,
    started_suite: bool,
    suite_time: u64,
    error: bool,
    testcase: Option<S::Testcase>,
    failure_content: Option<String>,
}

impl<'a, S: TestSession> SuiteContentHandler<'a, S> {
    pub fn new(session: &'a mut S, report_file: &'a Path) -> Self {
        Self {
            session,
            report_file,
            level: 0,
            started_suite: false,
            suite_time: 0,
            error: false,
            testcase: None,
            failure_content: None,
        }
    }

    /// Closes the suite if the root element opened one. Returns whether it did.
    pub fn finish(self) -> bool {
        if self.started_suite {
            self.session.end_suite(self.suite_time);
        }
        self.started_suite
    }

    fn start_suite(&mut self, e: &BytesStart<'_>) -> quick_xml::Result<()> {
        let suite_time = read_millis(attr(e, "time")?, 0);

        let name = match attr(e, "name")? {
            Some(name) => name.into_owned(),
            None => self
                .report_file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        self.suite_time = suite_time;
        self.session.new_suite(&name);
        self.started_suite = true;
        Ok(())
    }

    fn try_get_test_case(&mut self, e: &BytesStart<'_>) -> quick_xml::Result<Option<S::Testcase>> {
        let Some(name) = attr(e, "name")? else {
            return Ok(None);
        };
        let class_name = attr(e, "classname")?;
        let time_millis = read_millis(attr(e, "time")?, 0);

        let mut testcase = self.session.new_testcase(&name);
        if let Some(class_name) = class_name {
            testcase.set_class_name(&class_name);
        }
        testcase.set_time_millis(time_millis);

        Ok(Some(testcase))
    }

    fn try_add_test_case(&mut self, e: &BytesStart<'_>) -> quick_xml::Result<()> {
        let status = match e.name().as_ref() {
            TAG_TEST_CASE => TestStatus::Passed,
            TAG_IGNORED_TEST_CASE => TestStatus::Ignored,
            _ => return Ok(()),
        };

        self.testcase = self.try_get_test_case(e)?.map(|mut testcase| {
            testcase.set_status(status);
            testcase
        });
        Ok(())
    }

    fn try_update_test_case(&mut self, e: &BytesStart<'_>) {
        let Some(testcase) = self.testcase.as_mut() else {
            return;
        };

        match e.name().as_ref() {
            TAG_FAILURE => {
                self.error = false;
                testcase.set_status(TestStatus::Failed);
            }
            TAG_ERROR => {
                self.error = true;
                testcase.set_status(TestStatus::Error);
            }
            other => {
                tracing::warn!(
                    "Unexpected element in testcase: {}",
                    String::from_utf8_lossy(other)
                );
                self.error = true;
                testcase.set_status(TestStatus::Error);
            }
        }
        self.failure_content = Some(String::with_capacity(FAILURE_CONTENT_CAPACITY));
    }
}

impl<S: TestSession> ContentHandler for SuiteContentHandler<'_, S> {
    fn start_element(&mut self, element: &BytesStart<'_>) -> quick_xml::Result<()> {
        match self.level {
            0 => self.start_suite(element)?,
            1 => self.try_add_test_case(element)?,
            2 => self.try_update_test_case(element),
            _ => (),
        }

        self.level += 1;
        Ok(())
    }

    fn end_element(&mut self) {
        self.level = self.level.saturating_sub(1);

        match self.level {
            1 => self.testcase = None,
            2 => {
                if let (Some(content), Some(testcase)) =
                    (self.failure_content.take(), self.testcase.as_mut())
                {
                    testcase.set_trouble(self.error, extract_stack_trace(&content));
                }
            }
            _ => (),
        }
    }

    fn characters(&mut self, text: &str) {
        if let Some(content) = self.failure_content.as_mut() {
            content.push_str(text);
        }
    }
}

/// Reads an attribute value. A present attribute that cannot be decoded or unescaped is an
/// error, not an absent one.
fn attr<'e>(e: &'e BytesStart<'e>, name: &str) -> quick_xml::Result<Option<Cow<'e, str>>> {
    e.try_get_attribute(name)?
        .map(|attr| attr.unescape_value())
        .transpose()
}
