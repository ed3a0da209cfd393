use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single test method selected for re-execution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpecificTestcase {
    pub test_class_name: String,
    pub test_method_name: String,
}

impl SpecificTestcase {
    pub fn new<C: Into<String>, M: Into<String>>(test_class_name: C, test_method_name: M) -> Self {
        Self {
            test_class_name: test_class_name.into(),
            test_method_name: test_method_name.into(),
        }
    }

    /// `Class.method`, the form Gradle's `--tests` filter accepts.
    pub fn filter_pattern(&self) -> String {
        format!("{}.{}", self.test_class_name, self.test_method_name)
    }
}

/// The lookup bag a test run was started with, replayed or overridden on rerun.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    test_task_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    specific_testcases: Option<Vec<SpecificTestcase>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, String>,
}

impl RunContext {
    pub fn new() -> Self {
        Default::default()
    }

    /// A context holding exactly a test task name and a testcase selection.
    pub fn fixed<T: Into<String>>(test_task_name: T, testcases: Vec<SpecificTestcase>) -> Self {
        Self {
            test_task_name: Some(test_task_name.into()),
            specific_testcases: Some(testcases),
            ..Default::default()
        }
    }

    pub fn with_command<T: Into<String>>(mut self, command: T) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_test_task_name<T: Into<String>>(mut self, test_task_name: T) -> Self {
        self.test_task_name = Some(test_task_name.into());
        self
    }

    pub fn with_property<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn test_task_name(&self) -> Option<&str> {
        self.test_task_name.as_deref()
    }

    pub fn specific_testcases(&self) -> Option<&[SpecificTestcase]> {
        self.specific_testcases.as_deref()
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
