pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

pub const LOG_FILTER_ENV: &str = "GRADLE_TEST_XML_LOG";
pub const PROJECT_DIR_ENV: &str = "GRADLE_TEST_XML_PROJECT_DIR";
pub const TASK_ENV: &str = "GRADLE_TEST_XML_TASK";
