use std::path::{Path, PathBuf};

pub const DEFAULT_TEST_TASK_NAME: &str = "test";
const DEFAULT_TEST_RESULTS_DIR: &[&str] = &["build", "test-results"];

/// A Java `Test` task as seen by the project model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaTestTask {
    pub name: String,
    /// Directory the task writes its `TEST-*.xml` reports into, when known.
    pub xml_output_dir: Option<PathBuf>,
}

impl JavaTestTask {
    pub fn new<T: Into<String>>(name: T, xml_output_dir: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            xml_output_dir,
        }
    }

    /// The conventional `test` task of a project that has not been evaluated yet.
    pub fn default_test_model(project_dir: &Path) -> Self {
        let xml_output_dir = DEFAULT_TEST_RESULTS_DIR
            .iter()
            .fold(project_dir.to_path_buf(), |dir, part| dir.join(part));
        Self::new(DEFAULT_TEST_TASK_NAME, Some(xml_output_dir))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JavaModule {
    pub name: String,
    pub test_tasks: Vec<JavaTestTask>,
}

impl JavaModule {
    pub fn try_get_test_model_by_name(&self, name: &str) -> Option<&JavaTestTask> {
        self.test_tasks.iter().find(|task| task.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JavaProjectModel {
    pub main_module: JavaModule,
}

/// The host's handle on a Gradle project.
pub trait GradleProject: Send + Sync {
    fn display_name(&self) -> String;
    fn project_dir(&self) -> &Path;
    fn current_model(&self) -> JavaProjectModel;
}

/// A project whose model is fixed at construction time.
#[derive(Debug, Clone)]
pub struct StaticGradleProject {
    display_name: String,
    project_dir: PathBuf,
    model: JavaProjectModel,
}

impl StaticGradleProject {
    pub fn new<T: Into<String>>(display_name: T, project_dir: PathBuf) -> Self {
        Self {
            display_name: display_name.into(),
            project_dir,
            model: JavaProjectModel::default(),
        }
    }

    pub fn with_test_task(mut self, test_task: JavaTestTask) -> Self {
        self.model.main_module.test_tasks.push(test_task);
        self
    }
}

impl GradleProject for StaticGradleProject {
    fn display_name(&self) -> String {
        self.display_name.clone()
    }

    fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    fn current_model(&self) -> JavaProjectModel {
        self.model.clone()
    }
}
