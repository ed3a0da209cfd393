use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::project::{GradleProject, JavaTestTask};

const REPORT_FILE_PREFIX: &str = "test-";
const REPORT_FILE_SUFFIX: &str = ".xml";

/// The directory the named test task writes its XML reports into.
///
/// Falls back to the conventional `test` task of the project directory when the current
/// model does not know the task.
pub fn try_get_report_directory(project: &dyn GradleProject, test_name: &str) -> Option<PathBuf> {
    let model = project.current_model();
    match model.main_module.try_get_test_model_by_name(test_name) {
        Some(test_task) => test_task.xml_output_dir.clone(),
        None => JavaTestTask::default_test_model(project.project_dir()).xml_output_dir,
    }
}

pub fn is_report_file_name(file_name: &str) -> bool {
    let file_name = file_name.to_lowercase();
    file_name.starts_with(REPORT_FILE_PREFIX) && file_name.ends_with(REPORT_FILE_SUFFIX)
}

/// Report files of `report_dir`, in directory-listing order.
///
/// A missing or unreadable directory yields no files.
pub fn list_report_files(report_dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(report_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Could not list {}: {}", report_dir.display(), e);
            return Vec::new();
        }
    };

    entries
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .map(is_report_file_name)
                .unwrap_or(false)
        })
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect()
}

pub fn get_test_report_files(project: &dyn GradleProject, test_name: &str) -> Vec<PathBuf> {
    try_get_report_directory(project, test_name)
        .map(|report_dir| list_report_files(&report_dir))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::project::StaticGradleProject;

    #[test]
    fn matches_report_names_case_insensitively() {
        assert!(is_report_file_name("TEST-org.example.FooTest.xml"));
        assert!(is_report_file_name("test-a.xml"));
        assert!(is_report_file_name("Test-a.XML"));
        assert!(!is_report_file_name("a-test-.xml"));
        assert!(!is_report_file_name("TEST-a.xml.bak"));
        assert!(!is_report_file_name("results.xml"));
    }

    #[test]
    fn lists_only_matching_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("TEST-a.xml"), "<testsuite/>").unwrap();
        fs::write(dir.path().join("test-b.XML"), "<testsuite/>").unwrap();
        fs::write(dir.path().join("output.bin"), "").unwrap();
        fs::write(dir.path().join("TEST-c.txt"), "").unwrap();
        fs::create_dir(dir.path().join("TEST-dir.xml")).unwrap();

        let mut names: Vec<String> = list_report_files(dir.path())
            .into_iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();

        assert_eq!(names, vec!["TEST-a.xml", "test-b.XML"]);
    }

    #[test]
    fn missing_directory_yields_no_files() {
        let dir = tempdir().unwrap();
        assert!(list_report_files(&dir.path().join("nope")).is_empty());
    }

    #[test]
    fn uses_model_output_dir_for_known_task() {
        let project = StaticGradleProject::new("app", PathBuf::from("/work/app")).with_test_task(
            JavaTestTask::new("integrationTest", Some(PathBuf::from("/out/it"))),
        );

        assert_eq!(
            try_get_report_directory(&project, "integrationTest"),
            Some(PathBuf::from("/out/it"))
        );
    }

    #[test]
    fn known_task_without_output_dir_has_no_directory() {
        let project = StaticGradleProject::new("app", PathBuf::from("/work/app"))
            .with_test_task(JavaTestTask::new("test", None));

        assert_eq!(try_get_report_directory(&project, "test"), None);
        assert!(get_test_report_files(&project, "test").is_empty());
    }

    #[test]
    fn unknown_task_falls_back_to_default_model() {
        let project = StaticGradleProject::new("app", PathBuf::from("/work/app"));

        assert_eq!(
            try_get_report_directory(&project, "slowTest"),
            Some(PathBuf::from("/work/app/build/test-results"))
        );
    }
}
