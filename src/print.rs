use colored::{ColoredString, Colorize};

use crate::{
    dispatch::GradleInvocation,
    session::{
        memory::{SessionReport, TestcaseRecord},
        TestStatus,
    },
};

fn format_millis(millis: u64) -> String {
    format!("{}.{:03}s", millis / 1000, millis % 1000)
}

fn status_label(status: TestStatus) -> ColoredString {
    match status {
        TestStatus::Passed => "PASSED ".green(),
        TestStatus::Ignored => "IGNORED".yellow(),
        TestStatus::Failed => "FAILED ".red(),
        TestStatus::Error => "ERROR  ".red().bold(),
    }
}

fn testcase_lines(testcase: &TestcaseRecord) -> Vec<String> {
    let qualified_name = match &testcase.class_name {
        Some(class_name) => format!("{}.{}", class_name, testcase.name),
        None => testcase.name.clone(),
    };
    let mut lines = vec![format!(
        "  {} {} ({})",
        status_label(testcase.status),
        qualified_name,
        format_millis(testcase.time_millis)
    )];

    if let Some(trouble) = &testcase.trouble {
        let mut stack_lines = trouble.stack_lines.iter();
        if let Some(message) = stack_lines.next() {
            lines.push(format!("      {}", message));
        }
        lines.extend(stack_lines.map(|frame| format!("        at {}", frame)));
    }

    lines
}

pub fn format_report(report: &SessionReport) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(project_name) = &report.project_name {
        lines.push(format!("Test results of {}", project_name.bold()));
    }

    for suite in &report.suites {
        let time = suite
            .time_millis
            .map(format_millis)
            .unwrap_or_else(|| String::from("unfinished"));
        lines.push(format!("\nSuite {} ({})", suite.name, time));
        lines.extend(suite.testcases.iter().flat_map(testcase_lines));
    }

    let counts = &report.counts;
    lines.push(format!(
        "\n{} testcases: {} passed, {} failed, {} errors, {} ignored",
        counts.total(),
        counts.passed.to_string().green(),
        counts.failed.to_string().red(),
        counts.error.to_string().red(),
        counts.ignored.to_string().yellow(),
    ));

    lines
}

pub fn print_report(report: &SessionReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}

pub fn print_invocations(invocations: &[GradleInvocation]) {
    for invocation in invocations {
        println!("\nRerun with: {}", invocation.command_line());
    }
}
