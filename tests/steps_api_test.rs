//! Integration tests for the steps public API.

use devsetup::config::SetupConfig;
use devsetup::shell::{CommandOptions, CommandResult, Invocation, ProcessRunner};
use devsetup::steps::{plan, ExecutionOptions, Executor, PlanOptions, Step, StepOutcome};
use devsetup::ui::MockUI;
use devsetup::Result;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[derive(Default)]
struct Recorder {
    seen: Vec<String>,
}

impl ProcessRunner for Recorder {
    fn run(&mut self, invocation: &Invocation, _options: &CommandOptions) -> Result<CommandResult> {
        self.seen.push(invocation.to_string());
        Ok(CommandResult::success(
            String::new(),
            String::new(),
            Duration::from_millis(1),
        ))
    }
}

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("schedule_sync.py"), "").unwrap();
    fs::write(temp.path().join("requirements.txt"), "").unwrap();
    temp
}

#[test]
fn plan_then_execute_workflow() {
    let temp = project();
    let options = PlanOptions {
        skip_system: false,
        is_root: false,
    };

    // 1. Plan
    let steps = plan(&SetupConfig::default(), temp.path(), &options);
    assert_eq!(steps.len(), 8);
    assert!(matches!(steps[0], Step::UpdateIndex { .. }));
    assert!(matches!(steps[7], Step::Instructions { .. }));

    // 2. Execute
    let mut executor = Executor::new(
        Recorder::default(),
        ExecutionOptions {
            project_root: temp.path().to_path_buf(),
            dry_run: false,
        },
    );
    let mut ui = MockUI::new();
    let report = executor.run(&steps, &mut ui);

    // 3. Inspect
    assert!(report.success());
    assert_eq!(report.outcome("activate"), Some(&StepOutcome::Completed));
    assert_eq!(report.outcome("deactivate"), Some(&StepOutcome::Completed));
    let seen = &executor.runner().seen;
    assert_eq!(seen[0], "sudo apt-get update");
    assert_eq!(seen.len(), 4);
    assert!(ui.successes().iter().any(|s| s == "Setup complete!"));
}

#[test]
fn dry_run_leaves_filesystem_untouched() {
    let temp = project();
    let options = PlanOptions {
        skip_system: true,
        is_root: true,
    };
    let steps = plan(&SetupConfig::default(), temp.path(), &options);
    let mut executor = Executor::new(
        Recorder::default(),
        ExecutionOptions {
            project_root: temp.path().to_path_buf(),
            dry_run: true,
        },
    );

    let report = executor.run(&steps, &mut MockUI::new());

    assert!(report.success());
    assert!(executor.runner().seen.is_empty());
    assert!(report
        .results
        .iter()
        .all(|r| matches!(r.outcome, StepOutcome::Skipped { .. })));
    assert!(!temp.path().join("venv").exists());
}
