//! Final verdict for a plan run.
use crate::exec::ExecutionResult;
use crate::plan::PlanKind;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Success,
    SuccessWithWarnings,
    FailureWithWarnings,
    Failure,
}

impl Verdict {
    pub fn from_counts(errors: usize, warnings: usize) -> Self {
        match (errors, warnings) {
            (0, 0) => Verdict::Success,
            (0, _) => Verdict::SuccessWithWarnings,
            (_, 0) => Verdict::Failure,
            _ => Verdict::FailureWithWarnings,
        }
    }

    pub fn is_clean(self) -> bool {
        self == Verdict::Success
    }
}

/// Operator-facing summary lines for a finished run.
pub fn verdict_lines(
    kind: PlanKind,
    result: &ExecutionResult,
    log_path: Option<&Path>,
) -> (Verdict, Vec<String>) {
    let verdict = Verdict::from_counts(result.errors, result.warnings);
    let subject = "This Kubernetes environment";
    let process = match kind {
        PlanKind::Install => "bootstrapping",
        PlanKind::Uninstall => "uninstall",
    };
    let mut lines = vec![match verdict {
        Verdict::Success => match kind {
            PlanKind::Install => format!("{subject} has been successfully bootstrapped"),
            PlanKind::Uninstall => "Installation deleted successfully!".to_string(),
        },
        Verdict::SuccessWithWarnings => format!(
            "{subject} had {} warning(s) during the {process} process",
            result.warnings
        ),
        Verdict::Failure => format!(
            "{subject} had {} error(s) during the {process} process",
            result.errors
        ),
        Verdict::FailureWithWarnings => format!(
            "{subject} had {} error(s) and {} warning(s) during the {process} process",
            result.errors, result.warnings
        ),
    }];
    if verdict == Verdict::Success && kind == PlanKind::Install {
        lines.push("Components can now be created via the newly installed operators".to_string());
    }
    if !verdict.is_clean() {
        if let Some(path) = log_path {
            lines.push(format!(
                "Please check the bootstrap log file for this session here: {}",
                path.display()
            ));
        }
    }
    (verdict, lines)
}

/// Print the verdict and mirror it into the session log.
pub fn report(kind: PlanKind, result: &ExecutionResult, log_path: Option<&Path>) -> Verdict {
    let (verdict, lines) = verdict_lines(kind, result, log_path);
    println!();
    for line in &lines {
        println!("{line}");
    }
    match verdict {
        Verdict::Success => tracing::info!(?verdict, "run complete"),
        Verdict::SuccessWithWarnings => tracing::warn!(?verdict, warnings = result.warnings, "run complete"),
        Verdict::Failure | Verdict::FailureWithWarnings => tracing::error!(
            ?verdict,
            errors = result.errors,
            warnings = result.warnings,
            "run complete"
        ),
    }
    verdict
}
