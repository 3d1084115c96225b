//! Rendering of failures for the terminal
//!
//! A failed finish lists the steps already applied and the commands that
//! complete it by hand. The pre-flight report is shown by the orchestrator
//! itself, so only the summary line is repeated here.

use crate::error::{describe_error_code, FlowError};

/// Multi-line description of a flow failure, ready for stderr
pub fn format_flow_error(error: &FlowError) -> String {
    let mut out = format!("❌ {error}\n");

    if let Some(hint) = error.hint() {
        out.push_str(&format!("   Hint: {hint}\n"));
    }

    let completed = error.completed_steps();
    if !completed.is_empty() {
        out.push_str("   Already done:\n");
        for step in completed {
            out.push_str(&format!("     ✅ {step}\n"));
        }
    }

    let remediation = error.remediation();
    if !remediation.is_empty() {
        out.push_str("   To finish by hand:\n");
        for (i, step) in remediation.iter().enumerate() {
            out.push_str(&format!("     {}. {step}\n", i + 1));
        }
    }

    let code = error.code();
    out.push_str(&format!("   (error E{code}: {})\n", describe_error_code(code)));
    out
}

/// Render any command failure and choose the exit status
pub fn report_failure(error: &anyhow::Error) -> (String, i32) {
    match error.downcast_ref::<FlowError>() {
        Some(flow_error) => (format_flow_error(flow_error), flow_error.exit_code()),
        None => (format!("❌ Error: {error:#}\n"), 1),
    }
}
