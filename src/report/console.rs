use crate::report::summary::SuiteSummary;

// ============================================================================
// Console reporter: per-category summary table
// ============================================================================

/// Format a suite summary for terminal output.
///
/// Produces output like:
/// ```text
/// === Test Cases: https://erp.example.com/login ===
///
///   positive        2
///   negative        9
///   ...
///
/// Detected: 2 inputs, 1 buttons, 2 links, 0 forms
/// === Total: 24 test cases ===
/// ```
pub fn format_console_summary(summary: &SuiteSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Test Cases: {} ===\n\n", summary.website_url));

    for (category, count) in summary.rows() {
        out.push_str(&format!("  {:<14}{:>5}\n", category, count));
    }

    let d = &summary.detected_elements;
    out.push_str(&format!(
        "\nDetected: {} inputs, {} buttons, {} links, {} forms\n",
        d.input_fields, d.buttons, d.links, d.forms
    ));
    out.push_str(&format!(
        "=== Total: {} test cases ===\n",
        summary.summary.total_tests
    ));

    out
}
