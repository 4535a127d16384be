use std::fmt::Write;

use grades_core::config::ReportConfig;
use grades_data::analysis::BatchResult;

/// Plain-text end-of-run summary.
///
/// Lists, per non-empty period, every processed file with its per-category
/// counts and total. Files replaced by a later duplicate and failed files
/// follow in their own sections.
pub fn render_summary(batch: &BatchResult, config: &ReportConfig) -> String {
    let texts = &config.texts;
    let mut output = String::new();

    let _ = writeln!(output, "=== {} ===", texts.summary);

    for period in batch.aggregates.non_empty() {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "{}: {} {}",
            period.display_name,
            period.subjects.len(),
            texts.subjects_count
        );
        for file in batch.processed_in(&period.call_period) {
            let counts = file
                .counts
                .iter()
                .map(|(category, n)| format!("{}={}", category.code(), n))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(
                output,
                "  - {} - {} {}: {} {} [{}]",
                file.identity.subject_code,
                texts.group,
                file.identity.group,
                file.counts.total(),
                texts.students_count,
                counts
            );
        }
    }

    let superseded: Vec<_> = batch.superseded().collect();
    if !superseded.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "{} ({}):", texts.superseded_files, superseded.len());
        for file in superseded {
            let _ = writeln!(
                output,
                "  - {}: {} {}",
                file.path.display(),
                file.counts.total(),
                texts.students_count
            );
        }
    }

    if !batch.failures.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "{} ({}):", texts.failed_files, batch.failures.len());
        for failure in &batch.failures {
            let _ = writeln!(output, "  - {}: {}", failure.path.display(), failure.error);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "{}/{} ({})",
        batch.processed.len(),
        batch.files_seen(),
        batch.generated_at.format("%d/%m/%Y %H:%M")
    );
    output
}
