//! LaTeX documents: the compact per-period report and the detailed per-file
//! report.

use std::fmt::Write as _;
use std::path::Path;

use grades_core::config::ReportConfig;
use grades_core::error::{GradesError, Result};
use grades_core::formatting::{format_percent, format_share};
use grades_core::models::Category;
use tracing::info;

use crate::assembler::{FilePeriodReport, PeriodReport};
use crate::chart::ChartSpec;

/// File name of the compact report.
pub const BARS_DOCUMENT: &str = "informe_barras.tex";

/// File name of the detailed report.
pub const SECTORS_DOCUMENT: &str = "informe_sectores.tex";

/// Escape LaTeX special characters in free text.
pub fn latex_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '$' => out.push_str("\\$"),
            '&' => out.push_str("\\&"),
            '#' => out.push_str("\\#"),
            '^' => out.push_str("\\^{}"),
            '_' => out.push_str("\\_"),
            '%' => out.push_str("\\%"),
            '~' => out.push_str("\\~{}"),
            _ => out.push(c),
        }
    }
    out
}

// ── Shared blocks ─────────────────────────────────────────────────────────────

fn preamble(config: &ReportConfig, date: &str) -> String {
    let mut out = String::new();
    out.push_str("\\documentclass[12pt,a4paper]{article}\n");
    for package in [
        "\\usepackage[utf8]{inputenc}",
        "\\usepackage[catalan]{babel}",
        "\\usepackage[margin=2.5cm]{geometry}",
        "\\usepackage{graphicx}",
        "\\usepackage{float}",
        "\\usepackage{booktabs}",
        "\\usepackage{array}",
        "\\usepackage{longtable}",
        "\\usepackage{xcolor}",
        "\\usepackage{pgfplots}",
        "\\usepackage{pgf-pie}",
        "\\pgfplotsset{compat=1.18}",
    ] {
        out.push_str(package);
        out.push('\n');
    }
    out.push('\n');

    let mut title = format!(
        "{} \\\\ {}",
        latex_escape(&config.texts.title),
        latex_escape(&config.course)
    );
    for degree in &config.degrees {
        let _ = write!(title, " \\\\\n\\small {}", latex_escape(degree));
    }
    let _ = writeln!(out, "\\title{{{}}}", title);
    let _ = writeln!(out, "\\author{{{}}}", latex_escape(&config.author));
    let _ = writeln!(out, "\\date{{{}}}", latex_escape(date));
    out.push('\n');
    out.push_str("\\begin{document}\n\n\\maketitle\n\n");
    out
}

/// Figure body for a chart artifact: TikZ fragments are inlined with
/// `\input`, anything else is treated as an image.
fn chart_include(relative_path: &str, width: &str) -> String {
    if relative_path.ends_with(".tex") {
        format!("\\input{{{}}}", relative_path)
    } else {
        format!("\\includegraphics[width={}]{{{}}}", width, relative_path)
    }
}

// ── Compact report ────────────────────────────────────────────────────────────

/// Compact report: per period, a percentage table over all subjects and the
/// period's stacked-bar chart.
pub fn render_bars_document(
    config: &ReportConfig,
    periods: &[PeriodReport],
    chart_extension: &str,
    date: &str,
) -> String {
    let texts = &config.texts;
    let mut out = preamble(config, date);

    for period in periods {
        let _ = writeln!(out, "\\section{{{}}}\n", latex_escape(&period.display_name));
        out.push_str("\\begin{table}[H]\n\\centering\n\\small\n");
        let _ = writeln!(
            out,
            "\\begin{{tabular}}{{|p{{4cm}}|{}c|}}",
            "c|".repeat(Category::ALL.len())
        );
        out.push_str("\\hline\n");

        let header = Category::ALL
            .iter()
            .map(|c| format!("\\textbf{{{}}}", c.code()))
            .collect::<Vec<_>>()
            .join(" & ");
        let _ = writeln!(
            out,
            "\\textbf{{{}}} & {} & \\textbf{{{}}} \\\\",
            latex_escape(&texts.subject),
            header,
            latex_escape(&texts.total)
        );
        out.push_str("\\hline\n");

        for (i, row) in period.rows.iter().enumerate() {
            let cells = row
                .percentages
                .iter()
                .map(|(_, pct)| format!("{}\\%", format_percent(pct, 1)))
                .collect::<Vec<_>>()
                .join(" & ");
            let _ = writeln!(
                out,
                "{} & {} & {} \\\\",
                latex_escape(&row.label),
                cells,
                row.total
            );
            if i + 1 < period.rows.len() {
                out.push_str("\\hline\n");
            }
        }

        out.push_str("\\hline\n\\end{tabular}\n");
        let _ = writeln!(
            out,
            "\\caption{{{}}}",
            latex_escape(&texts.percentages_caption)
        );
        out.push_str("\\end{table}\n\n");

        let chart = ChartSpec::for_period(period);
        out.push_str("\\begin{figure}[H]\n\\centering\n");
        let _ = writeln!(
            out,
            "{}",
            chart_include(&chart.relative_path(chart_extension), "0.9\\textwidth")
        );
        let _ = writeln!(
            out,
            "\\caption{{{} - {}}}",
            latex_escape(&texts.distribution_caption),
            latex_escape(&period.display_name)
        );
        out.push_str("\\end{figure}\n\n\\clearpage\n\n");
    }

    out.push_str("\\end{document}\n");
    out
}

// ── Detailed report ───────────────────────────────────────────────────────────

/// Detailed report: per processed file, a count table and a distribution
/// chart.
pub fn render_sectors_document(
    config: &ReportConfig,
    periods: &[FilePeriodReport],
    chart_extension: &str,
    date: &str,
) -> String {
    let texts = &config.texts;
    let mut out = preamble(config, date);
    out.push_str("\\tableofcontents\n\\newpage\n\n");

    for period in periods {
        let _ = writeln!(out, "\\section{{{}}}\n", latex_escape(&period.display_name));

        for file in &period.files {
            let _ = writeln!(
                out,
                "\\subsection{{{} - {} - {} {}}}\n",
                file.subject_code,
                latex_escape(&file.subject_name),
                latex_escape(&texts.group),
                file.group
            );

            out.push_str("\\begin{table}[H]\n\\centering\n");
            let _ = writeln!(out, "\\caption{{{}}}", latex_escape(&file.title));
            out.push_str("\\begin{tabular}{|l|c|c|}\n\\hline\n");
            let _ = writeln!(
                out,
                "\\textbf{{{}}} & \\textbf{{{}}} & \\textbf{{{}}} \\\\",
                latex_escape(&texts.result),
                latex_escape(&texts.students),
                latex_escape(&texts.percentage)
            );
            out.push_str("\\hline\n");
            for (category, count) in file.counts.iter().filter(|(_, n)| *n > 0) {
                let _ = writeln!(
                    out,
                    "{} & {} & {}\\% \\\\",
                    latex_escape(config.category_label(category)),
                    count,
                    format_share(count, file.total, 1)
                );
            }
            out.push_str("\\hline\n");
            let _ = writeln!(
                out,
                "\\textbf{{{}}} & \\textbf{{{}}} & \\textbf{{{}\\%}} \\\\",
                latex_escape(&texts.total),
                file.total,
                format_share(file.total, file.total, 1)
            );
            out.push_str("\\hline\n\\end{tabular}\n\\end{table}\n\n");

            let chart = ChartSpec::for_file(file);
            out.push_str("\\begin{figure}[H]\n\\centering\n");
            let _ = writeln!(
                out,
                "{}",
                chart_include(&chart.relative_path(chart_extension), "0.8\\textwidth")
            );
            let _ = writeln!(out, "\\caption{{{}}}", latex_escape(&file.title));
            out.push_str("\\end{figure}\n\n\\newpage\n\n");
        }
    }

    out.push_str("\\end{document}\n");
    out
}

/// Write a rendered document to `path`.
pub fn write_document(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|source| GradesError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Document written to {}", path.display());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{FileReport, ReportRow};
    use grades_core::models::{Group, ResultCounts};
    use tempfile::TempDir;

    fn period() -> PeriodReport {
        let counts = ResultCounts::from_pairs([(Category::Failed, 5), (Category::Passed, 15)]);
        PeriodReport {
            call_period: "1Q2".to_string(),
            display_name: "Primer Quadrimestre - Segona Convocatòria".to_string(),
            rows: vec![
                ReportRow {
                    subject_code: "34154".to_string(),
                    subject_name: "Programació matemàtica".to_string(),
                    label: "34154 - Programació matemàtica (AB)".to_string(),
                    groups: "AB".to_string(),
                    percentages: counts.percentages(),
                    total: counts.total(),
                    counts: counts.clone(),
                },
                ReportRow {
                    subject_code: "34164".to_string(),
                    subject_name: "Topologia".to_string(),
                    label: "34164 - Topologia".to_string(),
                    groups: "A".to_string(),
                    percentages: ResultCounts::new().percentages(),
                    total: 0,
                    counts: ResultCounts::new(),
                },
            ],
        }
    }

    fn file_period() -> FilePeriodReport {
        FilePeriodReport {
            call_period: "1Q1".to_string(),
            display_name: "Primer Quadrimestre - Primera Convocatòria".to_string(),
            files: vec![FileReport {
                call_period: "1Q1".to_string(),
                subject_code: "34154".to_string(),
                subject_name: "Programació matemàtica".to_string(),
                group: Group::Letter('A'),
                call_number: "1".to_string(),
                title: "34154 - Programació matemàtica - Grup A - Convocatòria 1".to_string(),
                stem: "34154_A_1Q1".to_string(),
                counts: ResultCounts::from_pairs([(Category::Passed, 3), (Category::Good, 1)]),
                total: 4,
            }],
        }
    }

    #[test]
    fn test_latex_escape() {
        assert_eq!(latex_escape("50% & more"), "50\\% \\& more");
        assert_eq!(latex_escape("a_b#c"), "a\\_b\\#c");
        assert_eq!(latex_escape("{x}"), "\\{x\\}");
        assert_eq!(latex_escape("~^\\"), "\\~{}\\^{}\\textbackslash{}");
        assert_eq!(latex_escape("Excel·lent"), "Excel·lent");
    }

    #[test]
    fn test_bars_document_structure() {
        let config = ReportConfig::default();
        let doc = render_bars_document(&config, &[period()], "tex", "19/10/2026");

        assert!(doc.starts_with("\\documentclass[12pt,a4paper]{article}"));
        assert!(doc.contains("\\usepackage[catalan]{babel}"));
        assert!(doc.contains("\\small Grau en Matemàtiques"));
        assert!(doc.contains("\\date{19/10/2026}"));
        assert!(doc.contains("\\section{Primer Quadrimestre - Segona Convocatòria}"));
        assert!(doc.contains("\\begin{tabular}{|p{4cm}|c|c|c|c|c|c|c|}"));
        assert!(doc.contains(
            "\\textbf{Assignatura} & \\textbf{NP} & \\textbf{SU} & \\textbf{AP} & \\textbf{NO} & \\textbf{EX} & \\textbf{MH} & \\textbf{Total} \\\\"
        ));
        assert!(doc.contains(
            "34154 - Programació matemàtica (AB) & 0.0\\% & 25.0\\% & 75.0\\% & 0.0\\% & 0.0\\% & 0.0\\% & 20 \\\\"
        ));
        assert!(doc.contains("34164 - Topologia & 0.0\\% & 0.0\\% & 0.0\\% & 0.0\\% & 0.0\\% & 0.0\\% & 0 \\\\"));
        assert!(doc.contains("\\caption{Resultats en percentatges}"));
        assert!(doc.contains("\\input{graficos/barras_1Q2.tex}"));
        assert!(doc.contains("\\clearpage"));
        assert!(doc.trim_end().ends_with("\\end{document}"));
    }

    #[test]
    fn test_bars_document_with_image_charts() {
        let config = ReportConfig::default();
        let doc = render_bars_document(&config, &[period()], "png", "hoy");
        assert!(doc.contains("\\includegraphics[width=0.9\\textwidth]{graficos/barras_1Q2.png}"));
    }

    #[test]
    fn test_bars_document_without_periods() {
        let config = ReportConfig::default();
        let doc = render_bars_document(&config, &[], "tex", "19/10/2026");
        assert!(!doc.contains("\\section"));
        assert!(doc.contains("\\maketitle"));
    }

    #[test]
    fn test_sectors_document_structure() {
        let config = ReportConfig::default();
        let doc = render_sectors_document(&config, &[file_period()], "tex", "19/10/2026");

        assert!(doc.contains("\\tableofcontents"));
        assert!(doc.contains("\\subsection{34154 - Programació matemàtica - Grup A}"));
        assert!(doc.contains("\\caption{34154 - Programació matemàtica - Grup A - Convocatòria 1}"));
        assert!(doc.contains("Aprovat & 3 & 75.0\\% \\\\"));
        assert!(doc.contains("Notable & 1 & 25.0\\% \\\\"));
        assert!(!doc.contains("Suspès &"));
        assert!(doc.contains("\\textbf{Total} & \\textbf{4} & \\textbf{100.0\\%} \\\\"));
        assert!(doc.contains("\\input{graficos/sectores_1Q1_34154_A_1Q1.tex}"));
    }

    #[test]
    fn test_configured_texts_are_escaped() {
        let mut config = ReportConfig::default();
        config.course = "2n curs & 3r".to_string();
        config.author = "R&D_team".to_string();
        let doc = render_bars_document(&config, &[], "tex", "19/10/2026");
        assert!(doc.contains("2n curs \\& 3r"));
        assert!(doc.contains("\\author{R\\&D\\_team}"));
    }

    #[test]
    fn test_write_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(BARS_DOCUMENT);
        write_document(&path, "\\end{document}\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\\end{document}\n");

        let missing = tmp.path().join("nope").join(BARS_DOCUMENT);
        assert!(matches!(
            write_document(&missing, ""),
            Err(GradesError::FileWrite { .. })
        ));
    }
}
