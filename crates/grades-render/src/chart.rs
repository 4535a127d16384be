//! Chart artifacts.
//!
//! Charts are described as plain data ([`ChartSpec`]) and handed to a
//! [`ChartRenderer`], which writes one artifact per chart into the charts
//! directory. The bundled [`PgfplotsRenderer`] emits TikZ fragments that the
//! documents pull in with `\input`, so the report compiles without any
//! pre-rendered images.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use grades_core::config::ReportConfig;
use grades_core::error::{GradesError, Result};
use grades_core::models::{Category, Percentages, ResultCounts};
use tracing::debug;

use crate::assembler::{FileReport, PeriodReport};
use crate::latex::latex_escape;

/// Sub-directory of the output directory that holds chart artifacts.
pub const CHARTS_DIR: &str = "graficos";

/// Characters of the subject name kept in a bar label.
const BAR_NAME_CHARS: usize = 20;

// ── Chart data ────────────────────────────────────────────────────────────────

/// One horizontal bar of a stacked chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub percentages: Percentages,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    /// One 0–100 % bar per subject, segments in canonical category order.
    StackedBars(Vec<ChartBar>),
    /// Share of each category for a single file.
    Distribution(ResultCounts),
}

/// A chart to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Artifact base name, without extension.
    pub name: String,
    pub title: String,
    pub kind: ChartKind,
}

impl ChartSpec {
    /// Stacked-bar chart for one period table.
    pub fn for_period(report: &PeriodReport) -> Self {
        let bars = report
            .rows
            .iter()
            .map(|row| ChartBar {
                label: bar_label(&row.subject_code, &row.subject_name),
                percentages: row.percentages.clone(),
            })
            .collect();
        Self {
            name: format!("barras_{}", report.call_period),
            title: report.display_name.clone(),
            kind: ChartKind::StackedBars(bars),
        }
    }

    /// Distribution chart for one processed file.
    pub fn for_file(file: &FileReport) -> Self {
        Self {
            name: format!("sectores_{}_{}", file.call_period, file.stem),
            title: file.title.clone(),
            kind: ChartKind::Distribution(file.counts.clone()),
        }
    }

    /// Path of the rendered artifact relative to the output directory.
    pub fn relative_path(&self, extension: &str) -> String {
        format!("{}/{}.{}", CHARTS_DIR, self.name, extension)
    }
}

/// `"<code>\n<first 20 chars of name>..."`.
pub fn bar_label(code: &str, name: &str) -> String {
    let short: String = name.chars().take(BAR_NAME_CHARS).collect();
    format!("{}\n{}...", code, short)
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Writes chart artifacts.
pub trait ChartRenderer {
    /// File extension of the produced artifacts.
    fn extension(&self) -> &str;

    /// Render `chart` into `dir` and return the written path.
    fn render(&self, chart: &ChartSpec, dir: &Path) -> Result<PathBuf>;
}

struct Series {
    category: Category,
    label: String,
    color: String,
}

/// Renders charts as pgfplots / pgf-pie TikZ fragments.
pub struct PgfplotsRenderer {
    series: Vec<Series>,
    axis_label: String,
    students_label: String,
}

impl PgfplotsRenderer {
    pub fn new(config: &ReportConfig) -> Self {
        let series = Category::ALL
            .into_iter()
            .map(|category| Series {
                category,
                label: config.category_label(category).to_string(),
                color: config
                    .category(category)
                    .map(|c| c.color.trim_start_matches('#').to_uppercase())
                    .unwrap_or_else(|| "808080".to_string()),
            })
            .collect();
        Self {
            series,
            axis_label: config.texts.students_axis.clone(),
            students_label: config.texts.students.clone(),
        }
    }

    fn colour_name(category: Category) -> String {
        format!("grades{}", category.code())
    }

    fn colour_definitions(&self) -> String {
        let mut out = String::new();
        for s in &self.series {
            let _ = writeln!(
                out,
                "\\definecolor{{{}}}{{HTML}}{{{}}}",
                Self::colour_name(s.category),
                s.color
            );
        }
        out
    }

    fn stacked_bars(&self, title: &str, bars: &[ChartBar]) -> String {
        let mut out = self.colour_definitions();
        let ticks = (0..bars.len())
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let tick_labels = bars
            .iter()
            .map(|b| {
                let lines: Vec<String> = b.label.split('\n').map(latex_escape).collect();
                format!("{{{}}}", lines.join("\\\\"))
            })
            .collect::<Vec<_>>()
            .join(",");

        let _ = writeln!(out, "\\begin{{tikzpicture}}");
        let _ = writeln!(out, "\\begin{{axis}}[");
        let _ = writeln!(out, "  xbar stacked,");
        let _ = writeln!(out, "  width=0.75\\textwidth,");
        let _ = writeln!(out, "  height={:.1}cm,", 1.5 + 0.9 * bars.len() as f64);
        let _ = writeln!(out, "  bar width=9pt,");
        let _ = writeln!(out, "  xmin=0, xmax=100,");
        let _ = writeln!(out, "  xtick={{0,20,40,60,80,100}},");
        let _ = writeln!(out, "  xlabel={{{}}},", latex_escape(&self.axis_label));
        let _ = writeln!(out, "  ytick={{{}}},", ticks);
        let _ = writeln!(out, "  yticklabels={{{}}},", tick_labels);
        let _ = writeln!(
            out,
            "  yticklabel style={{align=right, font=\\scriptsize}},"
        );
        let _ = writeln!(out, "  y dir=reverse,");
        let _ = writeln!(out, "  enlarge y limits={{abs=0.6}},");
        let _ = writeln!(
            out,
            "  legend style={{at={{(1.03,1)}}, anchor=north west, font=\\scriptsize}},"
        );
        let _ = writeln!(out, "  title={{\\textbf{{{}}}}},", latex_escape(title));
        let _ = writeln!(out, "]");

        for s in &self.series {
            // Categories absent from every bar get no segment and no legend entry.
            if bars.iter().all(|b| b.percentages.get(s.category) <= 0.0) {
                continue;
            }
            let coordinates = bars
                .iter()
                .enumerate()
                .map(|(i, b)| format!("({:.2},{})", b.percentages.get(s.category), i))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(
                out,
                "\\addplot[fill={}, draw=white, fill opacity=0.8] coordinates {{{}}};",
                Self::colour_name(s.category),
                coordinates
            );
            let _ = writeln!(out, "\\addlegendentry{{{}}}", latex_escape(&s.label));
        }

        let _ = writeln!(out, "\\end{{axis}}");
        let _ = writeln!(out, "\\end{{tikzpicture}}");
        out
    }

    fn distribution(&self, counts: &ResultCounts) -> String {
        let mut out = self.colour_definitions();
        let percentages = counts.percentages();
        let present: Vec<&Series> = self
            .series
            .iter()
            .filter(|s| counts.get(s.category) > 0)
            .collect();

        if present.is_empty() {
            let _ = writeln!(out, "\\fbox{{{}: 0}}", latex_escape(&self.students_label));
            return out;
        }

        let colours = present
            .iter()
            .map(|s| Self::colour_name(s.category))
            .collect::<Vec<_>>()
            .join(",");
        let slices = present
            .iter()
            .map(|s| {
                // Braced so that `,` and `/` in a label do not split the slice list.
                format!(
                    "{:.1}/{{{} ({})}}",
                    percentages.get(s.category),
                    latex_escape(&s.label),
                    counts.get(s.category)
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        let _ = writeln!(out, "\\begin{{tikzpicture}}");
        let _ = writeln!(
            out,
            "\\pie[sum=auto, text=legend, after number=\\%, radius=3, color={{{}}}]{{{}}}",
            colours, slices
        );
        let _ = writeln!(out, "\\end{{tikzpicture}}");
        out
    }
}

impl ChartRenderer for PgfplotsRenderer {
    fn extension(&self) -> &str {
        "tex"
    }

    fn render(&self, chart: &ChartSpec, dir: &Path) -> Result<PathBuf> {
        let body = match &chart.kind {
            ChartKind::StackedBars(bars) => self.stacked_bars(&chart.title, bars),
            ChartKind::Distribution(counts) => self.distribution(counts),
        };
        let path = dir.join(format!("{}.{}", chart.name, self.extension()));
        std::fs::write(&path, body).map_err(|source| GradesError::FileWrite {
            path: path.clone(),
            source,
        })?;
        debug!("chart written to {}", path.display());
        Ok(path)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
