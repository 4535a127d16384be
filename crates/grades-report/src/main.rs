mod bootstrap;

use std::path::Path;

use anyhow::Result;
use grades_core::config::ReportConfig;
use grades_core::settings::Settings;
use grades_data::analysis::{run_batch, BatchResult};
use grades_data::reader::find_period_files;
use grades_data::sheet::WorkbookLoader;
use grades_render::assembler::{assemble, assemble_files};
use grades_render::chart::{ChartRenderer, ChartSpec, PgfplotsRenderer};
use grades_render::latex::{
    render_bars_document, render_sectors_document, write_document, BARS_DOCUMENT,
    SECTORS_DOCUMENT,
};
use grades_render::summary::render_summary;

fn main() -> Result<()> {
    let settings = Settings::load();
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Grades report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input: {}, Output: {}, Style: {}",
        settings.input_dir.display(),
        settings.output_dir.display(),
        settings.style
    );

    let config = ReportConfig::resolve(settings.config.as_deref(), &ReportConfig::default_path())?;
    let charts_dir = bootstrap::reset_output_dir(&settings.output_dir)?;

    if !settings.input_dir.is_dir() {
        tracing::warn!("Input directory {} not found", settings.input_dir.display());
    }
    let inputs = find_period_files(&settings.input_dir, &config);
    let batch = run_batch(&config, &WorkbookLoader, &inputs, settings.duplicate_policy());

    if batch.aggregates.non_empty().next().is_none() {
        tracing::warn!("No data found to process");
    }

    let renderer = PgfplotsRenderer::new(&config);
    let date = batch.generated_at.format("%d/%m/%Y").to_string();

    if settings.wants_bars() {
        write_bars_report(&config, &batch, &renderer, &charts_dir, &settings.output_dir, &date)?;
    }
    if settings.wants_sectors() {
        write_sectors_report(&config, &batch, &renderer, &charts_dir, &settings.output_dir, &date)?;
    }

    println!("{}", render_summary(&batch, &config));
    Ok(())
}

fn write_bars_report(
    config: &ReportConfig,
    batch: &BatchResult,
    renderer: &dyn ChartRenderer,
    charts_dir: &Path,
    output_dir: &Path,
    date: &str,
) -> Result<()> {
    let periods = assemble(&batch.aggregates);
    for period in &periods {
        tracing::info!("Generating content for {}", period.call_period);
        renderer.render(&ChartSpec::for_period(period), charts_dir)?;
    }
    let document = render_bars_document(config, &periods, renderer.extension(), date);
    write_document(&output_dir.join(BARS_DOCUMENT), &document)?;
    Ok(())
}

fn write_sectors_report(
    config: &ReportConfig,
    batch: &BatchResult,
    renderer: &dyn ChartRenderer,
    charts_dir: &Path,
    output_dir: &Path,
    date: &str,
) -> Result<()> {
    let periods = assemble_files(batch, config);
    for file in periods.iter().flat_map(|p| &p.files) {
        renderer.render(&ChartSpec::for_file(file), charts_dir)?;
    }
    let document = render_sectors_document(config, &periods, renderer.extension(), date);
    write_document(&output_dir.join(SECTORS_DOCUMENT), &document)?;
    Ok(())
}
