use optics_plot::{Plot, RayPaths, RenderParams};
use optics_plot_glium::{PlotParams, PlotWindow};
use optics_plot_json::{serde_json, serialize_scene};

use clap::Parser;
use std::error::Error;

mod cli;
mod logger;

fn main() -> Result<(), Box<dyn Error>> {
    let args = cli::Args::parse();

    logger::init_logger(args.log_level.into());

    let scene = optics_plot_json::load_scene(&args.config)?;

    if args.print_config {
        println!(
            "{}",
            serde_json::to_string_pretty(&serialize_scene(&scene.boundaries))?
        );
        return Ok(());
    }

    let paths = RayPaths::load(&args.data)?;
    log::info!(
        "loaded {} rays ({} samples) from {}",
        paths.len(),
        paths.sample_count(),
        args.data.display(),
    );

    let render_params = RenderParams {
        conic_samples: args.conic_samples,
        min_path_samples: args.min_path_samples,
        ..Default::default()
    };

    let mut plot = Plot::new();
    let report = optics_plot::render_scene(&scene.boundaries, &paths, &render_params, &mut plot);

    if !report.skipped.is_empty() {
        log::warn!(
            "{} of {} boundaries could not be drawn",
            report.skipped.len(),
            scene.boundaries.len(),
        );
    }

    if report.paths_filtered > 0 {
        log::info!(
            "{} rays shorter than {} samples were not drawn",
            report.paths_filtered,
            render_params.min_path_samples,
        );
    }

    let font = args.font.as_ref().map(std::fs::read).transpose()?;

    let title = format!("{} ({})", args.config.display(), args.data.display());

    PlotWindow::with_title(&title)?.display(
        &plot,
        PlotParams {
            font,
            ..Default::default()
        },
    )?;

    Ok(())
}
