use anyhow::{Context, Result};
use clap::Parser;
use pot_pack::cli::{Args, Commands};
use pot_pack::utils::{calculate_size_reduction, format_file_size};
use pot_pack::validation::prepare_output_dir;
use pot_pack::{
    collect_image_files, describe_plan, error, info, logger, print_plan_report, run_batch,
    track_files, warn, BatchConverter, ConvertOptions, ImageStore,
};
use std::path::PathBuf;
use std::time::Instant;
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose);

    match args.command {
        Commands::Pack {
            inputs,
            output,
            max_exponent,
            quality,
            exclude,
            recursive,
            threads,
        } => {
            let options = ConvertOptions::new(max_exponent, quality)?;
            pack_images(&inputs, output, options, &exclude, recursive, threads)?;
        }
        Commands::Plan {
            input,
            max_exponent,
        } => {
            let options = ConvertOptions::new(max_exponent, None)?;
            let report = describe_plan(&input, &options)
                .with_context(|| format!("Failed to plan {}", input.display()))?;
            print_plan_report(&report);
        }
    }

    Ok(())
}

fn build_runtime(threads: Option<u16>) -> Result<Runtime> {
    let mut builder = tokio::runtime::Builder::new_current_thread();
    builder.enable_all();
    if let Some(threads) = threads {
        builder.max_blocking_threads(usize::from(threads));
    }
    builder.build().context("Failed to start the async runtime")
}

fn pack_images(
    inputs: &[String],
    output: PathBuf,
    options: ConvertOptions,
    exclude: &[String],
    recursive: bool,
    threads: Option<u16>,
) -> Result<()> {
    info!("🚀 Starting batch...");
    info!("📁 Output: {:?}", output);
    info!("🧱 Ceiling: {}px", options.ceiling());

    let start_time = Instant::now();

    let mut paths = Vec::new();
    for input in inputs {
        paths.extend(collect_image_files(input, recursive)?);
    }

    if paths.is_empty() {
        warn!("No image files found in the input path");
        return Ok(());
    }
    info!("📊 Found {} image files", paths.len());

    let mut store = ImageStore::new();
    let summary = track_files(&mut store, &paths);
    if !summary.rejected.is_empty() {
        warn!("{} file(s) could not be decoded and were dropped", summary.rejected.len());
    }

    for name in exclude {
        if let Err(e) = store.set_active(name, false) {
            warn!("Cannot exclude {}: {}", name, e);
        }
    }

    let runtime = build_runtime(threads)?;
    let converter = BatchConverter::new(options);
    let Some(report) = runtime.block_on(run_batch(&store, &converter))? else {
        info!("⚠️  No active images, nothing to pack");
        return Ok(());
    };

    let outcome = &report.outcome;
    let original_size: u64 = outcome
        .results
        .iter()
        .filter_map(|r| store.get(&r.name))
        .map(|image| image.bytes.len() as u64)
        .sum();
    let packed_size: u64 = outcome.results.iter().map(|r| r.payload.len() as u64).sum();

    info!("\n📊 Batch Summary:");
    info!("  🔄 Resized: {}", outcome.resized_count());
    info!("  ✅ Packed as-is: {}", outcome.passed_through_count());
    info!(
        "  📊 Original size: {} -> {} ({:.1}% smaller)",
        format_file_size(original_size),
        format_file_size(packed_size),
        calculate_size_reduction(original_size, packed_size)
    );
    info!("  ⏱️  Total time: {:?}", start_time.elapsed());

    if !outcome.failures.is_empty() {
        warn!("Failed images: {}", outcome.failures.len());
        for failure in &outcome.failures {
            warn!("  {}: {}", failure.name, failure.error);
        }
    }

    match &report.artifact {
        Some(artifact) => {
            let dir = prepare_output_dir(&output)?;
            let path = artifact
                .write_to_dir(&dir)
                .with_context(|| format!("Failed to write archive to {}", dir.display()))?;
            println!("📦 Download ZIP ({}): {}", artifact.size_label(), path.display());
        }
        None => error!("Every image failed to convert, no archive written"),
    }

    Ok(())
}
