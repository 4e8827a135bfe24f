use crate::error::Result;
use crate::formats::MediaType;
use crate::input::read_dropped_file;
use crate::processing::{decode_image, ConvertOptions};
use crate::sizing::{plan_size, SizePlan};
use crate::utils::format_file_size;
use image::GenericImageView;
use std::path::Path;

/// What a batch run would do with one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanReport {
    pub name: String,
    pub media_type: MediaType,
    pub file_size: u64,
    pub natural: (u32, u32),
    pub ceiling: u32,
    pub plan: SizePlan,
}

pub fn describe_plan(input_path: &Path, options: &ConvertOptions) -> Result<PlanReport> {
    let file = read_dropped_file(input_path)?;
    let natural = decode_image(&file.name, &file.bytes, file.media_type)?.dimensions();
    let ceiling = options.ceiling();
    let plan = plan_size(natural.0, natural.1, ceiling)?;

    Ok(PlanReport {
        name: file.name,
        media_type: file.media_type,
        file_size: file.bytes.len() as u64,
        natural,
        ceiling,
        plan,
    })
}

pub fn print_plan_report(report: &PlanReport) {
    println!("📋 Size plan for: {}", report.name);
    println!("  🎭 Media type: {}", report.media_type);
    println!("  📦 File size: {}", format_file_size(report.file_size));
    println!(
        "  📏 Natural size: {}x{} pixels",
        report.natural.0, report.natural.1
    );
    println!("  🧱 Ceiling: {}px", report.ceiling);

    if report.plan.needs_resize {
        println!(
            "  🔄 Resize to: {}x{} pixels",
            report.plan.width, report.plan.height
        );
    } else {
        println!("  ✅ Already power-of-two sized, original bytes are packed as-is");
    }
}
