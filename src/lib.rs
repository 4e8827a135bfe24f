pub mod archive;
pub mod batch;
pub mod cli;
pub mod constants;
pub mod error;
pub mod formats;
pub mod info;
pub mod input;
pub mod logger;
pub mod processing;
pub mod sizing;
pub mod store;
pub mod utils;
pub mod validation;

pub use archive::{pack_archive, size_label, ArchiveArtifact, ArchiveBuilder, ZipArchiveBuilder};
pub use batch::{run_batch, BatchConverter, BatchOutcome, ConversionFailure, ConversionResult, PackReport};
pub use error::{PackError, Result};
pub use formats::MediaType;
pub use info::{describe_plan, print_plan_report, PlanReport};
pub use input::{collect_image_files, is_image_file, read_dropped_file, track_files, TrackSummary};
pub use processing::{convert_image, decode_image, encode_blob, rasterize, ConvertOptions};
pub use sizing::{nearest_power_of_two, plan_size, SizePlan};
pub use store::{AddOutcome, ImageStore, TrackedImage};
