use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pot-pack",
    about = "Resize images to power-of-two dimensions and pack them into a zip archive",
    long_about = "pot-pack snaps the width and height of every image to the nearest power of two, \
                  caps the larger side at 2^EXPONENT pixels, and bundles the results into a single \
                  pot-images-<timestamp>.zip. Images that already have power-of-two sizes within the \
                  ceiling are packed byte-for-byte.",
    version,
    after_help = "EXAMPLES:\n  \
    pot-pack pack ./sprites -o ./out\n  \
    pot-pack pack \"./textures/*.png\" -e 10 -q 90\n  \
    pot-pack pack ./art -r -x draft.png -x old.jpg\n  \
    pot-pack plan hero.jpg -e 9"
)]
pub struct Args {
    #[arg(long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[arg(short = 'v', long, global = true, help = "Print per-image decisions")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Resize a batch of images and pack them into a zip archive",
        long_about = "Track every image found in the inputs, resize the active ones to power-of-two \
                      dimensions in parallel, and write one zip archive to the output directory."
    )]
    Pack {
        #[arg(
            required = true,
            help = "Input files, directories or glob patterns",
            long_help = "Each input can be an image file, a directory, or a glob expression. \
                         Examples: './images', '*.png', '/path/to/art/*.{jpg,png}'"
        )]
        inputs: Vec<String>,

        #[arg(
            short = 'o',
            long,
            default_value = ".",
            help = "Directory the archive is written to"
        )]
        output: PathBuf,

        #[arg(
            short = 'e',
            long,
            help = "Max-size exponent (0-14, default: 8)",
            long_help = "The larger side of every resized image is capped at 2^EXPONENT pixels. \
                         The default of 8 gives a 256px ceiling."
        )]
        max_exponent: Option<u32>,

        #[arg(
            short = 'q',
            long,
            help = "Encoding quality for resized images (1-100, default: 80)",
            long_help = "Quality used when a resized image is re-encoded. \
                         For JPEG it is the encoder quality. For PNG: >=90 uses Zopfli, \
                         >=70 uses high compression, <70 uses standard compression."
        )]
        quality: Option<u8>,

        #[arg(
            short = 'x',
            long = "exclude",
            value_name = "NAME",
            help = "Leave an image out of this batch (repeatable)",
            long_help = "File name of a tracked image to mark inactive. \
                         It stays tracked but is not resized or packed."
        )]
        exclude: Vec<String>,

        #[arg(
            short = 'r',
            long,
            help = "Process subdirectories recursively"
        )]
        recursive: bool,

        #[arg(
            short = 'j',
            long,
            value_parser = clap::value_parser!(u16).range(1..),
            help = "Maximum number of worker threads (default: tokio's limit)"
        )]
        threads: Option<u16>,
    },

    #[command(
        about = "Show the size plan for one image",
        long_about = "Decode an image and print its natural size, the power-of-two target size \
                      and whether it would be resized or packed as-is."
    )]
    Plan {
        #[arg(help = "Image file path to analyze")]
        input: PathBuf,

        #[arg(short = 'e', long, help = "Max-size exponent (0-14, default: 8)")]
        max_exponent: Option<u32>,
    },
}
