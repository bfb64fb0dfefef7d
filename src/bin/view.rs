use std::{fs::read_to_string, path::PathBuf};

use annotate::AnnotationRecord;
use anyhow::{ensure, Context, Result};
use clap::Parser;
use image::{GrayImage, Luma, Rgb};
use serde_json::from_str;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// Stored annotation record JSON
    #[arg(short, long)]
    annotation: PathBuf,

    /// Source image to composite the mask over; when omitted the mask
    /// itself is written as an 8-bit grayscale image
    #[arg(short, long)]
    image: Option<PathBuf>,

    #[arg(short, long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let content = read_to_string(&args.annotation)?;
    let record: AnnotationRecord = from_str(&content)?;
    let payload = record
        .annotation
        .context("annotation record has no mask payload")?;
    let mask = payload.mask_bool()?;
    let (height, width) = mask.dim();

    match args.image {
        None => {
            let gray = GrayImage::from_fn(width as u32, height as u32, |x, y| {
                Luma([if mask[[y as usize, x as usize]] { 255 } else { 0 }])
            });
            gray.save(&args.output)?;
        }
        Some(path) => {
            let mut image = image::open(&path)?.to_rgb8();
            ensure!(
                image.dimensions() == (width as u32, height as u32),
                "mask is {}x{} but image \"{}\" is {}x{}",
                width,
                height,
                path.display(),
                image.width(),
                image.height()
            );
            for ((r, c), &set) in mask.indexed_iter() {
                if !set {
                    image.put_pixel(c as u32, r as u32, Rgb([0, 0, 0]));
                }
            }
            image.save(&args.output)?;
        }
    }

    info!(output = %args.output.display(), "wrote mask view");
    Ok(())
}
