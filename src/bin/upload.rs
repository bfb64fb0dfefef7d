use std::{
    fs::{read_dir, read_to_string},
    path::{Path, PathBuf},
};

use annotate::{Segment, Uploadable};
use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use futures::future::try_join_all;
use ndarray::Array2;
use reqwest::Client;
use serde_json::from_str;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// Mask image file, inference sidecar JSON file, or a directory of either
    #[arg(short, long)]
    input: PathBuf,

    /// Annotation endpoint to POST uploadables to
    #[arg(short, long)]
    endpoint: String,

    #[arg(short, long)]
    token: String,

    /// Class label attached to the uploaded masks
    #[arg(short, long)]
    class_id: i64,

    /// Sidecar files: pick the segment at this index
    #[arg(long)]
    index: Option<u8>,

    /// Sidecar files: pick the segment with this label
    #[arg(long)]
    label: Option<String>,
}

/// Read a mask image file as a boolean plane, full-white pixels true.
fn read_bool_mask(path: &Path) -> Result<Array2<bool>> {
    let image = image::open(path)
        .with_context(|| format!("failed to read mask image \"{}\"", path.display()))?
        .to_luma8();
    let (width, height) = image.dimensions();
    Ok(Array2::from_shape_fn(
        (height as usize, width as usize),
        |(r, c)| image.get_pixel(c as u32, r as u32)[0] == 255,
    ))
}

fn build_uploadable(path: &Path, args: &Args) -> Result<Uploadable> {
    if path.extension().is_some_and(|ext| ext == "json") {
        let content = read_to_string(path)?;
        let segments: Vec<Segment> = from_str(&content)?;

        let segment = match (&args.index, &args.label) {
            (Some(index), _) => segments
                .get(*index as usize)
                .context("Segment index out of range.")?,
            (None, Some(label)) => segments
                .iter()
                .find(|segment| segment.label == label.as_str())
                .context("Label was not found.")?,
            (None, None) => {
                bail!("Either index or label must be provided for sidecar files.");
            }
        };

        Ok(segment.to_uploadable(args.class_id)?)
    } else {
        let mask = read_bool_mask(path)?.into_dyn();
        Ok(Uploadable::from_bool_mask(&mask, args.class_id)?)
    }
}

async fn upload(
    client: Client,
    endpoint: String,
    token: String,
    uploadable: Uploadable,
) -> Result<()> {
    let res = client
        .post(&endpoint)
        .bearer_auth(&token)
        .json(&uploadable)
        .send()
        .await?;

    ensure!(
        res.status().is_success(),
        "upload was rejected with status {}",
        res.status()
    );

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let client = Client::new();

    if args.input.is_dir() {
        let mut futures = Vec::new();
        for entry in read_dir(&args.input)? {
            let entry = entry?;
            let path = entry.path();
            let uploadable = build_uploadable(&path, &args)?;
            info!(path = %path.display(), "queueing annotation upload");
            futures.push(upload(
                client.clone(),
                args.endpoint.clone(),
                args.token.clone(),
                uploadable,
            ));
        }
        try_join_all(futures).await?;
    } else {
        let uploadable = build_uploadable(&args.input, &args)?;
        info!(path = %args.input.display(), "uploading annotation");
        upload(client, args.endpoint.clone(), args.token.clone(), uploadable).await?;
    }

    Ok(())
}
