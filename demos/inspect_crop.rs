//! Prints the sample statistics of a cropped sensor payload.
//!
//! Usage: `cargo run --example inspect_crop -- processed/<name>_crop_<x>_<y>_<w>x<h>.nef`

use std::collections::HashMap;

use anyhow::{Context, bail};

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .context("usage: inspect_crop <cropped raw file>")?;

    let file = std::fs::File::open(&path).with_context(|| format!("cannot open {}", path))?;
    let mut decoder = tiff::decoder::Decoder::new(file)?;
    let (width, height) = decoder.dimensions()?;

    println!("Image: {}x{} pixels", width, height);

    let tiff::decoder::DecodingResult::U16(data) = decoder.read_image()? else {
        bail!("{} is not a 16-bit sensor plane", path);
    };

    let mut counts: HashMap<u16, u64> = HashMap::new();
    for &v in &data {
        *counts.entry(v).or_insert(0) += 1;
    }

    let min = data.iter().copied().min().unwrap_or(0);
    let max = data.iter().copied().max().unwrap_or(0);

    println!("\nSensor samples:");
    println!("  Range: {} - {} (span: {})", min, max, max - min);
    println!("  Unique values: {}", counts.len());
    println!("  Effective bits: {:.2}", (counts.len() as f64).log2());
    println!("  Bits to hold max: {}", u16::BITS - max.leading_zeros());

    // Samples at the top of the observed range are usually clipped highlights
    let clipped = counts.get(&max).copied().unwrap_or(0);
    let total_pixels = width as u64 * height as u64;
    println!(
        "\nAt maximum ({}): {} pixels ({:.2}%)",
        max,
        clipped,
        clipped as f64 / total_pixels.max(1) as f64 * 100.0
    );

    Ok(())
}
