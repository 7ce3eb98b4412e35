//! Write a voxel table to a .vxt file

use std::time::Instant;

use voxtab::{write_file, AxisSpec, TableHeader, TableResult};

fn main() -> TableResult<()> {
    let filename = "example_table.vxt";

    // 40 x 40 x 20 voxels of 10 cm, 64 channels each
    let axes = [
        AxisSpec::from_steps(-200.0, 10.0, 40),
        AxisSpec::from_steps(-200.0, 10.0, 40),
        AxisSpec::from_steps(0.0, 10.0, 20),
    ];
    let header = TableHeader::new("example detector", 64, axes)?;
    println!(
        "Generating {} voxels x {} channels...",
        header.n_voxels, header.n_channels
    );

    let start = Instant::now();
    let values: Vec<f32> = (0..header.n_entries)
        .map(|i| {
            let voxel = i / header.n_channels;
            let channel = i % header.n_channels;
            (voxel as f32 * 0.01).sin().abs() / (1.0 + channel as f32)
        })
        .collect();
    println!(
        "Values generated in {:.3}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    println!("Writing '{filename}'...");
    let start = Instant::now();
    let written = write_file(filename, &header, &values)?;
    let write_time = start.elapsed();
    let size = std::fs::metadata(filename).map(|m| m.len()).unwrap_or(0);
    println!(
        "Wrote {size} bytes in {:.3}ms ({:.1} MB/s)",
        write_time.as_secs_f64() * 1000.0,
        size as f64 / write_time.as_secs_f64() / 1e6
    );

    println!("\n{written}");
    println!("\nRun 'cargo run --example read_table' to query it");
    Ok(())
}
