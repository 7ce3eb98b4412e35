//! Query a voxel table written by the write_table example

use std::time::Instant;

use voxtab::{TableHandle, TableResult};

fn main() -> TableResult<()> {
    let filename = "example_table.vxt";

    if !std::path::Path::new(filename).exists() {
        println!("File '{filename}' not found!");
        println!("   Run 'cargo run --example write_table' first");
        return Ok(());
    }

    println!("Opening '{filename}'...");
    let start = Instant::now();
    let table = TableHandle::open(filename)?;
    println!(
        "Header parsed in {:.3}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );
    println!("\n{}\n", table.layout());

    println!("Point queries:");
    let cells = [(0, 0), (1234, 5), (16_000, 63), (31_999, 0)];
    for (voxel, channel) in cells {
        let start = Instant::now();
        match table.value(voxel, channel) {
            Ok(value) => println!(
                "   table[{voxel}, {channel}] = {value:.6} ({:.3}us)",
                start.elapsed().as_secs_f64() * 1e6
            ),
            Err(err) => println!("   table[{voxel}, {channel}]: {err}"),
        }
    }

    println!("\nRow query:");
    let start = Instant::now();
    let row = table.row(1234)?;
    let row_time = start.elapsed();
    let max = row.iter().copied().fold(f32::MIN, f32::max);
    println!(
        "   voxel 1234: {} channels, max {max:.6} ({:.3}us)",
        row.len(),
        row_time.as_secs_f64() * 1e6
    );

    println!("\nOut of range:");
    if let Err(err) = table.value(table.n_voxels(), 0) {
        println!("   {err}");
    }

    let start = Instant::now();
    let mut row = table.make_row_buffer();
    let mut total = 0.0f64;
    for voxel in 0..table.n_voxels() {
        table.fill_row(voxel, &mut row)?;
        total += row.iter().map(|&v| f64::from(v)).sum::<f64>();
    }
    println!(
        "\nScanned all {} rows in {:.3}ms (sum {total:.3})",
        table.n_voxels(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}
