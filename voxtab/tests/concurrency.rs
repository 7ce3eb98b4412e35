use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tempfile::TempDir;
use voxtab::{write_file, AxisSpec, TableHandle, TableHeader};

fn random_table(dir: &TempDir) -> (std::path::PathBuf, TableHeader, Vec<f32>) {
    let axes = [
        AxisSpec::from_steps(-50.0, 10.0, 10),
        AxisSpec::from_steps(-50.0, 10.0, 8),
        AxisSpec::from_steps(0.0, 25.0, 6),
    ];
    let header = TableHeader::new("random", 17, axes).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let values: Vec<f32> = (0..header.n_entries)
        .map(|_| rng.gen_range(-1.0e3..1.0e3))
        .collect();
    let path = dir.path().join("random.vxt");
    let header = write_file(&path, &header, &values).unwrap();
    (path, header, values)
}

#[test]
fn test_scoped_threads_share_one_handle() {
    let dir = TempDir::new().unwrap();
    let (path, header, values) = random_table(&dir);
    let table = TableHandle::open(&path).unwrap();
    let n_voxels = header.n_voxels as usize;
    let n_channels = header.n_channels as usize;

    std::thread::scope(|scope| {
        for seed in 0..8u64 {
            let table = &table;
            let values = &values;
            scope.spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                for _ in 0..500 {
                    let voxel = rng.gen_range(0..n_voxels);
                    let channel = rng.gen_range(0..n_channels);
                    let expected = values[voxel * n_channels + channel];
                    assert_eq!(table.value(voxel, channel).unwrap(), expected);
                    if channel == 0 {
                        let row = table.row(voxel).unwrap();
                        assert_eq!(row, &values[voxel * n_channels..(voxel + 1) * n_channels]);
                    }
                }
            });
        }
    });
}

#[test]
fn test_parallel_rows_match_reference() {
    let dir = TempDir::new().unwrap();
    let (path, header, values) = random_table(&dir);
    let table = Arc::new(TableHandle::open(&path).unwrap());
    let n_channels = header.n_channels as usize;

    let rows: Vec<Vec<f32>> = (0..header.n_voxels as usize)
        .into_par_iter()
        .map(|voxel| table.row(voxel).unwrap())
        .collect();
    for (row, expected) in rows.iter().zip(values.chunks(n_channels)) {
        assert_eq!(row.as_slice(), expected);
    }

    (0..values.len()).into_par_iter().for_each(|index| {
        let (voxel, channel) = (index / n_channels, index % n_channels);
        let value = table.value(voxel, channel).unwrap();
        assert_eq!(
            value.to_bits(),
            values[index].to_bits(),
            "voxel {voxel} channel {channel}"
        );
    });
}

#[test]
fn test_handles_on_the_same_file() {
    let dir = TempDir::new().unwrap();
    let (path, header, values) = random_table(&dir);
    let n_channels = header.n_channels as usize;
    let handles: Vec<TableHandle> = (0..4).map(|_| TableHandle::open(&path).unwrap()).collect();

    handles.par_iter().enumerate().for_each(|(i, table)| {
        let mut row = table.make_row_buffer();
        for voxel in (i..table.n_voxels()).step_by(handles.len()) {
            table.fill_row(voxel, &mut row).unwrap();
            assert_eq!(row, &values[voxel * n_channels..(voxel + 1) * n_channels]);
        }
    });
}
