#![allow(dead_code)]

use std::path::Path;

use voxtab::{keys, Axis, AxisSpec, Block, BlockFile, TableHeader};

/// 3 voxels x 4 channels holding 0..12
pub fn small_table() -> (TableHeader, Vec<f32>) {
    let axes = [
        AxisSpec::from_steps(0.0, 2.0, 3),
        AxisSpec::from_steps(-1.0, 2.0, 1),
        AxisSpec::from_steps(10.0, 5.0, 1),
    ];
    let header = TableHeader::new("3x4 test table", 4, axes).unwrap();
    (header, (0..12).map(|v| v as f32).collect())
}

/// Write the block sequence of a table without any validation
pub fn write_unchecked(path: &Path, header: &TableHeader, values: &[f32]) {
    let mut file = BlockFile::create(path).unwrap();
    file.write_block(&Block::Version {
        key: keys::VERSION,
        version: header.version,
    })
    .unwrap();
    file.write_block(&Block::string(keys::CONFIGURATION, header.configuration.as_str()))
        .unwrap();
    file.write_block(&Block::number(keys::N_ENTRIES, header.n_entries)).unwrap();
    file.write_block(&Block::number(keys::N_CHANNELS, header.n_channels)).unwrap();
    file.write_block(&Block::number(keys::N_VOXELS, header.n_voxels)).unwrap();
    for axis in Axis::ALL {
        let keys = axis.keys();
        let spec = header.axis(axis);
        file.write_block(&Block::Bookmark { key: keys.start }).unwrap();
        file.write_block(&Block::number(keys.n_steps, spec.n_steps)).unwrap();
        file.write_block(&Block::number(keys.lower, spec.lower)).unwrap();
        file.write_block(&Block::number(keys.upper, spec.upper)).unwrap();
        file.write_block(&Block::number(keys.step, spec.step)).unwrap();
        file.write_block(&Block::Bookmark { key: keys.end }).unwrap();
    }
    file.write_values(keys::PAYLOAD, values).unwrap();
    file.write_block(&Block::Bookmark { key: keys::DONE }).unwrap();
    file.flush().unwrap();
}

/// Start offset of every block in a well-formed table file
pub fn block_offsets(path: &Path) -> Vec<u64> {
    let mut file = BlockFile::open(path).unwrap();
    let len = std::fs::metadata(path).unwrap().len();
    file.read_version(keys::VERSION, "version").unwrap();
    let mut offsets = vec![0];
    loop {
        let offset = file.current_offset().unwrap();
        if offset == len {
            return offsets;
        }
        offsets.push(offset);
        file.skip_block(None, "").unwrap();
    }
}
