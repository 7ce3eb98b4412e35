mod common;

use tempfile::TempDir;
use voxtab::{
    read_header, read_table, version, write_file, AxisSpec, MemoryTable, TableHandle, TableHeader,
    VoxelTable, WORD_SIZE,
};

use common::{block_offsets, small_table};

#[test]
fn test_round_trip_preserves_header_and_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("round_trip.vxt");
    let axes = [
        AxisSpec::from_steps(-37.5, 7.5, 10),
        AxisSpec::from_steps(-200.0, 20.0, 20),
        AxisSpec::from_steps(-50.0, 12.5, 8),
    ];
    let header = TableHeader::new("geometry: test; channels: 6", 6, axes).unwrap();
    let values: Vec<f32> = (0..header.n_entries)
        .map(|i| (i as f32 * 0.37).sin())
        .collect();

    let written = write_file(&path, &header, &values).unwrap();
    assert_eq!(written.version, version::LATEST);

    let table = TableHandle::open(&path).unwrap();
    assert_eq!(table.metadata(), &written);
    assert_eq!(table.metadata().configuration, "geometry: test; channels: 6");
    for voxel in [0, 1, 799, 1599] {
        let row = table.row(voxel).unwrap();
        assert_eq!(row, &values[voxel * 6..voxel * 6 + 6]);
        for (channel, expected) in row.iter().enumerate() {
            assert_eq!(table.value(voxel, channel).unwrap().to_bits(), expected.to_bits());
        }
    }

    let loaded = read_table(&path).unwrap();
    let expected = MemoryTable::new(header, values).unwrap();
    assert_eq!(loaded, expected);
}

#[test]
fn test_point_and_row_agree() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("small.vxt");
    let (header, values) = small_table();
    write_file(&path, &header, &values).unwrap();

    let table = TableHandle::open(&path).unwrap();
    assert_eq!(table.value(2, 1).unwrap(), 9.0);
    assert_eq!(table.row(2).unwrap()[1], 9.0);
    for voxel in 0..table.n_voxels() {
        let row = table.row(voxel).unwrap();
        for channel in 0..table.n_channels() {
            assert_eq!(table.value(voxel, channel).unwrap(), row[channel]);
        }
    }
}

#[test]
fn test_every_block_is_word_aligned() {
    let dir = TempDir::new().unwrap();
    let (mut header, values) = small_table();
    for len in 0..9 {
        header.configuration = "c".repeat(len);
        let path = dir.path().join(format!("aligned_{len}.vxt"));
        write_file(&path, &header, &values).unwrap();

        let file_len = std::fs::metadata(&path).unwrap().len();
        assert_eq!(file_len % WORD_SIZE as u64, 0);
        for offset in block_offsets(&path) {
            assert_eq!(offset % WORD_SIZE as u64, 0, "block at {offset} with config of {len}");
        }
        let layout = read_header(&path).unwrap();
        assert_eq!(layout.data_offset % WORD_SIZE as u64, 0);
        assert_eq!(layout.header.configuration.len(), len);
    }
}

#[test]
fn test_padding_bytes_are_zero() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("padding.vxt");
    let (mut header, values) = small_table();
    header.configuration = "abcde".to_string();
    write_file(&path, &header, &values).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    // version block is 8 bytes, then CNFG header (12) and 5 payload bytes
    assert_eq!(&bytes[8..12], b"CNFG");
    assert_eq!(&bytes[20..25], b"abcde");
    assert_eq!(&bytes[25..28], &[0, 0, 0]);
    assert_eq!(&bytes[28..32], b"NTRY");
}

#[test]
fn test_reader_ignores_padding_content() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dirty_padding.vxt");
    let (mut header, values) = small_table();
    header.configuration = "abcde".to_string();
    write_file(&path, &header, &values).unwrap();

    let mut bytes = std::fs::read(&path).unwrap();
    bytes[25..28].copy_from_slice(b"ZZZ");
    std::fs::write(&path, &bytes).unwrap();

    let layout = read_header(&path).unwrap();
    assert_eq!(layout.header.configuration, "abcde");
    assert_eq!(read_table(&path).unwrap().values(), values.as_slice());
}

#[test]
fn test_configuration_with_trailing_nuls_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nuls.vxt");
    let (mut header, values) = small_table();
    header.configuration = "abc\0".to_string();

    let written = write_file(&path, &header, &values).unwrap();
    assert_eq!(written.configuration, "abc");
    assert_eq!(read_header(&path).unwrap().header, written);
    assert_eq!(TableHandle::open(&path).unwrap().metadata(), &written);
}

#[test]
fn test_trait_objects_share_queries() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trait.vxt");
    let (header, values) = small_table();
    write_file(&path, &header, &values).unwrap();

    fn sum_row<T: VoxelTable>(table: &T, voxel: usize) -> f32 {
        table.row(voxel).ok().map(|row| row.iter().sum()).unwrap_or(f32::NAN)
    }

    let lazy = TableHandle::open(&path).unwrap();
    let memory = MemoryTable::new(header, values).unwrap();
    assert_eq!(sum_row(&lazy, 1), 22.0);
    assert_eq!(sum_row(&memory, 1), 22.0);
}
