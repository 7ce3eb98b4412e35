//! Table file schema
//!
//! A table file is a fixed sequence of blocks:
//!
//! ```text
//! PLIB  version            (reduced block)
//! CNFG  configuration      (string)
//! NTRY  n_entries          (u32)
//! NCHN  n_channels         (u32)
//! NVXL  n_voxels           (u32)
//! per axis L in X, Y, Z:
//!   AXIL bookmark, NBOL n_steps (u32), MINL/MAXL/STEL (f64), ENDL bookmark
//! PHVS  n_entries x f32    (raw payload)
//! DONE  bookmark
//! ```
//!
//! Files are written in three appending phases (header, values, footer)
//! driven by [`TableWriter`]; [`probe`] reports how far an interrupted write
//! got.

use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use voxtab_core::{
    decode_values, keys, validate_version, Axis, AxisSpec, Block, BlockInfo, MemoryTable,
    TableHeader, VoxtabError, VALUE_SIZE,
};

use crate::block_file::BlockFile;
use crate::config::TableConfig;
use crate::error::{TableError, TableResult};

const PAYLOAD_DESCR: &str = "table values";
const FOOTER_DESCR: &str = "end of table marker";

/// Parsed header plus the position of the value payload
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub header: TableHeader,
    /// Absolute file offset of the first value
    pub data_offset: u64,
}

impl TableLayout {
    /// File offset of the value with flat index `index`
    pub fn offset_of(&self, index: u64) -> u64 {
        self.data_offset + index * VALUE_SIZE as u64
    }

    /// File offset one past the last value
    pub fn payload_end(&self) -> u64 {
        self.data_offset + self.header.payload_size()
    }
}

impl std::fmt::Display for TableLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.header)?;
        write!(f, "data starts at file offset: 0x{:x}", self.data_offset)
    }
}

/// Progress of a table write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WriteState {
    Empty,
    HeaderWritten,
    DataWritten,
    Complete,
}

impl std::fmt::Display for WriteState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WriteState::Empty => "empty",
            WriteState::HeaderWritten => "header written",
            WriteState::DataWritten => "data written",
            WriteState::Complete => "complete",
        };
        f.write_str(name)
    }
}

fn format_error(path: &Path, description: &str, source: VoxtabError) -> TableError {
    TableError::Format {
        path: path.to_path_buf(),
        description: description.to_string(),
        source,
    }
}

/// Read the blocks from the version up to the end of the Z axis
fn read_header_blocks<S: Read + Seek>(file: &mut BlockFile<S>) -> TableResult<TableHeader> {
    let version = file.read_version(keys::VERSION, "format version")?;
    validate_version(version).map_err(|err| format_error(file.path(), "format version", err))?;

    let configuration = file.read_string(keys::CONFIGURATION, "configuration")?;
    let n_entries = file.read_number::<u32>(keys::N_ENTRIES, "number of entries")?;
    let n_channels = file.read_number::<u32>(keys::N_CHANNELS, "number of channels")?;
    let n_voxels = file.read_number::<u32>(keys::N_VOXELS, "number of voxels")?;

    let mut axes = [AxisSpec::default(); 3];
    for axis in Axis::ALL {
        let keys = axis.keys();
        file.read_bookmark(keys.start, &format!("start of axis {axis}"))?;
        let n_steps = file.read_number::<u32>(keys.n_steps, &format!("steps on axis {axis}"))?;
        let lower = file.read_number::<f64>(keys.lower, &format!("lower bound of axis {axis}"))?;
        let upper = file.read_number::<f64>(keys.upper, &format!("upper bound of axis {axis}"))?;
        let step = file.read_number::<f64>(keys.step, &format!("step of axis {axis}"))?;
        file.read_bookmark(keys.end, &format!("end of axis {axis}"))?;
        axes[axis.index()] = AxisSpec::new(n_steps, lower, upper, step);
    }

    Ok(TableHeader {
        version,
        configuration,
        n_entries,
        n_channels,
        n_voxels,
        axes,
    })
}

/// Read the payload block header and check it against the entry count
fn read_payload_info<S: Read + Seek>(
    file: &mut BlockFile<S>,
    header: &TableHeader,
) -> TableResult<BlockInfo> {
    let info = file.read_block_header(Some(keys::PAYLOAD), PAYLOAD_DESCR)?;
    if info.size != header.payload_size() {
        return Err(format_error(
            file.path(),
            PAYLOAD_DESCR,
            VoxtabError::PayloadSize {
                key: keys::PAYLOAD,
                expected: header.payload_size(),
                found: info.size,
            },
        ));
    }
    Ok(info)
}

fn parse_layout<S: Read + Seek>(
    file: &mut BlockFile<S>,
    tolerance: f64,
) -> TableResult<TableLayout> {
    let header = read_header_blocks(file)?;
    let info = read_payload_info(file, &header)?;
    let data_offset = file.current_offset()?;
    file.skip_payload(&info, PAYLOAD_DESCR)?;
    file.read_bookmark(keys::DONE, FOOTER_DESCR)?;
    header
        .validate_layout(tolerance)
        .map_err(|err| format_error(file.path(), "table header", err))?;
    Ok(TableLayout {
        header,
        data_offset,
    })
}

/// Parse and validate the header of a table file
pub fn read_header<P: AsRef<Path>>(path: P) -> TableResult<TableLayout> {
    read_header_with(path, &TableConfig::default())
}

/// [`read_header`] with explicit configuration
pub fn read_header_with<P: AsRef<Path>>(path: P, config: &TableConfig) -> TableResult<TableLayout> {
    config.validate()?;
    let mut file = BlockFile::open(path.as_ref())?;
    let layout = parse_layout(&mut file, config.axis_tolerance)?;
    debug!(
        path = %path.as_ref().display(),
        n_voxels = layout.header.n_voxels,
        n_channels = layout.header.n_channels,
        data_offset = layout.data_offset,
        "parsed table header"
    );
    Ok(layout)
}

/// Load a whole table into memory
pub fn read_table<P: AsRef<Path>>(path: P) -> TableResult<MemoryTable> {
    read_table_with(path, &TableConfig::default())
}

/// [`read_table`] with explicit configuration
pub fn read_table_with<P: AsRef<Path>>(path: P, config: &TableConfig) -> TableResult<MemoryTable> {
    config.validate()?;
    let path = path.as_ref();
    let mut file = BlockFile::open(path)?;
    let header = read_header_blocks(&mut file)?;
    let info = read_payload_info(&mut file, &header)?;
    let bytes = file.read_payload(&info, PAYLOAD_DESCR)?;
    file.read_bookmark(keys::DONE, FOOTER_DESCR)?;

    let mut values = vec![0.0f32; header.n_entries as usize];
    decode_values(&bytes, &mut values).map_err(|err| format_error(path, PAYLOAD_DESCR, err))?;
    MemoryTable::with_tolerance(header, values, config.axis_tolerance)
        .map_err(|err| format_error(path, "table header", err))
}

fn create_parent_dirs(path: &Path) -> TableResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| TableError::Io {
                action: "create the directory of",
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

fn check_value_count(path: &Path, header: &TableHeader, values: &[f32]) -> TableResult<()> {
    let expected = u64::from(header.n_entries);
    if values.len() as u64 != expected {
        return Err(format_error(
            path,
            PAYLOAD_DESCR,
            VoxtabError::ValueCount {
                expected,
                found: values.len() as u64,
            },
        ));
    }
    Ok(())
}

fn emit_header<S: io::Write>(file: &mut BlockFile<S>, header: &TableHeader) -> TableResult<()> {
    file.write_block(&Block::Version {
        key: keys::VERSION,
        version: header.version,
    })?;
    file.write_block(&Block::string(keys::CONFIGURATION, header.configuration.as_str()))?;
    file.write_block(&Block::number(keys::N_ENTRIES, header.n_entries))?;
    file.write_block(&Block::number(keys::N_CHANNELS, header.n_channels))?;
    file.write_block(&Block::number(keys::N_VOXELS, header.n_voxels))?;
    for axis in Axis::ALL {
        let keys = axis.keys();
        let spec = header.axis(axis);
        file.write_block(&Block::Bookmark { key: keys.start })?;
        file.write_block(&Block::number(keys.n_steps, spec.n_steps))?;
        file.write_block(&Block::number(keys.lower, spec.lower))?;
        file.write_block(&Block::number(keys.upper, spec.upper))?;
        file.write_block(&Block::number(keys.step, spec.step))?;
        file.write_block(&Block::Bookmark { key: keys.end })?;
    }
    Ok(())
}

fn append_values(path: &Path, values: &[f32]) -> TableResult<()> {
    let mut file = BlockFile::append(path)?;
    file.write_values(keys::PAYLOAD, values)?;
    file.flush()
}

fn append_footer(path: &Path) -> TableResult<()> {
    let mut file = BlockFile::append(path)?;
    file.write_block(&Block::Bookmark { key: keys::DONE })?;
    file.flush()
}

/// Three-phase table writer
///
/// The header is normalised and validated on construction, so an invalid
/// table never reaches the disk. Phases must run in order: header, data,
/// footer.
#[derive(Debug)]
pub struct TableWriter {
    path: PathBuf,
    header: TableHeader,
    config: TableConfig,
    state: WriteState,
}

impl TableWriter {
    pub fn new<P: AsRef<Path>>(
        path: P,
        header: TableHeader,
        config: &TableConfig,
    ) -> TableResult<Self> {
        config.validate()?;
        let path = path.as_ref().to_path_buf();
        let header = header.normalized();
        header
            .validate(config.axis_tolerance)
            .map_err(|err| format_error(&path, "table header", err))?;
        Ok(Self {
            path,
            header,
            config: config.clone(),
            state: WriteState::Empty,
        })
    }

    pub fn state(&self) -> WriteState {
        self.state
    }

    /// Normalised header that is (or will be) written
    pub fn header(&self) -> &TableHeader {
        &self.header
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_header(self) -> TableHeader {
        self.header
    }

    fn expect_state(&self, expected: WriteState, step: &'static str) -> TableResult<()> {
        if self.state != expected {
            return Err(TableError::WriteSequence {
                path: self.path.clone(),
                state: self.state,
                step,
            });
        }
        Ok(())
    }

    /// Create (or truncate) the file and write the header blocks
    pub fn write_header(&mut self) -> TableResult<()> {
        self.expect_state(WriteState::Empty, "write the header of")?;
        if self.config.create_parent_dirs {
            create_parent_dirs(&self.path)?;
        }
        let mut file = BlockFile::create(&self.path)?;
        emit_header(&mut file, &self.header)?;
        file.flush()?;
        self.state = WriteState::HeaderWritten;
        debug!(path = %self.path.display(), "table header written");
        Ok(())
    }

    /// Append the value payload; `values` must hold exactly `n_entries`
    /// values
    pub fn write_data(&mut self, values: &[f32]) -> TableResult<()> {
        self.expect_state(WriteState::HeaderWritten, "write the values of")?;
        check_value_count(&self.path, &self.header, values)?;
        append_values(&self.path, values)?;
        self.state = WriteState::DataWritten;
        debug!(path = %self.path.display(), n_values = values.len(), "table values written");
        Ok(())
    }

    /// Append the end-of-table bookmark
    pub fn write_footer(&mut self) -> TableResult<()> {
        self.expect_state(WriteState::DataWritten, "write the footer of")?;
        append_footer(&self.path)?;
        self.state = WriteState::Complete;
        info!(
            path = %self.path.display(),
            n_voxels = self.header.n_voxels,
            n_channels = self.header.n_channels,
            "table written"
        );
        Ok(())
    }
}

/// Create a table file holding only the header blocks; returns the
/// normalised header
pub fn write_header<P: AsRef<Path>>(path: P, header: &TableHeader) -> TableResult<TableHeader> {
    let mut writer = TableWriter::new(path, header.clone(), &TableConfig::default())?;
    writer.write_header()?;
    Ok(writer.into_header())
}

/// Append the value payload to a file holding the header of `header`
pub fn write_data<P: AsRef<Path>>(
    path: P,
    header: &TableHeader,
    values: &[f32],
) -> TableResult<()> {
    let path = path.as_ref();
    check_value_count(path, header, values)?;
    append_values(path, values)
}

/// Append the end-of-table bookmark
pub fn write_footer<P: AsRef<Path>>(path: P) -> TableResult<()> {
    append_footer(path.as_ref())
}

/// Write a complete table file; returns the normalised header
pub fn write_file<P: AsRef<Path>>(
    path: P,
    header: &TableHeader,
    values: &[f32],
) -> TableResult<TableHeader> {
    write_file_with(path, header, values, &TableConfig::default())
}

/// [`write_file`] with explicit configuration
pub fn write_file_with<P: AsRef<Path>>(
    path: P,
    header: &TableHeader,
    values: &[f32],
    config: &TableConfig,
) -> TableResult<TableHeader> {
    let mut writer = TableWriter::new(path, header.clone(), config)?;
    check_value_count(writer.path(), writer.header(), values)?;
    writer.write_header()?;
    writer.write_data(values)?;
    writer.write_footer()?;
    Ok(writer.into_header())
}

fn truncated<T>(result: TableResult<T>) -> TableResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_truncation() => Ok(None),
        Err(err) => Err(err),
    }
}

/// Report how far the write of a table file got
///
/// A missing file is [`WriteState::Empty`]. Blocks that are present must be
/// well formed; header consistency is not checked.
pub fn probe<P: AsRef<Path>>(path: P) -> TableResult<WriteState> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(WriteState::Empty),
        Err(source) => {
            return Err(TableError::Io {
                action: "open",
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let mut file = BlockFile::new(file, path);

    let Some(header) = truncated(read_header_blocks(&mut file))? else {
        return Ok(WriteState::Empty);
    };
    let Some(info) = truncated(read_payload_info(&mut file, &header))? else {
        return Ok(WriteState::HeaderWritten);
    };
    if truncated(file.skip_payload(&info, PAYLOAD_DESCR))?.is_none() {
        return Ok(WriteState::HeaderWritten);
    }
    if truncated(file.read_bookmark(keys::DONE, FOOTER_DESCR))?.is_none() {
        return Ok(WriteState::DataWritten);
    }
    Ok(WriteState::Complete)
}
