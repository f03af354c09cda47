use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::debug;
use tempfile::TempPath;

use crate::error::{Error, Result};
use crate::train::page::Page;

const SCRATCH_PREFIX: &str = "nn_training_data";
const VALUE_BYTES: usize = std::mem::size_of::<f64>();

/// Append-only stream of fixed-width `f64` records in a temporary file.
///
/// Records are raw little-endian values with no delimiters, so a record is
/// `width * 8` bytes. The backing file is deleted when the stream is dropped.
struct RecordWriter {
    writer: BufWriter<File>,
    path: TempPath,
    width: usize,
}

impl RecordWriter {
    fn create(dir: &Path, width: usize) -> Result<RecordWriter> {
        let file = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempfile_in(dir)
            .map_err(|e| {
                Error::critical(format!(
                    "could not create a scratch file in {}: {e}",
                    dir.display()
                ))
            })?;
        let (file, path) = file.into_parts();
        debug!("created scratch file {}", path.display());
        Ok(RecordWriter { writer: BufWriter::new(file), path, width })
    }

    fn append(&mut self, record: &[f64]) -> Result<()> {
        debug_assert_eq!(record.len(), self.width);
        for value in record {
            self.writer
                .write_all(&value.to_le_bytes())
                .map_err(|e| scratch_io("write to", &self.path, e))?;
        }
        Ok(())
    }

    fn into_reader(self) -> Result<RecordReader> {
        let RecordWriter { writer, path, width } = self;
        let mut file = writer
            .into_inner()
            .map_err(|e| scratch_io("flush", &path, e.into_error()))?;
        file.seek(SeekFrom::Start(0))
            .map_err(|e| scratch_io("rewind", &path, e))?;
        Ok(RecordReader {
            reader: BufReader::new(file),
            path,
            buf: vec![0u8; width * VALUE_BYTES],
        })
    }
}

/// Sequential reader over a stream written by `RecordWriter`.
struct RecordReader {
    reader: BufReader<File>,
    path: TempPath,
    buf: Vec<u8>,
}

impl RecordReader {
    fn rewind(&mut self) -> Result<()> {
        self.reader
            .seek(SeekFrom::Start(0))
            .map(|_| ())
            .map_err(|e| scratch_io("rewind", &self.path, e))
    }

    fn read_records(&mut self, count: usize) -> Result<Vec<Vec<f64>>> {
        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            self.reader
                .read_exact(&mut self.buf)
                .map_err(|e| scratch_io("read from", &self.path, e))?;
            records.push(decode(&self.buf));
        }
        Ok(records)
    }

    fn close(self) -> std::io::Result<()> {
        drop(self.reader);
        self.path.close()
    }
}

fn decode(bytes: &[u8]) -> Vec<f64> {
    bytes
        .chunks_exact(VALUE_BYTES)
        .map(|chunk| {
            let mut raw = [0u8; VALUE_BYTES];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect()
}

fn scratch_io(action: &str, path: &Path, e: std::io::Error) -> Error {
    Error::critical(format!("could not {action} scratch file {}: {e}", path.display()))
}

/// Ingest side of the scratch buffer: one stream for inputs, one for
/// expected outputs.
pub(crate) struct ScratchBuffer {
    inputs: RecordWriter,
    outputs: RecordWriter,
}

impl ScratchBuffer {
    pub(crate) fn create(dir: &Path, input_width: usize, output_width: usize) -> Result<ScratchBuffer> {
        let inputs = RecordWriter::create(dir, input_width)?;
        let outputs = RecordWriter::create(dir, output_width)?;
        Ok(ScratchBuffer { inputs, outputs })
    }

    /// Rows must already be validated against the stream widths.
    pub(crate) fn append(&mut self, page: &Page) -> Result<()> {
        for row in &page.inputs {
            self.inputs.append(row)?;
        }
        for row in &page.outputs {
            self.outputs.append(row)?;
        }
        Ok(())
    }

    pub(crate) fn into_replay(self) -> Result<ScratchReplay> {
        Ok(ScratchReplay {
            inputs: self.inputs.into_reader()?,
            outputs: self.outputs.into_reader()?,
        })
    }
}

/// Replay side of the scratch buffer.
pub(crate) struct ScratchReplay {
    inputs: RecordReader,
    outputs: RecordReader,
}

impl ScratchReplay {
    pub(crate) fn rewind(&mut self) -> Result<()> {
        self.inputs.rewind()?;
        self.outputs.rewind()
    }

    /// Reads the next `count` input/output record pairs.
    pub(crate) fn read_page(&mut self, count: usize) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>)> {
        Ok((self.inputs.read_records(count)?, self.outputs.read_records(count)?))
    }

    /// Closes and deletes both scratch files.
    pub(crate) fn close(self) -> std::io::Result<()> {
        let inputs = self.inputs.close();
        let outputs = self.outputs.close();
        inputs.and(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn records_replay_in_order_after_rewind() {
        let dir = tempfile::tempdir().unwrap();
        let mut scratch = ScratchBuffer::create(dir.path(), 2, 1).unwrap();
        scratch
            .append(&Page::new(vec![vec![0.5, -1.25], vec![3.0, 1e-300]], vec![vec![1.0], vec![0.0]]))
            .unwrap();
        scratch.append(&Page::new(vec![vec![7.0, 8.0]], vec![vec![0.125]])).unwrap();
        let mut replay = scratch.into_replay().unwrap();

        for _ in 0..2 {
            replay.rewind().unwrap();
            let (inputs, outputs) = replay.read_page(2).unwrap();
            assert_eq!(inputs, vec![vec![0.5, -1.25], vec![3.0, 1e-300]]);
            assert_eq!(outputs, vec![vec![1.0], vec![0.0]]);
            let (inputs, outputs) = replay.read_page(1).unwrap();
            assert_eq!(inputs, vec![vec![7.0, 8.0]]);
            assert_eq!(outputs, vec![vec![0.125]]);
        }
        replay.close().unwrap();
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn files_hold_raw_values_without_framing() {
        let dir = tempfile::tempdir().unwrap();
        let mut scratch = ScratchBuffer::create(dir.path(), 3, 2).unwrap();
        scratch.append(&Page::new(vec![vec![1.0, 2.0, 3.0]; 4], vec![vec![0.0, 1.0]; 4])).unwrap();
        let replay = scratch.into_replay().unwrap();
        let mut sizes: Vec<u64> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().metadata().unwrap().len())
            .collect();
        sizes.sort();
        assert_eq!(sizes, vec![4 * 2 * 8, 4 * 3 * 8]);
        drop(replay);
    }

    #[test]
    fn reading_past_the_end_is_critical() {
        let dir = tempfile::tempdir().unwrap();
        let mut scratch = ScratchBuffer::create(dir.path(), 1, 1).unwrap();
        scratch.append(&Page::new(vec![vec![1.0]], vec![vec![1.0]])).unwrap();
        let mut replay = scratch.into_replay().unwrap();
        assert!(matches!(replay.read_page(2), Err(Error::CriticalTraining(_))));
    }

    #[test]
    fn dropping_removes_files() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchBuffer::create(dir.path(), 1, 1).unwrap();
        assert_eq!(entries(dir.path()), 2);
        drop(scratch);
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn missing_directory_is_critical() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(matches!(
            ScratchBuffer::create(&missing, 1, 1),
            Err(Error::CriticalTraining(_))
        ));
    }
}
