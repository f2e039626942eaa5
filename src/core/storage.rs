//=========================================================================
// Data Channel
//=========================================================================
//
// One read or one write stream at a time, shared across scenes for save
// data and the like. Opening a second stream while one is in progress is
// refused and logged; the process carries on.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

//=== DataChannel =========================================================

#[derive(Debug, Default)]
pub struct DataChannel {
    reader: Option<(PathBuf, BufReader<File>)>,
    writer: Option<(PathBuf, BufWriter<File>)>,
}

impl DataChannel {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Reading ----------------------------------------------------------

    /// Opens `path` for reading.
    ///
    /// Returns `Ok(false)` without touching the file if a read or write is
    /// already in progress.
    pub fn begin_reading(&mut self, path: impl AsRef<Path>) -> io::Result<bool> {
        let path = path.as_ref();
        if let Some(busy) = self.busy_with() {
            warn!("Cannot read {}: {} in progress", path.display(), busy);
            return Ok(false);
        }

        let file = File::open(path)?;
        debug!("Reading {}", path.display());
        self.reader = Some((path.to_path_buf(), BufReader::new(file)));
        Ok(true)
    }

    /// Closes the read stream. No-op when not reading.
    pub fn stop_reading(&mut self) {
        if let Some((path, _)) = self.reader.take() {
            debug!("Stopped reading {}", path.display());
        }
    }

    pub fn reader(&mut self) -> Option<&mut BufReader<File>> {
        self.reader.as_mut().map(|(_, reader)| reader)
    }

    pub fn is_reading(&self) -> bool {
        self.reader.is_some()
    }

    //--- Writing ----------------------------------------------------------

    /// Creates (or truncates) `path` for writing.
    ///
    /// Returns `Ok(false)` without touching the file if a read or write is
    /// already in progress.
    pub fn begin_writing(&mut self, path: impl AsRef<Path>) -> io::Result<bool> {
        let path = path.as_ref();
        if let Some(busy) = self.busy_with() {
            warn!("Cannot write {}: {} in progress", path.display(), busy);
            return Ok(false);
        }

        let file = File::create(path)?;
        debug!("Writing {}", path.display());
        self.writer = Some((path.to_path_buf(), BufWriter::new(file)));
        Ok(true)
    }

    /// Flushes and closes the write stream. No-op when not writing.
    pub fn stop_writing(&mut self) -> io::Result<()> {
        let Some((path, mut writer)) = self.writer.take() else {
            return Ok(());
        };

        writer.flush()?;
        debug!("Stopped writing {}", path.display());
        Ok(())
    }

    pub fn writer(&mut self) -> Option<&mut BufWriter<File>> {
        self.writer.as_mut().map(|(_, writer)| writer)
    }

    pub fn is_writing(&self) -> bool {
        self.writer.is_some()
    }

    fn busy_with(&self) -> Option<String> {
        if let Some((path, _)) = &self.reader {
            return Some(format!("read of {}", path.display()));
        }
        if let Some((path, _)) = &self.writer {
            return Some(format!("write of {}", path.display()));
        }
        None
    }
}
