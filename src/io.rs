use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{OverlapError, Result};
use crate::interval::Interval;

// Returns an Iterator to the Reader of the lines of the file.
pub fn read_lines<P>(filename: P) -> Result<io::Lines<io::BufReader<File>>>
where
    P: AsRef<Path>,
{
    let path = filename.as_ref();
    let file = File::open(path).map_err(|e| OverlapError::io(path, e))?;
    Ok(io::BufReader::new(file).lines())
}

/// Delete `path`, a missing file is not an error
pub fn remove_if_present<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!("removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(OverlapError::io(path, e)),
    }
}

/// Create every missing directory above `path`
pub fn create_path_to_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| OverlapError::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// Fresh output file: parents created, old content removed
pub fn create_output<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    let path = path.as_ref();
    create_path_to_file(path)?;
    remove_if_present(path)?;
    let file = File::create(path).map_err(|e| OverlapError::io(path, e))?;
    Ok(BufWriter::new(file))
}

/// Receives features one at a time (e.g. rows that matched nothing)
pub trait FeatureSink {
    fn accept(&mut self, iv: &Interval) -> Result<()>;
}

impl FeatureSink for Vec<Interval> {
    fn accept(&mut self, iv: &Interval) -> Result<()> {
        self.push(iv.clone());
        Ok(())
    }
}

/// Discards everything
pub struct NullSink;

impl FeatureSink for NullSink {
    fn accept(&mut self, _iv: &Interval) -> Result<()> {
        Ok(())
    }
}

/// Writes BED-6 rows
pub struct BedWriter<W: Write> {
    out: W,
    path: PathBuf,
    delim: char,
    written: usize,
}

impl BedWriter<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Ok(Self::new(create_output(path)?, path))
    }
}

impl<W: Write> BedWriter<W> {
    pub fn new(out: W, path: &Path) -> Self {
        BedWriter {
            out,
            path: path.to_path_buf(),
            delim: '\t',
            written: 0,
        }
    }

    pub fn write(&mut self, iv: &Interval) -> Result<()> {
        writeln!(self.out, "{}", iv.to_bed6(self.delim))
            .map_err(|e| OverlapError::io(&self.path, e))?;
        self.written += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<usize> {
        self.out
            .flush()
            .map_err(|e| OverlapError::io(&self.path, e))?;
        Ok(self.written)
    }
}

impl<W: Write> FeatureSink for BedWriter<W> {
    fn accept(&mut self, iv: &Interval) -> Result<()> {
        self.write(iv)
    }
}

/// Write `features` to a new BED file at `path`
pub fn write_bed<'a, P, I>(features: I, path: P) -> Result<usize>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a Interval>,
{
    let path = path.as_ref();
    info!("writing {}", path.display());
    let mut writer = BedWriter::create(path)?;
    for iv in features {
        writer.write(iv)?;
    }
    let n = writer.finish()?;
    info!("wrote {} features to {}", n, path.display());
    Ok(n)
}
