use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use crate::error::Result;
use crate::trace::{parse_answer, parse_trace, TraceFile};

/// Reads and parses a trace file
pub fn read_trace_file(path: impl AsRef<Path>) -> Result<TraceFile> {
    let file = File::open(path)?;
    // Mapping an empty file fails on some platforms
    if file.metadata()?.len() == 0 {
        return parse_trace(&[]);
    }
    // Compatibility on other systems
    #[cfg(not(unix))]
    {
        use std::io::Read;
        let mut file = file;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        parse_trace(&buf)
    }
    // Memory map the file on unix systems, the parser reads it front to back exactly once
    #[cfg(unix)]
    {
        use memmap2::{Advice, Mmap};
        // SAFETY: the map is only read while this function runs; a trace file being truncated
        // underneath us is not something we try to guard against
        let map = unsafe { Mmap::map(&file)? };
        map.advise(Advice::Sequential)?;
        parse_trace(&map)
    }
}

/// Writes a trace file, replacing any existing file
pub fn write_trace_file(path: impl AsRef<Path>, trace: &TraceFile) -> Result<()> {
    let file = File::create(path)?;
    trace.write_to(BufWriter::new(file))?;
    Ok(())
}

pub fn read_answer_file(path: impl AsRef<Path>) -> Result<u64> {
    parse_answer(&fs::read(path)?)
}

pub fn write_answer_file(path: impl AsRef<Path>, hits: u64) -> Result<()> {
    fs::write(path, hits.to_string())?;
    Ok(())
}
