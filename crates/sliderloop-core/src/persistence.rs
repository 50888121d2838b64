//! Plain-text save format.
//!
//! ```text
//! sliderloop_data_v1.0
//! 0.000000 0.250000
//! 104.512000 0.300000
//! ```
//!
//! One header line, then one `time value` pair per line, both with six
//! decimals. Reading stops quietly at the first line that is not exactly two
//! numbers.

use crate::{Error, Event, EventBuffer, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Header written by [`save`].
pub const HEADER: &str = "sliderloop_data_v1.0";

/// Prefix [`load`] requires on the first line.
pub const HEADER_PREFIX: &str = "sliderloop_data";

/// Write the header and every event in order.
pub fn write_events<W: Write>(buffer: &EventBuffer, mut writer: W) -> io::Result<()> {
    writeln!(writer, "{HEADER}")?;
    for event in buffer {
        writeln!(writer, "{:.6} {:.6}", event.time, f64::from(event.value))?;
    }
    writer.flush()
}

/// Clear `buffer` and fill it from `reader`.
///
/// The buffer is cleared before the header is checked, so a
/// [`Error::Format`] leaves it empty. An [`Error::Allocation`] keeps the
/// points read so far.
pub fn read_events<R: BufRead>(
    reader: R,
    buffer: &mut EventBuffer,
    initial_capacity: usize,
) -> Result<usize> {
    buffer.clear();

    let mut lines = reader.lines();
    let header = match lines.next() {
        Some(Ok(line)) => line,
        Some(Err(e)) => return Err(Error::Format(format!("unreadable header: {e}"))),
        None => return Err(Error::Format("missing header".into())),
    };
    if !header.starts_with(HEADER_PREFIX) {
        return Err(Error::Format(format!(
            "expected header starting with '{HEADER_PREFIX}'"
        )));
    }

    for line in lines {
        let Ok(line) = line else { break };
        let Some((time, value)) = parse_point(&line) else {
            break;
        };
        buffer.push(Event::new(time, value as f32), initial_capacity)?;
    }

    Ok(buffer.len())
}

fn parse_point(line: &str) -> Option<(f64, f64)> {
    let mut fields = line.split_whitespace();
    let time = fields.next()?.parse().ok()?;
    let value = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((time, value))
}

/// Open `path` for reading, mapping failure to [`Error::IoOpen`].
pub fn open_reader(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| Error::IoOpen {
            path: path.to_path_buf(),
            source,
        })
}

/// Save `buffer` to `path`, truncating it.
///
/// Only failing to open the file is an error. Write errors part way
/// through are logged and the partial file is left behind.
pub fn save(buffer: &EventBuffer, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| Error::IoOpen {
        path: path.to_path_buf(),
        source,
    })?;

    if let Err(e) = write_events(buffer, BufWriter::new(file)) {
        tracing::warn!("Write error while saving {}: {}", path.display(), e);
    }

    tracing::info!(
        "Saved {} automation points to {}",
        buffer.len(),
        path.display()
    );
    Ok(buffer.len())
}

/// Load `path` into `buffer`.
///
/// If the file cannot be opened the buffer is left alone; any later error
/// leaves it cleared or partially filled (see [`read_events`]).
pub fn load(buffer: &mut EventBuffer, path: impl AsRef<Path>, initial_capacity: usize) -> Result<usize> {
    let path = path.as_ref();
    let reader = open_reader(path)?;
    let count = read_events(reader, buffer, initial_capacity)?;

    tracing::info!("Loaded {} automation points from {}", count, path.display());
    Ok(count)
}
