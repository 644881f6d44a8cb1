//! Label file parser for YOLO-style text files.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use crate::bbox::BoundingBox;

/// Number of leading fields that make up a box record.
const BOX_FIELDS: usize = 5;

/// Parse one label line.
///
/// Reads whitespace-separated fields in the order
/// `class_id x_center y_center width height`. Fields past the fifth (for
/// example a confidence score) are ignored.
///
/// Returns `None` for lines with fewer than five fields, non-numeric or
/// non-finite values, or a negative class id. A fractional class id is
/// truncated (`"2.0"` becomes 2).
pub fn parse_label_line(line: &str) -> Option<BoundingBox> {
    let mut values = [0.0_f64; BOX_FIELDS];
    let mut fields = line.split_whitespace();

    for value in values.iter_mut() {
        let parsed: f64 = fields.next()?.parse().ok()?;
        if !parsed.is_finite() {
            return None;
        }
        *value = parsed;
    }

    let [class_id, x_center, y_center, width, height] = values;
    if class_id < 0.0 || class_id > u32::MAX as f64 {
        return None;
    }

    Some(BoundingBox::new(
        class_id.trunc() as u32,
        x_center,
        y_center,
        width,
        height,
    ))
}

/// Parse the contents of a label file.
///
/// Blank lines are ignored; malformed lines are skipped with a warning
/// naming `source` and the 1-based line number.
pub fn parse_labels(contents: &str, source: &str) -> Vec<BoundingBox> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| parse_line_logged(line, idx + 1, source))
        .collect()
}

fn parse_line_logged(line: &str, line_number: usize, source: &str) -> Option<BoundingBox> {
    if line.trim().is_empty() {
        return None;
    }
    let parsed = parse_label_line(line);
    if parsed.is_none() {
        log::warn!(
            "skipping malformed label line {} in {}: {:?}",
            line_number,
            source,
            line
        );
    }
    parsed
}

/// Load boxes from a label file.
///
/// Never fails: a missing file gives an empty list, an unreadable file gives
/// an empty list and a warning, and a read error midway keeps the boxes
/// parsed so far.
pub fn load_labels<P: AsRef<Path>>(file_path: P) -> Vec<BoundingBox> {
    let path = file_path.as_ref();
    let source = path.display().to_string();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("label file {} not found, using no boxes", source);
            return Vec::new();
        }
        Err(e) => {
            log::warn!("failed to open label file {}: {}", source, e);
            return Vec::new();
        }
    };

    let mut reader = BufReader::new(file);
    let mut boxes = Vec::new();
    let mut buf = Vec::new();
    let mut line_number = 0;

    // Raw bytes per line so a non UTF-8 line is skipped like any malformed line
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::warn!(
                    "failed to read {} at line {}: {}; keeping {} boxes read so far",
                    source,
                    line_number + 1,
                    e,
                    boxes.len()
                );
                break;
            }
        }
        line_number += 1;
        let line = String::from_utf8_lossy(&buf);
        if let Some(bbox) = parse_line_logged(&line, line_number, &source) {
            boxes.push(bbox);
        }
    }

    boxes
}
