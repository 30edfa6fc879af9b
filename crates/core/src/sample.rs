//! Byte sampler and text/binary probe (C1).
//!
//! Reads a bounded prefix of a file and decides whether it is "likely text"
//! before the rest of the pipeline spends effort classifying it.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

use crate::error::{Result, TextmendError};

/// Default sample size: 64 KiB.
pub const SAMPLE_BYTES: usize = 64 * 1024;

/// Stat fields the orchestrator needs without a second syscall.
#[derive(Debug, Clone)]
pub struct Stat {
    pub size: u64,
    #[cfg(unix)]
    pub mode: u32,
    pub mtime: Option<SystemTime>,
}

/// An immutable byte prefix of a file, plus the stat record taken at the
/// same time. Sample reads never mutate the file.
#[derive(Debug, Clone)]
pub struct Sample {
    pub bytes: Vec<u8>,
    pub stat: Stat,
}

impl Sample {
    /// Reads up to `max_bytes` from the head of `path`, returning the sample
    /// and the file's stat record together.
    pub fn read(path: &Path, max_bytes: usize) -> Result<Sample> {
        let mut file = File::open(path).map_err(|e| TextmendError::io(path, e))?;
        let metadata = file.metadata().map_err(|e| TextmendError::io(path, e))?;

        let mut bytes = vec![0u8; max_bytes.min(metadata.len() as usize)];
        let mut read_total = 0;
        while read_total < bytes.len() {
            let n = file
                .read(&mut bytes[read_total..])
                .map_err(|e| TextmendError::io(path, e))?;
            if n == 0 {
                break;
            }
            read_total += n;
        }
        bytes.truncate(read_total);

        let stat = Stat {
            size: metadata.len(),
            #[cfg(unix)]
            mode: {
                use std::os::unix::fs::PermissionsExt;
                metadata.permissions().mode()
            },
            mtime: metadata.modified().ok(),
        };

        Ok(Sample { bytes, stat })
    }

    /// Re-stats the file without re-reading its contents, used right before
    /// the atomic write to detect a concurrent modification.
    pub fn restat(path: &Path) -> Result<Stat> {
        let metadata = fs::metadata(path).map_err(|e| TextmendError::io(path, e))?;
        Ok(Stat {
            size: metadata.len(),
            #[cfg(unix)]
            mode: {
                use std::os::unix::fs::PermissionsExt;
                metadata.permissions().mode()
            },
            mtime: metadata.modified().ok(),
        })
    }

    /// The text/binary probe.
    ///
    /// 1. A NUL byte anywhere in the sample means binary.
    /// 2. A sample that is valid UTF-8 (the whole sample, or a valid prefix
    ///    truncated mid character by the sample boundary) is text.
    /// 3. Otherwise, text iff more than 70% of bytes are printable ASCII or
    ///    one of tab/newline/carriage-return.
    pub fn is_likely_text(&self) -> bool {
        is_likely_text(&self.bytes)
    }
}

pub fn is_likely_text(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return true;
    }
    if sample.contains(&0u8) {
        return false;
    }

    if std::str::from_utf8(sample).is_ok() {
        return true;
    }
    // The sample is a bounded prefix; a trailing incomplete multi-byte
    // sequence at the very end is not evidence of binary content.
    if let Err(e) = std::str::from_utf8(sample) {
        let valid_up_to = e.valid_up_to();
        if e.error_len().is_none() && valid_up_to + 4 >= sample.len() {
            return true;
        }
    }

    let printable = sample
        .iter()
        .filter(|&&b| (0x20..=0x7E).contains(&b) || b == 0x09 || b == 0x0A || b == 0x0D)
        .count();
    (printable as f64 / sample.len() as f64) > 0.7
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn ascii_text_is_likely_text() {
        assert!(is_likely_text(b"hello, world\n"));
    }

    #[test]
    fn nul_byte_is_binary() {
        assert!(!is_likely_text(b"abc\0def"));
    }

    #[test]
    fn valid_utf8_with_accents_is_text() {
        assert!(is_likely_text("café au lait".as_bytes()));
    }

    #[test]
    fn mostly_high_bytes_is_binary() {
        let bytes: Vec<u8> = (0..100).map(|i| 0x80 + (i % 0x40) as u8).collect();
        assert!(!is_likely_text(&bytes));
    }

    #[test]
    fn sparse_high_bytes_over_70_percent_printable_is_text() {
        let mut bytes = b"the quick brown fox jumps over the lazy dog ".to_vec();
        bytes.push(0xE9);
        assert!(is_likely_text(&bytes));
    }

    #[test]
    fn reads_bounded_prefix_and_stat() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&vec![b'a'; 200_000]).unwrap();
        let sample = Sample::read(file.path(), SAMPLE_BYTES).unwrap();
        assert_eq!(sample.bytes.len(), SAMPLE_BYTES);
        assert_eq!(sample.stat.size, 200_000);
    }
}
