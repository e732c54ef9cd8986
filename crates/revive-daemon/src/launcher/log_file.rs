use chrono::NaiveDateTime;
use revive_types::RESTART_LOG_PREFIX;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

const MAX_SUFFIX: u32 = 1000;

/// `restart_YYYYMMDD_HHMMSS` for the given wall-clock time.
pub fn restart_log_stem(at: NaiveDateTime) -> String {
    format!("{}{}", RESTART_LOG_PREFIX, at.format("%Y%m%d_%H%M%S"))
}

/// Creates a fresh restart log in `dir`.
///
/// The per-second name is tried first; when it is taken, `_1`, `_2`, ... are appended so a
/// previous attempt's output is never overwritten.
pub fn create_restart_log(dir: &Path, at: NaiveDateTime) -> io::Result<(PathBuf, File)> {
    let stem = restart_log_stem(at);

    for suffix in 0..MAX_SUFFIX {
        let name = if suffix == 0 {
            format!("{}.log", stem)
        } else {
            format!("{}_{}.log", stem, suffix)
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free restart log name for {}", stem),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 1)
            .unwrap()
    }

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("revive-logs-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_stem_format() {
        assert_eq!(restart_log_stem(at()), "restart_20250307_090501");
    }

    #[test]
    fn test_same_second_names_are_unique() {
        let dir = scratch_dir();

        let (first, _) = create_restart_log(&dir, at()).unwrap();
        let (second, _) = create_restart_log(&dir, at()).unwrap();
        let (third, _) = create_restart_log(&dir, at()).unwrap();

        assert_eq!(first.file_name().unwrap(), "restart_20250307_090501.log");
        assert_eq!(second.file_name().unwrap(), "restart_20250307_090501_1.log");
        assert_eq!(third.file_name().unwrap(), "restart_20250307_090501_2.log");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_dir_is_error() {
        let dir = std::env::temp_dir().join(format!("revive-missing-{}", uuid::Uuid::new_v4()));
        assert!(create_restart_log(&dir, at()).is_err());
    }
}
