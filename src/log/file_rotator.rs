use std::{
    fmt,
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};

use crate::log::{log_error::LogError, log_stream::LogStream};

/// Hour-granularity key used to name rotated files (`yyyyMMdd_HH`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BucketKey(String);

impl BucketKey {
    #[must_use]
    pub fn of(at: &DateTime<Local>) -> Self {
        Self(at.format("%Y%m%d_%H").to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output directory of each stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamDirs {
    dirs: [PathBuf; 3],
}

impl StreamDirs {
    #[must_use]
    pub fn new(system: PathBuf, web_server: PathBuf, socket: PathBuf) -> Self {
        Self {
            dirs: [system, web_server, socket],
        }
    }

    /// `<root>/System`, `<root>/WebServer`, `<root>/WebSocket`.
    #[must_use]
    pub fn under(root: &Path) -> Self {
        Self {
            dirs: LogStream::ALL.map(|s| root.join(s.default_dir_name())),
        }
    }

    #[must_use]
    pub fn dir(&self, stream: LogStream) -> &Path {
        &self.dirs[stream.index()]
    }

    /// Path of the file holding `stream`'s entries for `bucket`.
    ///
    /// A pure function of the stream and the bucket.
    #[must_use]
    pub fn path_for(&self, stream: LogStream, bucket: &BucketKey) -> PathBuf {
        self.dir(stream).join(stream.file_name(bucket.as_str()))
    }
}

#[derive(Debug)]
struct ActiveFile {
    bucket: BucketKey,
    path: PathBuf,
}

/// Tracks, per stream, which hour-bucket file is current.
///
/// Rotation is lazy: it happens on the first write whose timestamp falls in
/// a different hour than the previous write to the same stream. Each stream
/// rotates independently.
#[derive(Debug)]
pub struct FileRotator {
    dirs: StreamDirs,
    active: [Option<ActiveFile>; 3],
}

impl FileRotator {
    #[must_use]
    pub fn new(dirs: StreamDirs) -> Self {
        Self {
            dirs,
            active: [None, None, None],
        }
    }

    #[must_use]
    pub fn dirs(&self) -> &StreamDirs {
        &self.dirs
    }

    /// The file most recently opened for `stream`, if any.
    #[must_use]
    pub fn current_path(&self, stream: LogStream) -> Option<&Path> {
        self.active[stream.index()].as_ref().map(|a| a.path.as_path())
    }

    /// Whether `stream` has opened a file at least once since the last
    /// failure.
    #[must_use]
    pub fn is_active(&self, stream: LogStream) -> bool {
        self.active[stream.index()].is_some()
    }

    /// Forgets the current file of every stream.
    pub fn release_all(&mut self) {
        self.active = [None, None, None];
    }

    /// Opens the correct hour-bucket file of `stream` for appending.
    ///
    /// Creates the directory and the file when absent. On failure the
    /// stream forgets its current file so the next call resolves again.
    pub fn open(
        &mut self,
        stream: LogStream,
        at: &DateTime<Local>,
    ) -> Result<(File, PathBuf), LogError> {
        let bucket = BucketKey::of(at);
        let idx = stream.index();

        let current = self.active[idx]
            .as_ref()
            .filter(|active| active.bucket == bucket)
            .map(|active| active.path.clone());

        let path = match current {
            Some(path) => path,
            None => {
                self.active[idx] = None;
                let dir = self.dirs.dir(stream);
                fs::create_dir_all(dir).map_err(|source| LogError::CreateDir {
                    path: dir.to_path_buf(),
                    source,
                })?;
                let path = self.dirs.path_for(stream, &bucket);
                tracing::debug!(stream = %stream, path = %path.display(), "rotating log file");
                self.active[idx] = Some(ActiveFile {
                    bucket,
                    path: path.clone(),
                });
                path
            }
        };

        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Ok((file, path)),
            Err(source) => {
                self.active[idx] = None;
                Err(LogError::Open { path, source })
            }
        }
    }
}
