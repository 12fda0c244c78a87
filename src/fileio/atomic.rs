use super::WriteError;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-process counter appended to temp names so threads sharing a pid never collide.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

pub const DEFAULT_TMP_TAG: &str = "new";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Inserted between the destination name and the uniqueness token.
    pub tmp_tag: String,
    /// `sync_all` the temp file before the rename and the directory after it.
    pub sync_data: bool,
    /// When false, identical content leaves the destination (and its mtime) alone.
    pub replace_equal: bool,
    pub create_dirs: bool,
    /// Refuse to replace an existing file whose size changes by more than this percentage.
    pub max_change_percent: Option<u32>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            tmp_tag: DEFAULT_TMP_TAG.to_string(),
            sync_data: true,
            replace_equal: true,
            create_dirs: false,
            max_change_percent: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The destination now holds the new content.
    Replaced,
    /// Content was identical and `replace_equal` was off.
    Unchanged,
}

/// Temporary sibling path for `dest`: `<dest>.<tag>.<pid>.<seq>`.
pub fn temp_path_for(dest: &Path, tag: &str) -> Result<PathBuf, WriteError> {
    let file_name = dest
        .file_name()
        .ok_or_else(|| WriteError::InvalidPath(dest.to_path_buf()))?;
    // A separator in the tag would move the temp file out of dest's directory.
    if tag.contains(['/', '\\']) {
        return Err(WriteError::InvalidTag(tag.to_string()));
    }

    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let mut name = OsString::from(file_name);
    name.push(format!(".{}.{}.{}", tag, std::process::id(), seq));
    Ok(dest.with_file_name(name))
}

/// An open temporary file that replaces its destination on [`commit`](Self::commit).
///
/// Dropping the handle without committing removes the temporary file and
/// leaves the destination as it was.
pub struct AtomicFile {
    dest: PathBuf,
    tmp: PathBuf,
    file: Option<BufWriter<File>>,
    options: WriteOptions,
    finished: bool,
}

impl AtomicFile {
    pub fn create(dest: impl AsRef<Path>, options: WriteOptions) -> Result<Self, WriteError> {
        let dest = dest.as_ref().to_path_buf();
        let tmp = temp_path_for(&dest, &options.tmp_tag)?;

        if options.create_dirs {
            if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp)
            .map_err(|source| WriteError::Create {
                path: tmp.clone(),
                source,
            })?;
        log::debug!("Opened {} for {}", tmp.display(), dest.display());

        let handle = Self {
            dest,
            tmp,
            file: Some(BufWriter::new(file)),
            options,
            finished: false,
        };
        handle.copy_permissions();
        Ok(handle)
    }

    pub fn path(&self) -> &Path {
        &self.dest
    }

    pub fn tmp_path(&self) -> &Path {
        &self.tmp
    }

    /// Flush, sync and rename the temporary file onto the destination.
    pub fn commit(mut self) -> Result<WriteOutcome, WriteError> {
        let new_len = self.close()?;

        if !self.options.replace_equal && self.same_content(new_len) {
            log::debug!("{} unchanged, keeping existing file", self.dest.display());
            self.remove_tmp();
            return Ok(WriteOutcome::Unchanged);
        }

        if let Some(limit) = self.options.max_change_percent {
            self.check_size_change(new_len, limit)?;
        }

        std::fs::rename(&self.tmp, &self.dest).map_err(|source| WriteError::Commit {
            path: self.dest.clone(),
            source,
        })?;
        self.finished = true;
        log::debug!("Replaced {} ({} bytes)", self.dest.display(), new_len);

        if self.options.sync_data {
            self.sync_parent_dir();
        }
        Ok(WriteOutcome::Replaced)
    }

    /// Drop the new content and leave the destination untouched.
    pub fn discard(mut self) {
        self.file.take();
        self.remove_tmp();
    }

    fn close(&mut self) -> Result<u64, WriteError> {
        let writer = match self.file.take() {
            Some(writer) => writer,
            None => return Err(self.write_error(std::io::ErrorKind::BrokenPipe.into())),
        };
        let file = writer
            .into_inner()
            .map_err(|e| self.write_error(e.into_error()))?;
        if self.options.sync_data {
            file.sync_all().map_err(|e| self.write_error(e))?;
        }
        let len = file.metadata().map_err(|e| self.write_error(e))?.len();
        Ok(len)
    }

    fn write_error(&self, source: std::io::Error) -> WriteError {
        WriteError::Write {
            path: self.tmp.clone(),
            source,
        }
    }

    fn check_size_change(&self, new_len: u64, limit: u32) -> Result<(), WriteError> {
        let old_len = match std::fs::metadata(&self.dest) {
            Ok(meta) => meta.len(),
            Err(_) => return Ok(()),
        };
        // An empty old file gives no baseline to compare against.
        if old_len == 0 {
            return Ok(());
        }

        let diff = old_len.abs_diff(new_len);
        if u128::from(diff) * 100 > u128::from(old_len) * u128::from(limit) {
            return Err(WriteError::SizeChange {
                path: self.dest.clone(),
                old: old_len,
                new: new_len,
                limit,
            });
        }
        Ok(())
    }

    fn same_content(&self, new_len: u64) -> bool {
        match std::fs::metadata(&self.dest) {
            Ok(meta) if meta.is_file() && meta.len() == new_len => {}
            _ => return false,
        }
        match (read_all(&self.dest), read_all(&self.tmp)) {
            (Ok(old), Ok(new)) => old == new,
            _ => false,
        }
    }

    fn copy_permissions(&self) {
        let Ok(meta) = std::fs::metadata(&self.dest) else {
            return;
        };
        if let Err(e) = std::fs::set_permissions(&self.tmp, meta.permissions()) {
            log::warn!(
                "Failed to copy permissions of {} to {}: {}",
                self.dest.display(),
                self.tmp.display(),
                e
            );
        }
    }

    fn sync_parent_dir(&self) {
        #[cfg(unix)]
        {
            let parent = match self.dest.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            if let Err(e) = File::open(parent).and_then(|dir| dir.sync_all()) {
                log::warn!("Failed to sync directory {}: {}", parent.display(), e);
            }
        }
    }

    fn remove_tmp(&mut self) {
        self.finished = true;
        match std::fs::remove_file(&self.tmp) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove {}: {}", self.tmp.display(), e),
        }
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.file.as_mut() {
            Some(writer) => writer.write(buf),
            None => Err(std::io::ErrorKind::BrokenPipe.into()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.file.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for AtomicFile {
    fn drop(&mut self) {
        if !self.finished {
            self.file.take();
            self.remove_tmp();
        }
    }
}

fn read_all(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    File::open(path)?.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Reusable writer carrying one set of [`WriteOptions`].
#[derive(Debug, Clone, Default)]
pub struct AtomicFileWriter {
    options: WriteOptions,
}

impl AtomicFileWriter {
    pub fn new(options: WriteOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    pub fn open(&self, path: impl AsRef<Path>) -> Result<AtomicFile, WriteError> {
        AtomicFile::create(path, self.options.clone())
    }

    /// Write `lines` verbatim, without adding terminators, and swap them into `path`.
    pub fn write_lines<I, S>(&self, path: impl AsRef<Path>, lines: I) -> Result<WriteOutcome, WriteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut file = self.open(path)?;
        for line in lines {
            if let Err(e) = file.write_all(line.as_ref().as_bytes()) {
                return Err(file.write_error(e));
            }
        }
        file.commit()
    }

    pub fn write_bytes(&self, path: impl AsRef<Path>, contents: &[u8]) -> Result<WriteOutcome, WriteError> {
        let mut file = self.open(path)?;
        if let Err(e) = file.write_all(contents) {
            return Err(file.write_error(e));
        }
        file.commit()
    }
}

/// Atomically replace `path` with `lines` using default options.
pub fn write_lines<I, S>(path: impl AsRef<Path>, lines: I) -> Result<WriteOutcome, WriteError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    AtomicFileWriter::default().write_lines(path, lines)
}
