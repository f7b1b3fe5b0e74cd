use std::{
    fs,
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

use crate::{errors::Error, Result};

/// Result of scanning the track directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackListing {
    /// The directory itself does not exist.
    MissingDir,
    /// The directory exists but holds no file with the track extension.
    Empty,
    /// Matching filenames, sorted.
    Tracks(Vec<String>),
}

/// A flat directory of audio files served by name.
#[derive(Clone, Debug)]
pub struct TrackLibrary {
    dir: PathBuf,
    extension: String,
}

impl TrackLibrary {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn is_track_name(&self, name: &str) -> bool {
        name.len() > self.extension.len() && name.ends_with(&self.extension)
    }

    /// Scan the directory (non-recursive) for files carrying the track extension.
    pub fn list(&self) -> Result<TrackListing> {
        let rd = match fs::read_dir(&self.dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(TrackListing::MissingDir),
            Err(e) => return Err(Error::Io(e)),
        };

        let mut names = Vec::new();
        for ent in rd {
            let ent = ent?;
            // Follows symlinks so a linked track still counts as a file.
            if !ent.path().is_file() {
                continue;
            }
            let Ok(name) = ent.file_name().into_string() else {
                continue;
            };
            if self.is_track_name(&name) {
                names.push(name);
            }
        }

        if names.is_empty() {
            return Ok(TrackListing::Empty);
        }
        names.sort();
        Ok(TrackListing::Tracks(names))
    }

    /// Resolve a selection token to a file inside the library.
    ///
    /// Returns `Ok(None)` when the token does not name an existing track in this
    /// directory, including tokens that would escape it.
    pub fn resolve(&self, token: &str) -> Result<Option<PathBuf>> {
        if !is_plain_file_name(token) || !self.is_track_name(token) {
            return Ok(None);
        }

        let candidate = self.dir.join(token);
        if !candidate.is_file() {
            return Ok(None);
        }

        // Symlinks may still point elsewhere; compare canonical forms.
        let root = match fs::canonicalize(&self.dir) {
            Ok(p) => p,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };
        let resolved = match fs::canonicalize(&candidate) {
            Ok(p) => p,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };
        if !resolved.starts_with(&root) {
            tracing::warn!(token, resolved = %resolved.display(), "track token escapes library");
            return Ok(None);
        }

        Ok(Some(candidate))
    }

    /// [`TrackLibrary::list`] on the blocking pool.
    pub async fn scan(&self) -> Result<TrackListing> {
        let lib = self.clone();
        tokio::task::spawn_blocking(move || lib.list())
            .await
            .map_err(|e| Error::External(format!("track scan task failed: {e}")))?
    }

    /// [`TrackLibrary::resolve`] on the blocking pool.
    pub async fn locate(&self, token: &str) -> Result<Option<PathBuf>> {
        let lib = self.clone();
        let token = token.to_string();
        tokio::task::spawn_blocking(move || lib.resolve(&token))
            .await
            .map_err(|e| Error::External(format!("track lookup task failed: {e}")))?
    }
}

/// True when `s` is a single normal path component (no separators, `.` or `..`).
fn is_plain_file_name(s: &str) -> bool {
    if s.is_empty() || s.contains('/') || s.contains('\\') || s.contains('\0') {
        return false;
    }
    let mut comps = Path::new(s).components();
    matches!(
        (comps.next(), comps.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library_with(files: &[&str]) -> (tempfile::TempDir, TrackLibrary) {
        let dir = tempfile::tempdir().unwrap();
        for f in files {
            fs::write(dir.path().join(f), f.as_bytes()).unwrap();
        }
        let lib = TrackLibrary::new(dir.path(), ".mp3");
        (dir, lib)
    }

    #[test]
    fn missing_dir_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let lib = TrackLibrary::new(dir.path().join("music"), ".mp3");
        assert_eq!(lib.list().unwrap(), TrackListing::MissingDir);
    }

    #[test]
    fn empty_when_no_matching_extension() {
        let (_dir, lib) = library_with(&["cover.jpg", "notes.txt", "song.MP3"]);
        assert_eq!(lib.list().unwrap(), TrackListing::Empty);
    }

    #[test]
    fn lists_sorted_tracks_only() {
        let (dir, lib) = library_with(&["b.mp3", "a.mp3", "readme.txt"]);
        fs::create_dir(dir.path().join("folder.mp3")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/nested.mp3"), "x").unwrap();

        assert_eq!(
            lib.list().unwrap(),
            TrackListing::Tracks(vec!["a.mp3".to_string(), "b.mp3".to_string()])
        );
    }

    #[test]
    fn resolves_existing_track() {
        let (dir, lib) = library_with(&["trackA.mp3"]);
        assert_eq!(
            lib.resolve("trackA.mp3").unwrap(),
            Some(dir.path().join("trackA.mp3"))
        );
    }

    #[test]
    fn missing_track_resolves_to_none() {
        let (_dir, lib) = library_with(&["trackA.mp3"]);
        assert_eq!(lib.resolve("trackB.mp3").unwrap(), None);
    }

    #[test]
    fn rejects_traversal_tokens() {
        let outer = tempfile::tempdir().unwrap();
        let music = outer.path().join("music");
        fs::create_dir(&music).unwrap();
        fs::write(outer.path().join("secret.mp3"), "x").unwrap();
        let lib = TrackLibrary::new(&music, ".mp3");

        for token in ["../secret.mp3", "/etc/passwd", "..", ".", "", "a/../secret.mp3"] {
            assert_eq!(lib.resolve(token).unwrap(), None, "accepted {token:?}");
        }
    }

    #[test]
    fn rejects_tokens_without_track_extension() {
        let (_dir, lib) = library_with(&["notes.txt"]);
        assert_eq!(lib.resolve("notes.txt").unwrap(), None);
    }

    #[tokio::test]
    async fn scan_and_locate_run_off_the_runtime() {
        let (dir, lib) = library_with(&["b.mp3", "a.mp3"]);

        assert_eq!(
            lib.scan().await.unwrap(),
            TrackListing::Tracks(vec!["a.mp3".to_string(), "b.mp3".to_string()])
        );
        assert_eq!(
            lib.locate("a.mp3").await.unwrap(),
            Some(dir.path().join("a.mp3"))
        );
        assert_eq!(lib.locate("../a.mp3").await.unwrap(), None);
    }

    #[tokio::test]
    async fn scan_reports_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let lib = TrackLibrary::new(dir.path().join("music"), ".mp3");
        assert_eq!(lib.scan().await.unwrap(), TrackListing::MissingDir);
    }

    #[cfg(unix)]
    #[test]
    fn rejects_symlink_escape() {
        use std::os::unix::fs::symlink;

        let outer = tempfile::tempdir().unwrap();
        let music = outer.path().join("music");
        fs::create_dir(&music).unwrap();
        let secret = outer.path().join("secret.bin");
        fs::write(&secret, "x").unwrap();
        symlink(&secret, music.join("leak.mp3")).unwrap();

        let lib = TrackLibrary::new(&music, ".mp3");
        assert_eq!(lib.resolve("leak.mp3").unwrap(), None);
    }
}
