//! Disk cache for rendered images.
//!
//! A [`DiskCache`] owns one directory. Every entry is a PNG file named by
//! [`CacheKey::file_name`]. There is no in-memory index: lookups always go to
//! the filesystem, so several processes (or threads) may share a directory.
//!
//! Entries are written to a temporary file in the same directory and renamed
//! into place, so a reader sees either the previous file or the complete new
//! one. Concurrent writers of the same key race and the last rename wins.

use std::fs;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use log::{debug, info, warn};
use tempfile::NamedTempFile;

use crate::config::CacheSettings;
use crate::error::{RenderError, Result};
use crate::request::CacheKey;

// ============================================================================
// Encoding
// ============================================================================

/// Encodes an image as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Decodes PNG bytes into an RGBA image.
pub fn decode_png(bytes: &[u8]) -> std::result::Result<RgbaImage, image::ImageError> {
    image::load_from_memory_with_format(bytes, ImageFormat::Png).map(|img| img.to_rgba8())
}

// ============================================================================
// CachedImage
// ============================================================================

/// A cache entry read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedImage {
    pub image: RgbaImage,
    /// The stored PNG bytes, exactly as read.
    pub bytes: Vec<u8>,
}

// ============================================================================
// ClearReport
// ============================================================================

/// Outcome of [`DiskCache::clear`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearReport {
    /// Entries that were deleted.
    pub removed: Vec<PathBuf>,
    /// Entries that could not be deleted.
    pub failed: usize,
}

// ============================================================================
// DiskCache
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Opens a cache in `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| RenderError::CacheDirectory {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Opens the cache described by `settings`.
    ///
    /// Returns `Ok(None)` when caching is disabled.
    pub fn from_settings(settings: &CacheSettings) -> Result<Option<Self>> {
        if !settings.enabled {
            return Ok(None);
        }
        Self::open(settings.cache_dir()).map(Some)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path an entry for `key` is stored at.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.path_for(key).is_file()
    }

    /// Reads and decodes the entry for `key`.
    ///
    /// A missing entry is `Ok(None)`; an unreadable or undecodable one is
    /// [`RenderError::CacheRead`].
    pub fn load(&self, key: &CacheKey) -> Result<Option<CachedImage>> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(RenderError::CacheRead {
                    path,
                    reason: e.to_string(),
                });
            }
        };

        let image = decode_png(&bytes).map_err(|e| RenderError::CacheRead {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Ok(Some(CachedImage { image, bytes }))
    }

    /// Writes `bytes` as the entry for `key`, replacing any previous entry.
    ///
    /// Recreates the directory if it was removed since the cache was opened.
    pub fn store(&self, key: &CacheKey, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(key);
        let write_error = |source: io::Error| RenderError::CacheWrite {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_error)?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(write_error)?;
        tmp.write_all(bytes).map_err(write_error)?;
        tmp.persist(&path).map_err(|e| write_error(e.error))?;

        debug!("stored {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// Lists every entry in the cache directory.
    ///
    /// A missing directory has no entries.
    pub fn entries(&self) -> Result<Vec<PathBuf>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(RenderError::CacheRead {
                    path: self.dir.clone(),
                    reason: e.to_string(),
                });
            }
        };

        let mut entries = read_dir
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect::<Vec<_>>();
        entries.sort();
        Ok(entries)
    }

    /// Deletes every entry in the cache directory.
    ///
    /// With `verbose`, each removed path is logged at info level. Failures
    /// are logged and counted, never returned.
    pub fn clear(&self, verbose: bool) -> ClearReport {
        let mut report = ClearReport::default();

        let entries = match self.entries() {
            Ok(entries) => entries,
            Err(err) => {
                warn!("cannot list cache: {err}");
                return report;
            }
        };

        for path in entries {
            let removed = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            match removed {
                Ok(()) => {
                    if verbose {
                        info!("removed {}", path.display());
                    }
                    report.removed.push(path);
                }
                Err(err) => {
                    warn!("failed to remove {}: {err}", path.display());
                    report.failed += 1;
                }
            }
        }

        report
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample_image() -> RgbaImage {
        RgbaImage::from_fn(6, 3, |x, y| Rgba([x as u8 * 40, y as u8 * 80, 7, 255 - x as u8]))
    }

    #[test]
    fn png_roundtrip_is_lossless() {
        let img = sample_image();
        let bytes = encode_png(&img).unwrap();
        assert_eq!(decode_png(&bytes).unwrap(), img);
        assert_eq!(encode_png(&img).unwrap(), bytes, "encoding is deterministic");
    }

    #[test]
    fn open_creates_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("a").join("b");
        let cache = DiskCache::open(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(cache.dir(), dir);
    }

    #[test]
    fn open_fails_when_path_is_a_file() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("occupied");
        fs::write(&file, b"x").unwrap();

        let err = DiskCache::open(file.join("cache")).unwrap_err();
        assert!(matches!(err, RenderError::CacheDirectory { .. }));
    }

    #[test]
    fn from_settings_respects_enabled_flag() {
        let root = tempfile::tempdir().unwrap();
        assert!(DiskCache::from_settings(&CacheSettings::disabled()).unwrap().is_none());

        let settings = CacheSettings::in_root(root.path());
        let cache = DiskCache::from_settings(&settings).unwrap().unwrap();
        assert_eq!(cache.dir(), settings.cache_dir());
    }

    #[test]
    fn store_then_load() {
        let root = tempfile::tempdir().unwrap();
        let cache = DiskCache::open(root.path()).unwrap();
        let key = CacheKey::new("square|1,2,3,4|6x3");
        let img = sample_image();
        let bytes = encode_png(&img).unwrap();

        assert!(cache.load(&key).unwrap().is_none());
        assert!(!cache.contains(&key));

        let path = cache.store(&key, &bytes).unwrap();
        assert_eq!(path, cache.path_for(&key));
        assert!(cache.contains(&key));

        let cached = cache.load(&key).unwrap().unwrap();
        assert_eq!(cached.image, img);
        assert_eq!(cached.bytes, bytes);
        assert_eq!(cache.entries().unwrap(), vec![path]);
    }

    #[test]
    fn corrupt_entry_is_a_read_error() {
        let root = tempfile::tempdir().unwrap();
        let cache = DiskCache::open(root.path()).unwrap();
        let key = CacheKey::new("broken");
        fs::write(cache.path_for(&key), b"garbage").unwrap();

        assert!(matches!(
            cache.load(&key),
            Err(RenderError::CacheRead { .. })
        ));
    }

    #[test]
    fn store_recreates_removed_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("cache");
        let cache = DiskCache::open(&dir).unwrap();
        fs::remove_dir(&dir).unwrap();

        let key = CacheKey::new("k");
        cache.store(&key, &encode_png(&sample_image()).unwrap()).unwrap();
        assert!(cache.contains(&key));
    }

    #[test]
    fn store_failure_is_a_write_error() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("cache");
        let cache = DiskCache::open(&dir).unwrap();
        fs::remove_dir(&dir).unwrap();
        fs::write(&dir, b"now a file").unwrap();

        let err = cache.store(&CacheKey::new("k"), b"data").unwrap_err();
        assert!(matches!(err, RenderError::CacheWrite { .. }));
    }

    #[test]
    fn clear_removes_everything() {
        let root = tempfile::tempdir().unwrap();
        let cache = DiskCache::open(root.path()).unwrap();
        let bytes = encode_png(&sample_image()).unwrap();
        for name in ["a", "b", "c"] {
            cache.store(&CacheKey::new(name), &bytes).unwrap();
        }
        fs::create_dir(root.path().join("stray")).unwrap();

        let report = cache.clear(true);

        assert_eq!(report.removed.len(), 4);
        assert_eq!(report.failed, 0);
        assert!(cache.entries().unwrap().is_empty());
        assert!(cache.dir().is_dir(), "the directory itself is kept");
    }

    #[test]
    fn clear_of_missing_directory_is_empty() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("gone");
        let cache = DiskCache::open(&dir).unwrap();
        fs::remove_dir(&dir).unwrap();

        assert_eq!(cache.clear(false), ClearReport::default());
    }
}
