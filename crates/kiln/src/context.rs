//! # Application Context
//!
//! Everything the host loop used to keep in globals, owned by one value:
//! the configuration, the transient arena and the running flag.
//!
//! ## Lifecycle
//!
//! ```text
//! AppContext::new ──> load_asset* ──> end_phase ──> load_asset* ──> ... ──> stop
//!   (one region)      (bump)          (reset)
//! ```

use std::path::{Path, PathBuf};

use kiln_core::{log_trace, Allocation, Arena};
use kiln_io::{FileContents, FileStamp};

use crate::config::KilnConfig;

/// An asset loaded into transient storage: its region and content length.
pub type Asset = FileContents<Allocation>;

/// Host-side state passed to whatever needs it.
#[derive(Debug)]
pub struct AppContext {
    /// Startup configuration.
    config: KilnConfig,
    /// Transient storage for file contents.
    transient: Arena,
    /// Cleared to leave the host loop.
    running: bool,
}

impl AppContext {
    /// Creates the context and its transient arena.
    ///
    /// # Panics
    ///
    /// Halts through the fatal path if the arena cannot be allocated.
    #[must_use]
    pub fn new(config: KilnConfig) -> Self {
        let transient = Arena::new(config.transient_capacity());
        log_trace!("Transient storage ready: {} bytes", transient.capacity());
        Self {
            config,
            transient,
            running: true,
        }
    }

    /// The configuration the context was built from.
    #[must_use]
    pub const fn config(&self) -> &KilnConfig {
        &self.config
    }

    /// The transient arena.
    #[must_use]
    pub const fn transient(&self) -> &Arena {
        &self.transient
    }

    /// The transient arena, mutably.
    pub fn transient_mut(&mut self) -> &mut Arena {
        &mut self.transient
    }

    /// Whether the host loop should keep going.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Asks the host loop to exit.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Resolves `path` against the asset root unless it is absolute.
    #[must_use]
    pub fn asset_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.assets.root.join(path)
        }
    }

    /// Reads an asset into transient storage.
    ///
    /// `None` if the asset is missing (logged) or empty. The region holds
    /// the content plus a zero terminator; `size` counts the bytes actually
    /// read, which is less than the region if the file shrank meanwhile.
    pub fn load_asset(&mut self, path: impl AsRef<Path>) -> Option<Asset> {
        let path = self.asset_path(path);
        kiln_io::read(path, &mut self.transient)
    }

    /// Content of a loaded asset, without terminator or padding.
    #[must_use]
    pub fn asset_bytes(&self, asset: Asset) -> Option<&[u8]> {
        asset.bytes(&self.transient)
    }

    /// Content of a loaded asset as UTF-8 text.
    #[must_use]
    pub fn asset_text(&self, asset: Asset) -> Option<&str> {
        asset.text(&self.transient)
    }

    /// Starts watching an asset for changes.
    #[must_use]
    pub fn watch_asset(&self, path: impl AsRef<Path>) -> FileStamp {
        FileStamp::new(self.asset_path(path))
    }

    /// Reloads a watched asset if its timestamp moved.
    pub fn reload_if_changed(&mut self, stamp: &mut FileStamp) -> Option<Asset> {
        if !stamp.changed() {
            return None;
        }
        log_trace!("Reloading {}", stamp.path().display());
        kiln_io::read(stamp.path(), &mut self.transient)
    }

    /// Ends the current transient phase: every asset handle is retired and
    /// the arena starts over.
    pub fn end_phase(&mut self) {
        self.transient.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfig;

    fn context_in(root: &Path) -> AppContext {
        let mut config = KilnConfig {
            memory: MemoryConfig {
                transient_capacity_mb: 1,
            },
            ..KilnConfig::default()
        };
        config.assets.root = root.to_path_buf();
        AppContext::new(config)
    }

    #[test]
    fn test_new_context_is_running() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());

        assert!(ctx.is_running());
        assert_eq!(ctx.transient().capacity(), 1024 * 1024);
        assert_eq!(ctx.transient().used(), 0);

        ctx.stop();
        assert!(!ctx.is_running());
    }

    #[test]
    fn test_asset_path_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());

        assert_eq!(ctx.asset_path("shaders/quad.vert"), dir.path().join("shaders/quad.vert"));
        let absolute = dir.path().join("elsewhere.txt");
        assert_eq!(ctx.asset_path(&absolute), absolute);
    }

    #[test]
    fn test_load_asset_text() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("quad.vert"), "#version 430 core\n").unwrap();
        let mut ctx = context_in(dir.path());

        let asset = ctx.load_asset("quad.vert").unwrap();
        assert_eq!(ctx.asset_text(asset), Some("#version 430 core\n"));
        assert_eq!(ctx.transient().bytes(asset.handle).unwrap().last(), Some(&0));
        assert_eq!(asset.size, 18);
    }

    #[test]
    fn test_asset_bytes_stop_at_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());

        // A region larger than the content, as after a file shrank mid-read.
        let handle = ctx.transient_mut().allocate(16);
        ctx.transient_mut().bytes_mut(handle).unwrap()[..3].copy_from_slice(b"abc");
        let asset = Asset { handle, size: 3 };

        assert_eq!(ctx.asset_bytes(asset), Some(&b"abc"[..]));
        assert_eq!(ctx.asset_text(asset), Some("abc"));
    }

    #[test]
    fn test_missing_asset() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());

        assert!(ctx.load_asset("missing.png").is_none());
        assert_eq!(ctx.transient().used(), 0);
    }

    #[test]
    fn test_end_phase_retires_assets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        let mut ctx = context_in(dir.path());

        let asset = ctx.load_asset("a.txt").unwrap();
        ctx.end_phase();

        assert_eq!(ctx.transient().used(), 0);
        assert!(ctx.asset_bytes(asset).is_none());
    }

    #[test]
    fn test_reload_if_changed() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());
        let mut stamp = ctx.watch_asset("late.glsl");

        assert!(ctx.reload_if_changed(&mut stamp).is_none());

        std::fs::write(dir.path().join("late.glsl"), "void main(){}").unwrap();
        let asset = ctx.reload_if_changed(&mut stamp).unwrap();
        assert_eq!(ctx.asset_text(asset), Some("void main(){}"));
        assert!(ctx.reload_if_changed(&mut stamp).is_none());
    }
}
