//! Test generator that writes a synthetic tile tree without decoding images.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{PyramidGenerator, PyramidInfo, PyramidOptions, TilerError};

/// Writes a two-level tree (1 + 4 tiles) plus `blank.png` for every source.
///
/// Sources whose file name contains `fail` are rejected, and sources whose
/// name contains `panic` panic. In-flight calls are tracked so tests can
/// assert on concurrency.
#[derive(Debug, Default)]
pub(crate) struct FakeTiler {
    pub delay: Duration,
    pub in_flight: Arc<AtomicUsize>,
    pub max_in_flight: Arc<AtomicUsize>,
}

impl FakeTiler {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl PyramidGenerator for FakeTiler {
    fn generate_pyramid(
        &self,
        source: &Path,
        dest: &Path,
        options: &PyramidOptions,
    ) -> Result<PyramidInfo, TilerError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        let result = write_tree(source, dest, options);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

fn write_tree(
    source: &Path,
    dest: &Path,
    options: &PyramidOptions,
) -> Result<PyramidInfo, TilerError> {
    let name = source.to_string_lossy();
    if name.contains("panic") {
        panic!("fake tiler panic for {}", name);
    }
    if name.contains("fail") {
        return Err(TilerError::Failed(format!("cannot tile {}", name)));
    }

    let suffix = options.format.suffix();
    let tiles = ["0/0/0", "1/0/0", "1/0/1", "1/1/0", "1/1/1"];
    for tile in tiles {
        let path = dest.join(format!("{}{}", tile, suffix));
        let parent = path.parent().unwrap_or(dest);
        fs::create_dir_all(parent).map_err(|e| TilerError::CreateFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
        fs::write(&path, format!("{}:{}", name, tile)).map_err(|e| TilerError::CreateFailed {
            path: path.clone(),
            source: e,
        })?;
    }
    fs::write(dest.join("blank.png"), b"blank").map_err(|e| TilerError::CreateFailed {
        path: dest.join("blank.png"),
        source: e,
    })?;

    let size = options.tile_size * 2;
    Ok(PyramidInfo {
        source_width: size - 1,
        source_height: size / 2,
        width: size,
        height: size,
    })
}
