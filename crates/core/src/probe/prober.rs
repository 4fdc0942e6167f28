//! The caching prober.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::transcoder::{TranscodeError, Transcoder};

use super::types::ProbeInfo;

/// Probes media files through a [`Transcoder`], caching results per path.
///
/// The cache lives as long as the prober, which the batch worker scopes to a
/// single run, so repeated lookups of the same file (totals pass, per-file
/// pass) invoke the external tool once. Failed probes are cached too: the
/// sentinel is stored and the causing error handed back exactly once so the
/// caller can emit a single warning.
pub struct MediaProber<T: Transcoder> {
    tool: Arc<T>,
    cache: HashMap<PathBuf, ProbeInfo>,
}

impl<T: Transcoder> MediaProber<T> {
    pub fn new(tool: Arc<T>) -> Self {
        Self {
            tool,
            cache: HashMap::new(),
        }
    }

    /// Probes `path`, consulting the cache first.
    ///
    /// Never fails: a probe error yields the sentinel info together with the
    /// error that caused it. Subsequent calls for the same path return the
    /// cached sentinel without the error.
    pub async fn probe(&mut self, path: &Path) -> (ProbeInfo, Option<TranscodeError>) {
        if let Some(hit) = self.cache.get(path) {
            return (hit.clone(), None);
        }

        match self.tool.probe(path).await {
            Ok(info) => {
                self.cache.insert(path.to_path_buf(), info.clone());
                (info, None)
            }
            Err(e) => {
                let sentinel = ProbeInfo::sentinel();
                self.cache.insert(path.to_path_buf(), sentinel.clone());
                (sentinel, Some(e))
            }
        }
    }

    /// Number of cached entries.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
