//! Artifact stores and loading helpers.
//!
//! A pipeline needs six files: the tagger, the lemmatizer, the stopword list,
//! the vectorizer, and the classifier config plus its weights. They are read
//! through an [`ArtifactStore`], either a local directory or a Hugging Face Hub
//! repository.
//!
//! ## Main Types
//!
//! - [`LocalArtifactStore`] - Artifacts in a directory on disk
//! - [`HubArtifactStore`] - Artifacts in a Hugging Face Hub model repository
//! - [`ArtifactManifest`] - Optional `manifest.json` naming each artifact file
//!
//! A fetch that fails transiently (network, interrupted I/O) is retried exactly
//! once. The second failure is reported as [`SentimentError::ArtifactLoad`].

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use hf_hub::api::sync::ApiError;
use hf_hub::{Repo, RepoType};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimentError};

/// File name of the optional manifest at the store root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Manifest format this build understands.
pub const MANIFEST_FORMAT_VERSION: u32 = 1;

const RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// Source of artifact files.
pub trait ArtifactStore: Send + Sync {
    /// Local path of `name`, downloading it first if needed.
    fn fetch(&self, name: &str) -> Result<PathBuf>;

    /// Human-readable location, also used as the cache key prefix.
    fn location(&self) -> String;

    /// Whether `name` can be fetched.
    fn contains(&self, name: &str) -> bool {
        self.fetch(name).is_ok()
    }
}

/// Artifacts in a local directory.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactStore for LocalArtifactStore {
    fn fetch(&self, name: &str) -> Result<PathBuf> {
        let path = self.root.join(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(SentimentError::ArtifactMissing {
                name: name.to_string(),
                location: self.location(),
            })
        }
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn contains(&self, name: &str) -> bool {
        self.root.join(name).is_file()
    }
}

/// Artifacts in a Hugging Face Hub model repository.
#[derive(Debug, Clone)]
pub struct HubArtifactStore {
    pub repo: String,
    pub revision: String,
    cache_dir: Option<PathBuf>,
}

impl HubArtifactStore {
    pub fn new(repo: &str) -> Self {
        Self {
            repo: repo.into(),
            revision: "main".into(),
            cache_dir: None,
        }
    }

    /// Pin a branch, tag or commit.
    pub fn with_revision(mut self, revision: &str) -> Self {
        self.revision = revision.into();
        self
    }

    /// Download into `dir` instead of the default Hub cache.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    fn api(&self) -> Result<hf_hub::api::sync::ApiRepo> {
        let mut builder = hf_hub::api::sync::ApiBuilder::new().with_progress(false);
        if let Some(dir) = &self.cache_dir {
            builder = builder.with_cache_dir(dir.clone());
        }
        let api = builder.build().map_err(|e| {
            SentimentError::Download(format!("Failed to initialize HuggingFace API: {e}"))
        })?;
        Ok(api.repo(Repo::with_revision(
            self.repo.clone(),
            RepoType::Model,
            self.revision.clone(),
        )))
    }
}

impl ArtifactStore for HubArtifactStore {
    fn fetch(&self, name: &str) -> Result<PathBuf> {
        self.api()?.get(name).map_err(|e| match e {
            ApiError::RequestError(err) if matches!(*err, ureq::Error::Status(404, _)) => {
                SentimentError::ArtifactMissing {
                    name: name.to_string(),
                    location: self.location(),
                }
            }
            e => SentimentError::Download(format!(
                "Failed to download '{}' from '{}@{}': {e}",
                name, self.repo, self.revision
            )),
        })
    }

    fn location(&self) -> String {
        format!("hf://{}@{}", self.repo, self.revision)
    }
}

/// Fetch `name`, retrying once if the first attempt fails transiently.
pub fn fetch_with_retry(store: &dyn ArtifactStore, name: &str) -> Result<PathBuf> {
    match store.fetch(name) {
        Ok(path) => Ok(path),
        Err(e) if e.is_transient() => {
            tracing::warn!(
                artifact = name,
                location = %store.location(),
                error = %e,
                "artifact fetch failed, retrying once"
            );
            std::thread::sleep(RETRY_BACKOFF);
            store.fetch(name).map_err(|e| match e {
                SentimentError::ArtifactLoad { .. } | SentimentError::ArtifactMissing { .. } => e,
                other => SentimentError::artifact(name, other),
            })
        }
        Err(e) => Err(e),
    }
}

/// [`fetch_with_retry`], reporting any failure as [`SentimentError::ArtifactLoad`]
/// under the logical `artifact` name.
pub fn fetch_artifact(store: &dyn ArtifactStore, artifact: &str, file: &str) -> Result<PathBuf> {
    fetch_with_retry(store, file).map_err(|e| load_error(artifact, file, e))
}

fn load_error(artifact: &str, file: &str, err: SentimentError) -> SentimentError {
    match err {
        SentimentError::ArtifactLoad { reason, .. } => {
            SentimentError::artifact(artifact, format!("{file}: {reason}"))
        }
        e @ SentimentError::ArtifactMissing { .. } => SentimentError::artifact(artifact, e),
        other => SentimentError::artifact(artifact, format!("{file}: {other}")),
    }
}

/// Fetch `file` from `store` and parse it, logging what was loaded and how long it took.
pub fn load_artifact<T>(
    store: &dyn ArtifactStore,
    artifact: &str,
    file: &str,
    parse: impl FnOnce(&Path) -> Result<T>,
) -> Result<T> {
    let started = Instant::now();
    let path = fetch_artifact(store, artifact, file)?;
    let value = parse(&path)?;
    tracing::info!(
        artifact,
        file,
        location = %store.location(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "loaded artifact"
    );
    Ok(value)
}

/// File names of each artifact inside a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactManifest {
    pub format_version: u32,
    pub tagger: String,
    pub lemmatizer: String,
    pub stopwords: String,
    pub vectorizer: String,
    pub classifier_config: String,
    pub classifier_weights: String,
}

impl Default for ArtifactManifest {
    fn default() -> Self {
        Self {
            format_version: MANIFEST_FORMAT_VERSION,
            tagger: "pos_tagger.json".into(),
            lemmatizer: "lemmatizer.json".into(),
            stopwords: "stopwords.txt".into(),
            vectorizer: "vectorizer.json".into(),
            classifier_config: "classifier.json".into(),
            classifier_weights: "classifier.safetensors".into(),
        }
    }
}

impl ArtifactManifest {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let manifest: Self =
            serde_json::from_str(json).map_err(|e| SentimentError::artifact("manifest", e))?;
        if manifest.format_version != MANIFEST_FORMAT_VERSION {
            return Err(SentimentError::artifact(
                "manifest",
                format!(
                    "format version {} is not supported (expected {MANIFEST_FORMAT_VERSION})",
                    manifest.format_version
                ),
            ));
        }
        Ok(manifest)
    }

    /// Read [`MANIFEST_FILE`] from the store, or fall back to the default file names.
    ///
    /// Only a store that reports the manifest as missing gets the defaults; any
    /// other fetch failure, after the usual single retry, is an
    /// [`SentimentError::ArtifactLoad`].
    pub fn load_or_default(store: &dyn ArtifactStore) -> Result<Self> {
        let path = match fetch_with_retry(store, MANIFEST_FILE) {
            Ok(path) => path,
            Err(SentimentError::ArtifactMissing { .. }) => {
                tracing::debug!(location = %store.location(), "no manifest, using default artifact names");
                return Ok(Self::default());
            }
            Err(e) => return Err(load_error("manifest", MANIFEST_FILE, e)),
        };

        let json =
            std::fs::read_to_string(&path).map_err(|e| SentimentError::artifact("manifest", e))?;
        let manifest = Self::from_json_str(&json)?;
        tracing::info!(location = %store.location(), "loaded artifact manifest");
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyStore {
        failures: usize,
        calls: AtomicUsize,
    }

    impl ArtifactStore for FlakyStore {
        fn fetch(&self, name: &str) -> Result<PathBuf> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(SentimentError::Download("connection reset".into()))
            } else {
                Ok(PathBuf::from(name))
            }
        }

        fn location(&self) -> String {
            "flaky".into()
        }
    }

    /// Local directory whose first `failures` fetches fail transiently.
    struct FlakyDir {
        inner: LocalArtifactStore,
        failures: usize,
        calls: AtomicUsize,
    }

    impl FlakyDir {
        fn new(dir: &Path, failures: usize) -> Self {
            Self {
                inner: LocalArtifactStore::new(dir),
                failures,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ArtifactStore for FlakyDir {
        fn fetch(&self, name: &str) -> Result<PathBuf> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
                Err(SentimentError::Download("connection reset".into()))
            } else {
                self.inner.fetch(name)
            }
        }

        fn location(&self) -> String {
            self.inner.location()
        }
    }

    #[test]
    fn test_retry_once_then_succeed() {
        let store = FlakyStore {
            failures: 1,
            calls: AtomicUsize::new(0),
        };
        let path = fetch_with_retry(&store, "vectorizer.json").unwrap();
        assert_eq!(path, PathBuf::from("vectorizer.json"));
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_second_failure_is_fatal() {
        let store = FlakyStore {
            failures: 5,
            calls: AtomicUsize::new(0),
        };
        let err = fetch_with_retry(&store, "vectorizer.json").unwrap_err();
        assert!(matches!(err, SentimentError::ArtifactLoad { .. }));
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_missing_local_file_is_not_retried() {
        let dir = std::env::temp_dir().join("review-sentiment-missing-store");
        let store = LocalArtifactStore::new(&dir);
        let err = fetch_with_retry(&store, "nope.json").unwrap_err();
        assert!(!err.is_transient());
        assert!(matches!(err, SentimentError::ArtifactMissing { ref name, .. } if name == "nope.json"));
        assert!(!store.contains("nope.json"));
    }

    #[test]
    fn test_fetch_artifact_uses_logical_name() {
        let store = FlakyStore {
            failures: 5,
            calls: AtomicUsize::new(0),
        };
        let err = fetch_artifact(&store, "tagger", "pos_tagger.json").unwrap_err();
        assert!(matches!(err, SentimentError::ArtifactLoad { ref artifact, ref reason }
            if artifact == "tagger" && reason.starts_with("pos_tagger.json")));
    }

    #[test]
    fn test_manifest_read_after_transient_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), r#"{"vectorizer": "tfidf_v2.json"}"#)
            .unwrap();
        let store = FlakyDir::new(dir.path(), 1);

        let manifest = ArtifactManifest::load_or_default(&store).unwrap();
        assert_eq!(manifest.vectorizer, "tfidf_v2.json");
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_manifest_unreachable_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "{}").unwrap();
        let store = FlakyDir::new(dir.path(), 5);

        let err = ArtifactManifest::load_or_default(&store).unwrap_err();
        assert!(matches!(err, SentimentError::ArtifactLoad { ref artifact, .. } if artifact == "manifest"));
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_missing_manifest_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlakyDir::new(dir.path(), 0);

        let manifest = ArtifactManifest::load_or_default(&store).unwrap();
        assert_eq!(manifest, ArtifactManifest::default());
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_manifest_defaults_fill_missing_fields() {
        let manifest =
            ArtifactManifest::from_json_str(r#"{"vectorizer": "tfidf_v2.json"}"#).unwrap();
        assert_eq!(manifest.vectorizer, "tfidf_v2.json");
        assert_eq!(manifest.tagger, "pos_tagger.json");
        assert_eq!(manifest.format_version, MANIFEST_FORMAT_VERSION);
    }

    #[test]
    fn test_manifest_version_mismatch() {
        let err = ArtifactManifest::from_json_str(r#"{"format_version": 2}"#).unwrap_err();
        assert!(matches!(err, SentimentError::ArtifactLoad { ref artifact, .. } if artifact == "manifest"));
    }

    #[test]
    fn test_hub_location() {
        let store = HubArtifactStore::new("acme/review-sentiment").with_revision("v1");
        assert_eq!(store.location(), "hf://acme/review-sentiment@v1");
    }
}
