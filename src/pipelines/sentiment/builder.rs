use std::path::PathBuf;
use std::sync::Arc;

use super::pipeline::SentimentPipeline;
use crate::error::Result;
use crate::loaders::{
    fetch_artifact, load_artifact, ArtifactManifest, ArtifactStore, HubArtifactStore,
    LocalArtifactStore,
};
use crate::models::{LinearSentimentClassifier, TfidfVectorizer};
use crate::normalize::{Lemmatizer, LexicalNormalizer, PerceptronTagger, StopwordSet};
use crate::pipelines::cache::ArtifactCache;
use crate::pipelines::utils::{build_cache_key, impl_device_methods, DeviceRequest};

/// Builder for sentiment pipelines.
///
/// Loads every artifact named by the store's manifest (or the default names),
/// checks that vectorizer and classifier agree on the feature dimension, and
/// fails with [`SentimentError::ArtifactLoad`](crate::SentimentError::ArtifactLoad)
/// on the first problem.
///
/// ```rust,no_run
/// use review_sentiment::sentiment::SentimentPipelineBuilder;
///
/// # fn main() -> review_sentiment::Result<()> {
/// let pipeline = SentimentPipelineBuilder::from_hub("acme/phone-review-sentiment")
///     .low_confidence_threshold(0.6)
///     .cpu()
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct SentimentPipelineBuilder {
    store: Arc<dyn ArtifactStore>,
    manifest: Option<ArtifactManifest>,
    device_request: DeviceRequest,
    cache: Option<ArtifactCache>,
    low_confidence_threshold: Option<f32>,
}

impl SentimentPipelineBuilder {
    pub fn new(store: impl ArtifactStore + 'static) -> Self {
        Self::from_store(Arc::new(store))
    }

    pub fn from_store(store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            store,
            manifest: None,
            device_request: DeviceRequest::default(),
            cache: None,
            low_confidence_threshold: None,
        }
    }

    /// Artifacts in a local directory.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(LocalArtifactStore::new(dir))
    }

    /// Artifacts in a Hugging Face Hub model repository (`main` revision).
    pub fn from_hub(repo: &str) -> Self {
        Self::new(HubArtifactStore::new(repo))
    }

    /// Use these file names instead of reading `manifest.json` from the store.
    pub fn manifest(mut self, manifest: ArtifactManifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// Share loaded artifacts with other pipelines built against the same cache.
    pub fn cache(mut self, cache: &ArtifactCache) -> Self {
        self.cache = Some(cache.clone());
        self
    }

    /// Flag predictions whose confidence is below `threshold`.
    pub fn low_confidence_threshold(mut self, threshold: f32) -> Self {
        self.low_confidence_threshold = Some(threshold);
        self
    }

    fn cached<T, F>(&self, key: String, load: F) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Result<T>,
    {
        match &self.cache {
            Some(cache) => cache.get_or_create(&key, load),
            None => load().map(Arc::new),
        }
    }

    pub fn build(self) -> Result<SentimentPipeline> {
        let device = self.device_request.resolve()?;
        let store = self.store.as_ref();
        let location = store.location();
        let manifest = match &self.manifest {
            Some(manifest) => manifest.clone(),
            None => ArtifactManifest::load_or_default(store)?,
        };
        let key = |file: &str| build_cache_key(&location, file, &device);

        let tagger = self.cached(key(&manifest.tagger), || {
            load_artifact(store, "tagger", &manifest.tagger, |path| PerceptronTagger::load(path))
        })?;
        let lemmatizer = self.cached(key(&manifest.lemmatizer), || {
            load_artifact(store, "lemmatizer", &manifest.lemmatizer, |path| Lemmatizer::load(path))
        })?;
        let stopwords = self.cached(key(&manifest.stopwords), || {
            load_artifact(store, "stopwords", &manifest.stopwords, |path| StopwordSet::load(path))
        })?;
        let vectorizer = self.cached(key(&manifest.vectorizer), || {
            load_artifact(store, "vectorizer", &manifest.vectorizer, |path| TfidfVectorizer::load(path))
        })?;
        let classifier_key = format!(
            "{}+{}",
            manifest.classifier_config, manifest.classifier_weights
        );
        let classifier = self.cached(key(&classifier_key), || {
            load_artifact(store, "classifier", &manifest.classifier_config, |config| {
                let weights = fetch_artifact(store, "classifier", &manifest.classifier_weights)?;
                LinearSentimentClassifier::load(config, weights, &device)
            })
        })?;

        let normalizer = LexicalNormalizer::new(tagger, lemmatizer, stopwords);
        let mut pipeline = SentimentPipeline::from_parts(normalizer, vectorizer, classifier)?;
        pipeline.low_confidence_threshold = self.low_confidence_threshold;

        tracing::info!(
            location = %location,
            features = pipeline.feature_dimension(),
            "sentiment pipeline ready"
        );
        Ok(pipeline)
    }
}

impl_device_methods!(SentimentPipelineBuilder);
