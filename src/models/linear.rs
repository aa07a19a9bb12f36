//! Linear text classifiers evaluated with candle.
//!
//! Both supported model families reduce to `softmax(x · Wᵀ + b)` over the two
//! classes:
//!
//! - logistic regression stores one weight row; the negative row is all zeros so
//!   the softmax collapses to `σ(w·x + b)`;
//! - multinomial naive Bayes stores per-class feature log-probabilities and class
//!   log-priors, so the logits are the joint log likelihood.

use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor, D};
use candle_nn::ops::softmax;
use serde::Deserialize;

use crate::error::{Result, SentimentError};
use crate::pipelines::sentiment::{ClassProbabilities, FeatureVector, SentimentClassifier};

/// Classifier config format this build understands.
pub const CLASSIFIER_FORMAT_VERSION: u32 = 1;

const ARTIFACT: &str = "classifier";

const POSITIVE_CLASSES: &[&str] = &["positive", "positif", "pos", "1"];
const NEGATIVE_CLASSES: &[&str] = &["negative", "negatif", "neg", "0"];

/// Model family stored in a classifier artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    /// Tensors `coef` `[1, n]` and `intercept` `[1]`.
    LogisticRegression,
    /// Tensors `feature_log_prob` `[2, n]` and `class_log_prior` `[2]`.
    MultinomialNb,
}

#[derive(Deserialize)]
struct ClassifierConfig {
    format_version: u32,
    kind: ClassifierKind,
    classes: Vec<String>,
}

/// Binary linear classifier over TF-IDF features.
#[derive(Debug, Clone)]
pub struct LinearSentimentClassifier {
    kind: ClassifierKind,
    /// `[n, 2]`, contiguous.
    weight_t: Tensor,
    /// `[2]`.
    bias: Tensor,
    n_features: usize,
    device: Device,
}

impl LinearSentimentClassifier {
    /// Logistic regression from a weight row and intercept.
    pub fn logistic_regression(coef: &[f32], intercept: f32, device: &Device) -> Result<Self> {
        let coef = Tensor::from_slice(coef, (1, coef.len()), device)?;
        let intercept = Tensor::new(&[intercept], device)?;
        Self::from_tensors(
            ClassifierKind::LogisticRegression,
            HashMap::from([("coef".to_string(), coef), ("intercept".to_string(), intercept)]),
            device,
        )
    }

    /// Multinomial naive Bayes from `[negative, positive]` parameter rows.
    pub fn multinomial_nb(
        feature_log_prob: [&[f32]; 2],
        class_log_prior: [f32; 2],
        device: &Device,
    ) -> Result<Self> {
        let [neg, pos] = feature_log_prob;
        if neg.len() != pos.len() {
            return Err(SentimentError::artifact(
                ARTIFACT,
                "feature_log_prob rows differ in length",
            ));
        }
        let rows = Tensor::stack(
            &[Tensor::new(neg, device)?, Tensor::new(pos, device)?],
            0,
        )?;
        let prior = Tensor::new(&class_log_prior, device)?;
        Self::from_tensors(
            ClassifierKind::MultinomialNb,
            HashMap::from([
                ("feature_log_prob".to_string(), rows),
                ("class_log_prior".to_string(), prior),
            ]),
            device,
        )
    }

    /// Build from named tensors as stored in the weights file.
    pub fn from_tensors(
        kind: ClassifierKind,
        mut tensors: HashMap<String, Tensor>,
        device: &Device,
    ) -> Result<Self> {
        let mut take = |name: &str| -> Result<Tensor> {
            let tensor = tensors.remove(name).ok_or_else(|| {
                SentimentError::artifact(ARTIFACT, format!("missing tensor '{name}'"))
            })?;
            Ok(tensor.to_device(device)?.to_dtype(DType::F32)?)
        };

        let (weight, bias) = match kind {
            ClassifierKind::LogisticRegression => {
                let coef = take("coef")?;
                let intercept = take("intercept")?;
                let n = match coef.dims() {
                    [1, n] => *n,
                    dims => {
                        return Err(SentimentError::artifact(
                            ARTIFACT,
                            format!("coef must have shape [1, n], got {dims:?}"),
                        ))
                    }
                };
                if intercept.dims() != [1] {
                    return Err(SentimentError::artifact(
                        ARTIFACT,
                        format!("intercept must have shape [1], got {:?}", intercept.dims()),
                    ));
                }
                let zeros = Tensor::zeros((1, n), DType::F32, device)?;
                let bias_zero = Tensor::zeros(1, DType::F32, device)?;
                (
                    Tensor::cat(&[&zeros, &coef], 0)?,
                    Tensor::cat(&[&bias_zero, &intercept], 0)?,
                )
            }
            ClassifierKind::MultinomialNb => {
                let rows = take("feature_log_prob")?;
                let prior = take("class_log_prior")?;
                if !matches!(rows.dims(), [2, _]) {
                    return Err(SentimentError::artifact(
                        ARTIFACT,
                        format!("feature_log_prob must have shape [2, n], got {:?}", rows.dims()),
                    ));
                }
                if prior.dims() != [2] {
                    return Err(SentimentError::artifact(
                        ARTIFACT,
                        format!("class_log_prior must have shape [2], got {:?}", prior.dims()),
                    ));
                }
                (rows, prior)
            }
        };

        let n_features = weight.dim(1)?;
        if n_features == 0 {
            return Err(SentimentError::artifact(ARTIFACT, "feature dimension is zero"));
        }

        Ok(Self {
            kind,
            weight_t: weight.t()?.contiguous()?,
            bias,
            n_features,
            device: device.clone(),
        })
    }

    /// Load a JSON config plus safetensors weights.
    pub fn load(
        config_path: impl AsRef<Path>,
        weights_path: impl AsRef<Path>,
        device: &Device,
    ) -> Result<Self> {
        let config_path = config_path.as_ref();
        let json = std::fs::read_to_string(config_path).map_err(|e| {
            SentimentError::artifact(ARTIFACT, format!("{}: {e}", config_path.display()))
        })?;
        let config: ClassifierConfig =
            serde_json::from_str(&json).map_err(|e| SentimentError::artifact(ARTIFACT, e))?;
        if config.format_version != CLASSIFIER_FORMAT_VERSION {
            return Err(SentimentError::artifact(
                ARTIFACT,
                format!(
                    "format version {} is not supported (expected {CLASSIFIER_FORMAT_VERSION})",
                    config.format_version
                ),
            ));
        }
        check_classes(&config.classes)?;

        let weights_path = weights_path.as_ref();
        let tensors = candle_core::safetensors::load(weights_path, device).map_err(|e| {
            SentimentError::artifact(ARTIFACT, format!("{}: {e}", weights_path.display()))
        })?;
        Self::from_tensors(config.kind, tensors, device)
    }

    pub fn kind(&self) -> ClassifierKind {
        self.kind
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

fn check_classes(classes: &[String]) -> Result<()> {
    fn is_one_of(class: &str, names: &[&str]) -> bool {
        names.contains(&class.to_lowercase().as_str())
    }
    match classes {
        [neg, pos] if is_one_of(neg, NEGATIVE_CLASSES) && is_one_of(pos, POSITIVE_CLASSES) => {
            Ok(())
        }
        _ => Err(SentimentError::artifact(
            ARTIFACT,
            format!("expected classes [negative, positive], got {classes:?}"),
        )),
    }
}

impl SentimentClassifier for LinearSentimentClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<ClassProbabilities> {
        if features.dimension() != self.n_features {
            return Err(SentimentError::Unexpected(format!(
                "feature vector has {} entries, classifier expects {}",
                features.dimension(),
                self.n_features
            )));
        }

        let x = Tensor::from_slice(features.as_slice(), (1, self.n_features), &self.device)?;
        let logits = x.matmul(&self.weight_t)?.broadcast_add(&self.bias)?;
        let probs = softmax(&logits, D::Minus1)?.squeeze(0)?.to_vec1::<f32>()?;

        match probs.as_slice() {
            [p0, p1] => Ok(ClassProbabilities::new(*p0, *p1)),
            other => Err(SentimentError::Unexpected(format!(
                "expected two class probabilities, got {}",
                other.len()
            ))),
        }
    }

    fn dimension(&self) -> usize {
        self.n_features
    }
}
