#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use candle_core::{Device, Tensor};
use review_sentiment::models::{LinearSentimentClassifier, TfidfOptions, TfidfVectorizer};
use review_sentiment::normalize::{Lemmatizer, LexicalNormalizer, PerceptronTagger, StopwordSet};
use review_sentiment::sentiment::SentimentPipeline;
use review_sentiment::Result;
use serde_json::{json, Value};

pub const SCENARIO_A: &str = "I absolutely love this phone! The camera quality is stunning.";
pub const SCENARIO_B: &str = "This was a terrible purchase. The phone started lagging.";
pub const SCENARIO_C: &str = "123 456 !!!";

pub const VOCABULARY: [&str; 12] = [
    "absolutely",
    "camera",
    "check",
    "great",
    "lag",
    "love",
    "phone",
    "purchase",
    "quality",
    "start",
    "stunning",
    "terrible",
];

pub const COEF: [f32; 12] = [
    0.5, 0.3, 0.0, 1.5, -1.5, 2.0, 0.0, -0.3, 0.3, -0.2, 2.0, -2.5,
];
pub const INTERCEPT: f32 = 0.1;

pub fn tagger_json() -> Value {
    json!({
        "format_version": 1,
        "tagset": "penn",
        "classes": ["DT", "JJ", "NN", "PRP", "RB", "VBD", "VBG", "VBP", "VBZ"],
        "tagdict": {
            "i": "PRP", "this": "DT", "the": "DT", "a": "DT",
            "is": "VBZ", "was": "VBD", "every": "DT"
        },
        "weights": {
            "bias": { "NN": 0.5 },
            "i suffix ing": { "VBG": 2.0 },
            "i suffix ely": { "RB": 2.5 },
            "i suffix ted": { "VBD": 2.0 },
            "i word love": { "VBP": 3.0 },
            "i word stunning": { "JJ": 3.0 },
            "i word terrible": { "JJ": 3.0 },
            "i word great": { "JJ": 3.0 },
            "i word phone": { "NN": 2.0 },
            "i word purchase": { "NN": 2.0 },
            "i-1 tag DT": { "NN": 0.5 },
            "i-1 tag VBZ": { "JJ": 1.0 },
            "i-1 tag JJ": { "NN": 1.0 },
            "i-1 tag VBD": { "VBG": 1.0 }
        }
    })
}

pub fn lemmatizer_json() -> Value {
    json!({
        "format_version": 1,
        "lemmas": {
            "noun": ["battery", "camera", "check", "mouse", "phone", "purchase", "quality"],
            "verb": ["be", "buy", "check", "lag", "love", "run", "start", "stun"],
            "adj": ["good", "great", "stunning", "terrible", "well"],
            "adv": ["absolutely", "now", "well"]
        },
        "exceptions": {
            "noun": { "mice": ["mouse"] },
            "verb": { "lagging": ["lag"], "ran": ["run"] },
            "adj": { "better": ["good", "well"] }
        }
    })
}

pub const STOPWORDS: &str = "# english subset\ni\nme\nmy\nthe\na\nan\nthis\nthat\nis\nwas\nwere\nbe\nand\nor\nto\nof\nit\nnot\nnow\n";

pub fn vectorizer_json() -> Value {
    let vocabulary: HashMap<&str, usize> = VOCABULARY.iter().enumerate().map(|(i, t)| (*t, i)).collect();
    let idf: Vec<f64> = VOCABULARY
        .iter()
        .map(|t| if *t == "phone" { 1.0 } else { 1.5 })
        .collect();
    json!({
        "format_version": 1,
        "vocabulary": vocabulary,
        "idf": idf,
        "norm": "l2"
    })
}

pub fn classifier_json() -> Value {
    json!({
        "format_version": 1,
        "kind": "logistic_regression",
        "classes": ["Negatif", "Positif"]
    })
}

pub fn normalizer() -> LexicalNormalizer {
    LexicalNormalizer::new(
        Arc::new(PerceptronTagger::from_json_str(&tagger_json().to_string()).unwrap()),
        Arc::new(Lemmatizer::from_json_str(&lemmatizer_json().to_string()).unwrap()),
        Arc::new(StopwordSet::parse(STOPWORDS)),
    )
}

pub fn vectorizer() -> TfidfVectorizer {
    TfidfVectorizer::from_json_str(&vectorizer_json().to_string()).unwrap()
}

/// In-memory pipeline over the fixture artifacts.
pub fn pipeline() -> SentimentPipeline {
    let classifier =
        LinearSentimentClassifier::logistic_regression(&COEF, INTERCEPT, &Device::Cpu).unwrap();
    SentimentPipeline::from_parts(normalizer(), Arc::new(vectorizer()), Arc::new(classifier))
        .unwrap()
}

/// Vectorizer with default options over the fixture vocabulary.
pub fn plain_vectorizer(n: usize) -> TfidfVectorizer {
    let vocabulary = VOCABULARY[..n]
        .iter()
        .enumerate()
        .map(|(i, t)| (t.to_string(), i))
        .collect();
    TfidfVectorizer::new(vocabulary, vec![1.0; n], TfidfOptions::default()).unwrap()
}

fn write_json(dir: &Path, name: &str, value: &Value) -> Result<()> {
    std::fs::write(dir.join(name), serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Write the fixture artifacts under their default names.
pub fn write_store(dir: &Path) -> Result<()> {
    write_json(dir, "pos_tagger.json", &tagger_json())?;
    write_json(dir, "lemmatizer.json", &lemmatizer_json())?;
    std::fs::write(dir.join("stopwords.txt"), STOPWORDS)?;
    write_json(dir, "vectorizer.json", &vectorizer_json())?;
    write_json(dir, "classifier.json", &classifier_json())?;
    write_weights(dir, "classifier.safetensors", &COEF, INTERCEPT)
}

pub fn write_weights(dir: &Path, name: &str, coef: &[f32], intercept: f32) -> Result<()> {
    let device = Device::Cpu;
    let tensors = HashMap::from([
        (
            "coef".to_string(),
            Tensor::from_slice(coef, (1, coef.len()), &device)?,
        ),
        ("intercept".to_string(), Tensor::new(&[intercept], &device)?),
    ]);
    candle_core::safetensors::save(&tensors, dir.join(name))?;
    Ok(())
}

pub fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}
