use crate::error::{Error, Result};
use crate::session::TargetSentence;
use include_dir::{include_dir, Dir};
use rand::Rng;
use serde::Deserialize;
use std::fs;
use std::path::Path;

static POOL_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/pools");

/// Something that can hand out the next sentence to type
pub trait SentenceSource {
    fn draw(&mut self) -> TargetSentence;
}

/// A fixed list of candidate sentences, drawn from uniformly.
#[derive(Deserialize, Clone, Debug)]
pub struct SentencePool {
    pub name: String,
    sentences: Vec<String>,
}

impl SentencePool {
    /// Load one of the pools compiled into the binary (`classic`, `pangrams`).
    pub fn embedded(name: &str) -> Result<Self> {
        let file = POOL_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| Error::UnknownPool(name.to_string()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| Error::UnknownPool(name.to_string()))?;

        let pool: SentencePool = serde_json::from_str(contents)?;
        Self::from_sentences(pool.name, pool.sentences)
    }

    /// Load a pool from disk. `.json` files use the embedded pool layout,
    /// anything else is read as one sentence per line.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "custom".to_string());

        if path.extension().is_some_and(|ext| ext == "json") {
            let pool: SentencePool = serde_json::from_str(&contents)?;
            Self::from_sentences(pool.name, pool.sentences)
        } else {
            Self::from_sentences(name, contents.lines().map(str::to_string).collect())
        }
    }

    /// Build a pool, dropping blank entries. Fails if nothing is left.
    pub fn from_sentences(name: impl Into<String>, sentences: Vec<String>) -> Result<Self> {
        let name = name.into();
        let sentences: Vec<String> = sentences
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .collect();

        if sentences.is_empty() {
            return Err(Error::EmptyPool(name));
        }

        Ok(Self { name, sentences })
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn draw_with<R: Rng + ?Sized>(&self, rng: &mut R) -> TargetSentence {
        let idx = rng.gen_range(0..self.sentences.len());
        TargetSentence::new(&self.sentences[idx])
    }
}

impl SentenceSource for SentencePool {
    fn draw(&mut self) -> TargetSentence {
        self.draw_with(&mut rand::thread_rng())
    }
}

/// Always hands back the same sentence (used for `--prompt`).
#[derive(Clone, Debug)]
pub struct FixedSentence(pub TargetSentence);

impl SentenceSource for FixedSentence {
    fn draw(&mut self) -> TargetSentence {
        self.0.clone()
    }
}
