use std::fs;
use std::path::{Path, PathBuf};

use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::error::{Error, Result};

static TEXT_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/texts");

const EMBEDDED_FILE: &str = "paragraphs.json";

/// Supplies the paragraph for a new session
pub trait TextSource: Send {
    fn paragraph(&mut self) -> Result<String>;
}

/// On-disk and embedded paragraph collection format
#[derive(Deserialize, Clone, Debug)]
pub struct ParagraphSet {
    pub paragraphs: Vec<String>,
}

impl ParagraphSet {
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Picks one non-blank paragraph uniformly at random.
    pub fn choose(&self, source_name: &str) -> Result<String> {
        let candidates: Vec<&String> = self
            .paragraphs
            .iter()
            .filter(|p| !p.trim().is_empty())
            .collect();
        candidates
            .choose(&mut rand::thread_rng())
            .map(|p| p.to_string())
            .ok_or_else(|| Error::NoParagraphs {
                source_name: source_name.to_string(),
            })
    }
}

/// Paragraphs bundled into the binary
#[derive(Clone, Debug)]
pub struct EmbeddedParagraphs {
    set: ParagraphSet,
}

impl EmbeddedParagraphs {
    pub fn new() -> Result<Self> {
        let file = TEXT_DIR
            .get_file(EMBEDDED_FILE)
            .ok_or_else(|| Error::NoParagraphs {
                source_name: EMBEDDED_FILE.to_string(),
            })?;
        let data = file.contents_utf8().ok_or_else(|| Error::NoParagraphs {
            source_name: EMBEDDED_FILE.to_string(),
        })?;
        Ok(Self {
            set: ParagraphSet::from_json(data)?,
        })
    }

    pub fn len(&self) -> usize {
        self.set.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.paragraphs.is_empty()
    }
}

impl TextSource for EmbeddedParagraphs {
    fn paragraph(&mut self) -> Result<String> {
        self.set.choose(EMBEDDED_FILE)
    }
}

/// Paragraphs read from a JSON file each time one is requested
#[derive(Clone, Debug)]
pub struct ParagraphFile {
    path: PathBuf,
}

impl ParagraphFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TextSource for ParagraphFile {
    fn paragraph(&mut self) -> Result<String> {
        let data = fs::read_to_string(&self.path)?;
        ParagraphSet::from_json(&data)?.choose(&self.path.display().to_string())
    }
}

/// Always hands out the same text
#[derive(Clone, Debug)]
pub struct FixedText(pub String);

impl TextSource for FixedText {
    fn paragraph(&mut self) -> Result<String> {
        Ok(self.0.clone())
    }
}
