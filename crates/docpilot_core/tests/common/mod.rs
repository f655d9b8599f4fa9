//! Shared fixtures for integration tests.

#![allow(dead_code)]

use docpilot_core::{GenerationError, TextGenerator};
use std::cell::RefCell;
use std::io::Read;

/// Deterministic generator that records prompts and answers
/// `"<prefix> <n>"` for the n-th call (1-based).
pub struct ScriptedGenerator {
    prefix: String,
    fail_on_call: Option<usize>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            fail_on_call: None,
            prompts: RefCell::new(Vec::new()),
        }
    }

    /// Fails the given 1-based call with `GenerationError::Timeout`.
    pub fn failing_on(prefix: &str, call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::new(prefix)
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.borrow().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut prompts = self.prompts.borrow_mut();
        prompts.push(prompt.to_string());
        let call = prompts.len();
        if self.fail_on_call == Some(call) {
            return Err(GenerationError::Timeout { after_secs: 60 });
        }
        Ok(format!("{} {call}", self.prefix))
    }
}

pub fn titles(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Reads one archive entry of an exported package as UTF-8.
pub fn read_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut text = String::new();
    entry.read_to_string(&mut text).unwrap();
    text
}

/// Lists archive entry names.
pub fn entry_names(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    archive.file_names().map(str::to_string).collect()
}
