//! Runtime loading of contract ABI definitions
//!
//! The deployment pipeline emits one JSON ABI file per contract; the harness
//! loads them at startup and binds proxies against the parsed descriptions.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use alloy_json_abi::JsonAbi;
use eyre::Result;

use crate::error::HarnessError;

/// In-memory registry of parsed contract ABIs, keyed by contract name
#[derive(Debug, Clone, Default)]
pub struct AbiRegistry {
    abis: HashMap<String, JsonAbi>,
}

impl AbiRegistry {
    /// Load every `*.json` ABI file from a directory
    ///
    /// The file stem becomes the contract name, e.g. `Fund.json` -> `Fund`.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut registry = Self::default();
        let entries = fs::read_dir(dir)
            .map_err(|e| HarnessError::Abi(format!("read dir {}: {}", dir.display(), e)))?;

        for entry in entries {
            let path = entry
                .map_err(|e| HarnessError::Abi(format!("read dir {}: {}", dir.display(), e)))?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let content = fs::read_to_string(&path)
                .map_err(|e| HarnessError::Abi(format!("read {}: {}", path.display(), e)))?;
            registry.insert(name, Self::parse(name, &content)?);
        }

        Ok(registry)
    }

    /// Parse a single ABI document
    pub fn parse(name: &str, content: &str) -> Result<JsonAbi> {
        let abi: JsonAbi = serde_json::from_str(content)
            .map_err(|e| HarnessError::Abi(format!("parse ABI '{}': {}", name, e)))?;
        Ok(abi)
    }

    /// Register an ABI under a contract name
    pub fn insert(&mut self, name: &str, abi: JsonAbi) {
        self.abis.insert(name.to_string(), abi);
    }

    /// ABI of a named contract
    pub fn get(&self, name: &str) -> Result<&JsonAbi> {
        self.abis
            .get(name)
            .ok_or_else(|| HarnessError::Abi(format!("no ABI loaded for '{}'", name)).into())
    }

    pub fn len(&self) -> usize {
        self.abis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abis.is_empty()
    }
}
