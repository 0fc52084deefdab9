// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Minimal client for the Gemini `generateContent` endpoint. Configuration is
//! injected at construction; nothing in here reads the environment.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
}

impl GeminiConfig {
    /// Build from `GEMINI_API_KEY` / `GEMINI_MODEL`. Called once in `main`;
    /// library code only ever sees the resulting config.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .context("GEMINI_API_KEY is not set; AI features are unavailable")?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self { api_key, model })
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

pub struct GeminiClient {
    http: reqwest::blocking::Client,
    cfg: GeminiConfig,
}

impl GeminiClient {
    pub fn new(cfg: GeminiConfig) -> Result<Self> {
        Ok(Self {
            http: crate::utils::http_client()?,
            cfg,
        })
    }

    /// Send a prompt and return the concatenated candidate text.
    pub fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.cfg.model, self.cfg.api_key
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .context("Network error reaching Gemini")?;

        let status = resp.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            bail!("Gemini rejected the API key; check GEMINI_API_KEY");
        }
        let resp = resp
            .error_for_status()
            .with_context(|| format!("Gemini request failed for model {}", self.cfg.model))?;

        let parsed: GenerateResponse = resp.json().context("Malformed Gemini response")?;
        let text: String = parsed
            .candidates
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| c.content)
            .filter_map(|c| c.parts)
            .flatten()
            .filter_map(|p| p.text)
            .collect();

        if text.is_empty() {
            bail!("Gemini returned no text");
        }
        Ok(text)
    }
}
