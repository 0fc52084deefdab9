// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Price quotes. The only source today prompts Gemini and scrapes a JSON
//! object out of its free-form reply; that fragile boundary lives entirely in
//! this module, so valuation code only ever sees a typed `Option<Quote>`.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::gemini::{GeminiClient, GeminiConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub price: Decimal,
    pub name: Option<String>,
}

pub trait QuoteSource {
    /// `Ok(None)` is a lookup miss (soft failure, keep the last known price);
    /// `Err` is a transport or configuration problem.
    fn fetch_quote(&self, symbol: &str) -> Result<Option<Quote>>;
}

/// Best-effort extraction of the first well-formed JSON object embedded in
/// free text. Tolerates prose and markdown fences around the payload; brace
/// matching is string- and escape-aware, and each balanced candidate must
/// actually parse before it wins.
pub fn extract_first_json(text: &str) -> Option<Value> {
    let mut search_from = 0;
    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        if let Some(end) = balanced_end(&text[start..]) {
            let candidate = &text[start..start + end];
            if let Ok(v @ Value::Object(_)) = serde_json::from_str::<Value>(candidate) {
                return Some(v);
            }
        }
        search_from = start + 1;
    }
    None
}

/// Byte offset one past the brace that closes the object opening at byte 0,
/// or None if the text ends first.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

fn quote_prompt(symbol: &str) -> String {
    format!(
        "Find the current stock price and full company name for \"{}\". \
         If it is a Taiwan stock, provide the price in TWD. If US, in USD. \
         Return the output as a JSON object with keys \"price\" (number) and \"name\" (string).",
        symbol
    )
}

#[derive(Deserialize)]
struct QuotePayload {
    price: f64,
    name: Option<String>,
}

pub struct GeminiQuotes {
    client: GeminiClient,
}

impl GeminiQuotes {
    pub fn new(cfg: GeminiConfig) -> Result<Self> {
        Ok(Self {
            client: GeminiClient::new(cfg)?,
        })
    }
}

impl QuoteSource for GeminiQuotes {
    fn fetch_quote(&self, symbol: &str) -> Result<Option<Quote>> {
        let text = self.client.generate(&quote_prompt(symbol))?;
        let Some(value) = extract_first_json(&text) else {
            return Ok(None);
        };
        let Ok(payload) = serde_json::from_value::<QuotePayload>(value) else {
            return Ok(None);
        };
        let Some(price) = Decimal::from_f64_retain(payload.price) else {
            return Ok(None);
        };
        if price <= Decimal::ZERO {
            return Ok(None);
        }
        Ok(Some(Quote {
            price,
            name: payload.name,
        }))
    }
}
