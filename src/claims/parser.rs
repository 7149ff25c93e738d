//! Recovery of structured JSON from raw model completions.
//!
//! Model output is run through an ordered list of [`ParseStrategy`]
//! implementations. The first strategy that yields valid JSON wins; when none
//! does, the output is rejected as malformed. No other repair is attempted.

use crate::error::PipelineError;
use serde_json::Value;

const FENCE: &str = "```";

/// One attempt at turning model text into JSON.
pub trait ParseStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn parse(&self, text: &str) -> Option<Value>;
}

/// Parses the text as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectJson;

impl ParseStrategy for DirectJson {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn parse(&self, text: &str) -> Option<Value> {
        serde_json::from_str(text).ok()
    }
}

/// Removes a surrounding markdown code fence, then parses.
#[derive(Debug, Default, Clone, Copy)]
pub struct FenceStripped;

impl ParseStrategy for FenceStripped {
    fn name(&self) -> &'static str {
        "fence-stripped"
    }

    fn parse(&self, text: &str) -> Option<Value> {
        serde_json::from_str(strip_code_fence(text)).ok()
    }
}

/// Strips a leading ```` ``` ```` with an optional language tag and a trailing
/// ```` ``` ````, along with the whitespace around them. Fences in the middle of
/// the text are left alone.
///
/// A word right after the opening fence only counts as a language tag when
/// whitespace follows it, so ```` ```123``` ```` keeps its payload.
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix(FENCE) {
        body = rest;
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        if tag_len > 0 && rest[tag_len..].starts_with(char::is_whitespace) {
            body = &rest[tag_len..];
        }
    }

    if let Some(rest) = body.strip_suffix(FENCE) {
        body = rest;
    }

    body.trim()
}

/// JSON recovered from a completion, tagged with the strategy that found it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOutput {
    pub value: Value,
    pub strategy: &'static str,
}

/// Ordered chain of parse strategies.
pub struct ResponseParser {
    strategies: Vec<Box<dyn ParseStrategy>>,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new(vec![Box::new(DirectJson), Box::new(FenceStripped)])
    }
}

impl ResponseParser {
    pub fn new(strategies: Vec<Box<dyn ParseStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn parse(&self, text: &str) -> Result<ParsedOutput, PipelineError> {
        for strategy in &self.strategies {
            if let Some(value) = strategy.parse(text) {
                tracing::debug!(strategy = strategy.name(), "model output parsed");
                return Ok(ParsedOutput {
                    value,
                    strategy: strategy.name(),
                });
            }
            tracing::debug!(strategy = strategy.name(), "parse strategy did not match");
        }

        Err(PipelineError::MalformedOutput)
    }
}
