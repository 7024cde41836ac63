//! Prompt templates: `(template name, variables) -> (messages, model parameters)`.
//!
//! Templates are `.prompty` files:
//!
//! ```text
//! ---
//! name: Intent Mapping
//! model:
//!   parameters:
//!     temperature: 0.0
//! inputs:
//!   conversation:
//!     type: array
//! ---
//! system:
//! Decide what to do with {{conversation.0.content}}
//! ```
//!
//! The YAML front matter carries the model parameter set (forwarded to the
//! provider unchanged) and the declared inputs. The body is rendered with
//! handlebars and split into role-tagged messages on `system:` / `user:` /
//! `assistant:` marker lines.
//!
//! Only marker lines written in the template itself start a message. Marker
//! lines inside substituted `{{value}}`s are tagged by the escape function,
//! skipped by the splitter, and restored in the message content. Triple-stash
//! `{{{value}}}` bypasses escaping and must not carry untrusted text.

use std::path::{Path, PathBuf};

use ai_llm_service::{ChatMessage, ChatRole, ModelParameters};
use handlebars::Handlebars;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{GroundedChatError, Result};

/// Template deciding between retrieval and a direct reply.
pub const INTENT_MAPPING: &str = "intent_mapping";
/// Template wrapping retrieved documents into system instructions.
pub const GROUNDED_CHAT: &str = "grounded_chat";

const EXTENSION: &str = "prompty";

/// Private-use tag prefixed to marker lines coming from substituted values.
const MARKER_ESCAPE: char = '\u{E000}';

/// Directory of `.prompty` files, read on every load.
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    dir: PathBuf,
}

impl PromptLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Templates shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{EXTENSION}"))
    }

    /// Loads and parses `name`.
    ///
    /// # Errors
    /// - [`GroundedChatError::TemplateNotFound`] if the file does not exist
    /// - [`GroundedChatError::TemplateInvalid`] if front matter is broken
    pub async fn load(&self, name: &str) -> Result<PromptTemplate> {
        let path = self.path_of(name);
        let source = match tokio::fs::read_to_string(&path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GroundedChatError::TemplateNotFound { path });
            }
            Err(e) => return Err(e.into()),
        };
        debug!(template = name, path = %path.display(), "prompt template loaded");
        PromptTemplate::parse(name, &source)
    }
}

/// Front matter of a `.prompty` file. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    model: Option<ModelSection>,
    #[serde(default)]
    inputs: Option<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct ModelSection {
    #[serde(default)]
    parameters: Option<ModelParameters>,
}

/// Parsed template, ready to render.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,
    pub title: Option<String>,
    pub parameters: ModelParameters,
    inputs: Map<String, Value>,
    body: String,
}

/// Output of [`PromptTemplate::render`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPrompt {
    pub messages: Vec<ChatMessage>,
    pub parameters: ModelParameters,
}

impl PromptTemplate {
    /// Splits `source` into front matter and body.
    pub fn parse(name: &str, source: &str) -> Result<Self> {
        let invalid = |reason: String| GroundedChatError::TemplateInvalid {
            name: name.to_string(),
            reason,
        };

        let (front, body) = split_front_matter(source)
            .ok_or_else(|| invalid("missing `---` delimited front matter".into()))?;

        let fm: FrontMatter = if front.trim().is_empty() {
            FrontMatter::default()
        } else {
            serde_yml::from_str(front).map_err(|e| invalid(format!("front matter: {e}")))?
        };

        Ok(Self {
            name: name.to_string(),
            title: fm.name,
            parameters: fm.model.and_then(|m| m.parameters).unwrap_or_default(),
            inputs: fm.inputs.unwrap_or_default(),
            body: body.to_string(),
        })
    }

    /// Renders the body with `vars` and splits it into messages.
    ///
    /// Declared inputs missing from `vars` take their `default`, otherwise
    /// rendering fails.
    pub fn render(&self, vars: &Map<String, Value>) -> Result<RenderedPrompt> {
        let mut data = vars.clone();
        for (input, spec) in &self.inputs {
            if data.contains_key(input) {
                continue;
            }
            match spec.get("default") {
                Some(default) => {
                    data.insert(input.clone(), default.clone());
                }
                None => {
                    return Err(GroundedChatError::TemplateRender {
                        name: self.name.clone(),
                        reason: format!("missing input `{input}`"),
                    });
                }
            }
        }

        let mut hb = Handlebars::new();
        hb.register_escape_fn(escape_role_markers);
        let text = hb
            .render_template(&self.body, &Value::Object(data))
            .map_err(|e| GroundedChatError::TemplateRender {
                name: self.name.clone(),
                reason: e.to_string(),
            })?;

        Ok(RenderedPrompt {
            messages: split_roles(&text),
            parameters: self.parameters.clone(),
        })
    }
}

fn split_front_matter(source: &str) -> Option<(&str, &str)> {
    let rest = source.trim_start_matches('\u{feff}');
    let rest = rest.strip_prefix("---")?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn role_marker(line: &str) -> Option<ChatRole> {
    let head = line.trim().strip_suffix(':')?;
    ChatRole::parse(head)
}

/// A marker line, possibly already tagged one or more times.
fn is_marker_like(line: &str) -> bool {
    role_marker(line.trim_start_matches(MARKER_ESCAPE)).is_some()
}

/// Handlebars escape: tags every marker-like line of a substituted value.
fn escape_role_markers(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for piece in value.split_inclusive('\n') {
        if is_marker_like(piece.trim_end_matches(['\n', '\r'])) {
            out.push(MARKER_ESCAPE);
        }
        out.push_str(piece);
    }
    out
}

/// Drops the tag added by [`escape_role_markers`].
fn unescape_line(line: &str) -> &str {
    match line.strip_prefix(MARKER_ESCAPE) {
        Some(rest) if is_marker_like(line) => rest,
        _ => line,
    }
}

/// Joins a section's lines into message content.
///
/// Empty lines around the body come from the template layout and are dropped;
/// everything in between, including surrounding spaces, is kept as is.
fn section_content(lines: &[&str]) -> Option<String> {
    let start = lines.iter().position(|l| !l.is_empty())?;
    let end = lines.iter().rposition(|l| !l.is_empty())?;
    Some(
        lines[start..=end]
            .iter()
            .map(|l| unescape_line(l))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

/// Splits rendered text on template role marker lines. Text before the first
/// marker is a system message; empty sections are dropped.
fn split_roles(text: &str) -> Vec<ChatMessage> {
    let mut out = Vec::new();
    let mut role = ChatRole::System;
    let mut lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some(next) = role_marker(line) {
            if let Some(content) = section_content(&lines) {
                out.push(ChatMessage::new(role, content));
            }
            lines.clear();
            role = next;
        } else {
            lines.push(line);
        }
    }
    if let Some(content) = section_content(&lines) {
        out.push(ChatMessage::new(role, content));
    }
    out
}
