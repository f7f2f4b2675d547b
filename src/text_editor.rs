//! Plain-text stand-in for the rich-text editor.
//!
//! Each line is a paragraph. The serialized form uses the same
//! root/paragraph/text node layout as the browser editor, so snapshots and
//! remote content are interchangeable.

use anyhow::{Context, Result};
use draftkeep_session::Editor;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct SerializedState<'a> {
    root: RootNode<'a>,
}

#[derive(Serialize)]
struct RootNode<'a> {
    children: Vec<ParagraphNode<'a>>,
    direction: Option<&'static str>,
    format: &'static str,
    indent: u32,
    #[serde(rename = "type")]
    kind: &'static str,
    version: u32,
}

#[derive(Serialize)]
struct ParagraphNode<'a> {
    children: Vec<TextNode<'a>>,
    direction: Option<&'static str>,
    format: &'static str,
    indent: u32,
    #[serde(rename = "type")]
    kind: &'static str,
    version: u32,
}

#[derive(Serialize)]
struct TextNode<'a> {
    detail: u32,
    format: u32,
    mode: &'static str,
    style: &'static str,
    text: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    version: u32,
}

impl<'a> ParagraphNode<'a> {
    fn new(text: &'a str) -> Self {
        let children = if text.is_empty() {
            Vec::new()
        } else {
            vec![TextNode {
                detail: 0,
                format: 0,
                mode: "normal",
                style: "",
                text,
                kind: "text",
                version: 1,
            }]
        };
        Self {
            direction: (!children.is_empty()).then_some("ltr"),
            children,
            format: "",
            indent: 0,
            kind: "paragraph",
            version: 1,
        }
    }
}

// Loading is lenient: unknown node kinds and fields are skipped.
#[derive(Deserialize)]
struct LoadedState {
    root: LoadedNode,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct LoadedNode {
    children: Vec<LoadedNode>,
    text: Option<String>,
}

impl LoadedNode {
    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TextEditor {
    paragraphs: Vec<String>,
}

impl TextEditor {
    pub fn push_paragraph(&mut self, text: &str) {
        self.paragraphs.push(text.to_string());
    }

    /// Remove the last paragraph, if any
    pub fn pop_paragraph(&mut self) -> Option<String> {
        self.paragraphs.pop()
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    pub fn plain_text(&self) -> String {
        self.paragraphs.join("\n")
    }
}

impl Editor for TextEditor {
    fn serialize(&self) -> String {
        let children = if self.paragraphs.is_empty() {
            vec![ParagraphNode::new("")]
        } else {
            self.paragraphs.iter().map(|p| ParagraphNode::new(p)).collect()
        };
        let state = SerializedState {
            root: RootNode {
                children,
                direction: None,
                format: "",
                indent: 0,
                kind: "root",
                version: 1,
            },
        };
        // Plain structs of strings and integers always serialize
        serde_json::to_string(&state).unwrap_or_default()
    }

    fn load(&mut self, state: &str) -> Result<()> {
        let loaded: LoadedState =
            serde_json::from_str(state).context("document is not valid editor JSON")?;
        let mut paragraphs: Vec<String> = loaded
            .root
            .children
            .iter()
            .map(|node| {
                let mut text = String::new();
                node.collect_text(&mut text);
                text
            })
            .collect();
        if paragraphs.len() == 1 && paragraphs[0].is_empty() {
            paragraphs.clear();
        }
        self.paragraphs = paragraphs;
        Ok(())
    }

    fn reset(&mut self) {
        self.paragraphs.clear();
    }
}
