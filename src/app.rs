//! Line-oriented editing session.
//!
//! Plain input lines become paragraphs; lines starting with `:` are commands.

use std::sync::Arc;

use anyhow::Result;
use draftkeep_core::{FileStore, Version};
use draftkeep_session::{
    PendingRevert, RemoteDocuments, SaveController, SessionEvent, sleep_until_deadline,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;

use crate::text_editor::TextEditor;

pub type Controller = SaveController<FileStore, Arc<dyn RemoteDocuments>, TextEditor>;

const HELP: &str = "\
commands:
  <text>            append a paragraph
  :undo             drop the last paragraph
  :save             save now
  :versions         list saved versions
  :preview N        show version N
  :revert N         restore version N (asks for confirmation)
  :create TITLE     create the draft on the server
  :rename TITLE     rename the document
  :autosave on|off  toggle autosave
  :status           show save status
  :show             print the document
  :quit             leave (a last local snapshot is kept)";

/// A parsed input line
#[derive(Debug, PartialEq)]
enum Command<'a> {
    Text(&'a str),
    Undo,
    Save,
    Versions,
    Preview(usize),
    Revert(usize),
    Create(&'a str),
    Rename(&'a str),
    Autosave(bool),
    Status,
    Show,
    Help,
    Quit,
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let Some(rest) = line.strip_prefix(':') else {
            return Self::Text(line);
        };
        let (name, arg) = match rest.split_once(' ') {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        match (name, arg) {
            ("undo", _) => Self::Undo,
            ("save" | "w", _) => Self::Save,
            ("versions" | "history", _) => Self::Versions,
            ("preview", n) => n.parse().map(Self::Preview).unwrap_or(Self::Unknown(line)),
            ("revert", n) => n.parse().map(Self::Revert).unwrap_or(Self::Unknown(line)),
            ("create", title) if !title.is_empty() => Self::Create(title),
            ("rename", title) if !title.is_empty() => Self::Rename(title),
            ("autosave", "on") => Self::Autosave(true),
            ("autosave", "off") => Self::Autosave(false),
            ("status", _) => Self::Status,
            ("show", _) => Self::Show,
            ("help", _) => Self::Help,
            ("quit" | "q", _) => Self::Quit,
            _ => Self::Unknown(line),
        }
    }
}

pub struct App {
    controller: Controller,
    /// Versions from the last `:versions`, numbered from 1
    versions: Vec<Version>,
    pending_revert: Option<PendingRevert>,
    running: bool,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            versions: Vec::new(),
            pending_revert: None,
            running: true,
        }
    }

    /// Run until `:quit`, end of input or Ctrl-C, then flush a last snapshot
    pub async fn run(&mut self, mut events: UnboundedReceiver<SessionEvent>) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("{}", self.status_line());
        println!("type :help for commands");

        while self.running {
            let deadline = self.controller.autosave_deadline();
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => self.handle_line(&line).await,
                    None => self.running = false,
                },
                _ = sleep_until_deadline(deadline) => {
                    self.controller.fire_due_autosave(Instant::now()).await;
                }
                Some(event) = events.recv() => show_event(&event),
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("interrupted");
                    self.running = false;
                }
            }
        }

        if self.controller.flush_on_exit() {
            println!("kept a local snapshot");
        }
        while let Ok(event) = events.try_recv() {
            show_event(&event);
        }
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) {
        if let Some(pending) = self.pending_revert.take() {
            if matches!(line.trim(), "y" | "yes") {
                if self.controller.confirm_revert(pending).await.is_ok() {
                    println!("reverted");
                }
            } else {
                println!("revert cancelled");
            }
            return;
        }

        match Command::parse(line) {
            Command::Text(text) => self.controller.edit(|editor| editor.push_paragraph(text)),
            Command::Undo => self.controller.edit(|editor| {
                editor.pop_paragraph();
            }),
            Command::Save => {
                // Failures are reported through events or the status line
                let _ = self.controller.manual_save().await;
                println!("{}", self.status_line());
            }
            Command::Versions => self.list_versions().await,
            Command::Preview(n) => match self.version(n) {
                Some(version) => {
                    let preview = self.controller.preview(version);
                    println!("--- {} ---", version.label());
                    println!("{}", preview.plain_text());
                    println!("---");
                }
                None => println!("no version {n}; run :versions first"),
            },
            Command::Revert(n) => match self.version(n) {
                Some(version) => match self.controller.request_revert(version) {
                    Ok(pending) => {
                        println!("revert to {}? unsaved work is replaced [y/N]", pending.label());
                        self.pending_revert = Some(pending);
                    }
                    Err(e) => println!("{e}"),
                },
                None => println!("no version {n}; run :versions first"),
            },
            Command::Create(title) => {
                if let Ok(id) = self.controller.create_remote(title).await {
                    println!("created {id}");
                }
            }
            Command::Rename(title) => match self.controller.rename(title).await {
                Ok(()) => println!("renamed"),
                Err(e) => println!("{e}"),
            },
            Command::Autosave(enabled) => {
                self.controller.set_autosave(enabled);
                println!("autosave {}", if enabled { "on" } else { "off" });
            }
            Command::Status => println!("{}", self.status_line()),
            Command::Show => println!("{}", self.controller.editor().plain_text()),
            Command::Help => println!("{HELP}"),
            Command::Quit => self.running = false,
            Command::Unknown(line) => println!("unknown command: {line}"),
        }
    }

    async fn list_versions(&mut self) {
        let Ok(versions) = self.controller.list_versions().await else {
            return;
        };
        if versions.is_empty() {
            println!("no versions yet");
        }
        for (i, version) in versions.iter().enumerate() {
            println!("{:>3}  {}", i + 1, version.label());
        }
        self.versions = versions;
    }

    fn version(&self, n: usize) -> Option<&Version> {
        n.checked_sub(1).and_then(|i| self.versions.get(i))
    }

    fn status_line(&self) -> String {
        let document = match self.controller.identity().document_id() {
            Some(id) => id.to_string(),
            None => "draft".to_string(),
        };
        let autosave = if self.controller.autosave_enabled() { "on" } else { "off" };
        format!(
            "[{document}] {} | autosave {autosave}",
            self.controller.status()
        )
    }
}

fn show_event(event: &SessionEvent) {
    match event {
        SessionEvent::SavedPulse => println!("✓ saved"),
        SessionEvent::Created(id) => println!("document id {id}"),
        SessionEvent::Reverted(history_id) => println!("restored version {history_id}"),
        SessionEvent::Error(message) => eprintln!("! {message}"),
    }
}
