//! Chat command layer.
//!
//! Maps inbound chat text to tree operations through a static keyword table
//! and tracks which owners are expected to send an upload next. The chat
//! transport itself lives outside this crate: it hands text and decoded
//! documents to a [`CommandRouter`] and delivers the returned [`Reply`].

pub mod responses;
mod session;

use serde::{Deserialize, Serialize};

use crate::models::*;
use crate::tree::CategoryTree;

pub use session::UploadSessions;

/// What the transport should send back to the chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    Text {
        text: String,
    },
    /// A table to encode and send as a file.
    Document {
        file_name: String,
        caption: String,
        rows: Vec<TableRow>,
    },
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The reply text, or the caption for a document.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
            Self::Document { caption, .. } => caption,
        }
    }
}

/// Handlers reachable from the keyword table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AddElement,
    ViewTree,
    RemoveElement,
    Download,
    Upload,
    Help,
    Start,
}

const COMMANDS: &[(&str, Command)] = &[
    ("/addElement", Command::AddElement),
    ("/viewTree", Command::ViewTree),
    ("/removeElement", Command::RemoveElement),
    ("/download", Command::Download),
    ("/upload", Command::Upload),
    ("/help", Command::Help),
    ("/start", Command::Start),
];

impl Command {
    /// Find the command whose keyword starts `text`, returning it with the
    /// remaining argument text.
    pub fn parse(text: &str) -> Option<(Command, &str)> {
        let text = text.trim_start();
        COMMANDS.iter().find_map(|&(keyword, command)| {
            let rest = text.strip_prefix(keyword)?;
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                Some((command, rest))
            } else {
                None
            }
        })
    }

    pub fn keyword(self) -> &'static str {
        COMMANDS
            .iter()
            .find(|(_, command)| *command == self)
            .map(|(keyword, _)| *keyword)
            .unwrap_or_default()
    }

    fn execute(
        self,
        router: &CommandRouter,
        args: &str,
        owner_id: OwnerId,
    ) -> Result<Reply, TreeError> {
        let tree = &router.tree;
        let tokens: Vec<&str> = args.split_whitespace().collect();

        let reply = match self {
            Self::AddElement => match tokens.as_slice() {
                [] => Reply::text(responses::ADD_USAGE),
                [root] => Reply::text(tree.add_root(owner_id, root)?.to_string()),
                _ => Reply::text(tree.add_child(owner_id, &tokens)?.to_string()),
            },
            Self::RemoveElement => {
                if tokens.is_empty() {
                    Reply::text(responses::REMOVE_USAGE)
                } else {
                    Reply::text(tree.remove(owner_id, &tokens.join(" "))?.to_string())
                }
            }
            Self::ViewTree => Reply::text(tree.render(owner_id)?),
            Self::Download => Reply::Document {
                file_name: responses::EXPORT_FILE_NAME.to_string(),
                caption: responses::EXPORT_CAPTION.to_string(),
                rows: tree.export(owner_id)?,
            },
            Self::Upload => {
                router.uploads.begin(owner_id);
                Reply::text(responses::upload_instructions())
            }
            Self::Help => Reply::text(responses::HELP_MESSAGE),
            Self::Start => Reply::text(responses::START_MESSAGE),
        };
        Ok(reply)
    }
}

/// Entry point for the chat transport.
#[derive(Clone)]
pub struct CommandRouter {
    tree: CategoryTree,
    uploads: UploadSessions,
}

impl CommandRouter {
    pub fn new(tree: CategoryTree) -> Self {
        Self {
            tree,
            uploads: UploadSessions::new(),
        }
    }

    pub fn tree(&self) -> &CategoryTree {
        &self.tree
    }

    pub fn uploads(&self) -> &UploadSessions {
        &self.uploads
    }

    /// Handle one text message.
    pub fn handle_text(&self, owner_id: OwnerId, text: &str) -> Reply {
        let Some((command, args)) = Command::parse(text) else {
            tracing::debug!("Unknown command from owner {}: {:?}", owner_id, text);
            return Reply::text(responses::UNKNOWN_COMMAND);
        };

        tracing::info!(
            "Executing {} for owner {}",
            command.keyword(),
            owner_id
        );
        command
            .execute(self, args, owner_id)
            .unwrap_or_else(|e| error_reply(owner_id, e))
    }

    /// Handle an uploaded table.
    ///
    /// Only accepted right after `/upload`; the pending flag is cleared
    /// whether or not the import succeeds. `file_name` is checked for a
    /// spreadsheet extension when the transport knows it.
    pub fn handle_document(
        &self,
        owner_id: OwnerId,
        file_name: Option<&str>,
        rows: Vec<TableRow>,
    ) -> Reply {
        if !self.uploads.take(owner_id) {
            tracing::warn!("Document from owner {} without a pending upload", owner_id);
            return Reply::text(responses::UNEXPECTED_DOCUMENT);
        }

        if let Some(name) = file_name {
            if !is_spreadsheet_name(name) {
                tracing::warn!("Rejected upload {:?} from owner {}", name, owner_id);
                return Reply::text(responses::WRONG_FILE_FORMAT);
            }
        }

        match self.tree.import(owner_id, rows) {
            Ok(outcome) => Reply::text(outcome.to_string()),
            Err(e) => error_reply(owner_id, e),
        }
    }
}

fn is_spreadsheet_name(name: &str) -> bool {
    name.ends_with(".xls") || name.ends_with(".xlsx")
}

fn error_reply(owner_id: OwnerId, error: TreeError) -> Reply {
    if error.is_fatal() {
        tracing::error!("Command failed for owner {}: {:#}", owner_id, error);
        Reply::text(responses::COMMAND_FAILED)
    } else {
        Reply::text(error.to_string())
    }
}
