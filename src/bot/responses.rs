//! Fixed reply texts.

use crate::models::{ROOT_SENTINEL, TABLE_HEADER, TABLE_SHEET_NAME};

pub const START_MESSAGE: &str = "Welcome to Category Bot!
This bot lets you build, view and prune a tree of categories.
Send /help to see the available commands.";

pub const HELP_MESSAGE: &str = "Commands:

1) /viewTree - show the current category tree.

2) /addElement <name> - add a root category.

3) /addElement <parent> <child> - add a child under an existing parent. Names may contain spaces; the shortest leading words that name an existing category are taken as the parent.

4) /removeElement <name> - remove a category and everything beneath it.

5) /help - show this list.

6) /download - download the category tree as a table.

7) /upload - upload a category table and add every row to the tree.";

pub const UNKNOWN_COMMAND: &str =
    "Unknown command. Send /help to see the available commands.";

pub const ADD_USAGE: &str =
    "Invalid format. Use /addElement <parent> <child> or /addElement <root>.";

pub const REMOVE_USAGE: &str = "Invalid command format. Use /removeElement <element>.";

pub const UNEXPECTED_DOCUMENT: &str =
    "Incorrect command. You can find the list of commands using the /help command";

pub const WRONG_FILE_FORMAT: &str =
    "Error: Please upload a file in Excel format (.xls or .xlsx).";

pub const COMMAND_FAILED: &str = "Error executing command. Try again.";

pub const EXPORT_FILE_NAME: &str = "AllCategoriesTree.xlsx";

pub const EXPORT_CAPTION: &str = "Categories Tree";

/// Instructions sent in reply to `/upload`.
pub fn upload_instructions() -> String {
    format!(
        "Make sure every category appears only once in the \"{category}\" column. \
         The sheet must be named \"{sheet}\" and have the columns \"{category}\" and \"{parent}\".\n\n\
         \"{sentinel}\" means the category has no parent.\n\n\
         Please send your file.",
        category = TABLE_HEADER[0],
        parent = TABLE_HEADER[1],
        sheet = TABLE_SHEET_NAME,
        sentinel = ROOT_SENTINEL,
    )
}
