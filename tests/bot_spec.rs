//! Chat command layer tests.

use category_tree::bot::{responses, CommandRouter, Reply};
use category_tree::db::Database;
use category_tree::models::*;
use category_tree::tree::CategoryTree;

const OWNER: OwnerId = 42;

fn setup() -> CommandRouter {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    CommandRouter::new(CategoryTree::new(db))
}

fn say(router: &CommandRouter, text: &str) -> String {
    router.handle_text(OWNER, text).as_text().to_string()
}

mod add_element {
    use super::*;

    #[test]
    fn single_word_adds_a_root() {
        let router = setup();

        let reply = say(&router, "/addElement Fruit");

        assert_eq!(reply, "Successfully added root category with name: Fruit");
        assert!(router.tree().exists(OWNER, "Fruit").unwrap());
    }

    #[test]
    fn several_words_add_a_child() {
        let router = setup();
        say(&router, "/addElement Fruit");

        let reply = say(&router, "/addElement Fruit Green Apple");

        assert_eq!(reply, "Successfully added child: Green Apple to parent: Fruit");
    }

    #[test]
    fn extra_spaces_between_words_are_ignored() {
        let router = setup();
        say(&router, "/addElement Fruit");

        say(&router, "/addElement  Fruit   Green  Apple");

        assert!(router.tree().exists(OWNER, "Green Apple").unwrap());
    }

    #[test]
    fn duplicate_root_is_reported() {
        let router = setup();
        say(&router, "/addElement Fruit");

        let reply = say(&router, "/addElement Fruit");

        assert!(reply.starts_with("Category with name Fruit already exists"));
    }

    #[test]
    fn unknown_parent_is_reported() {
        let router = setup();

        assert_eq!(
            say(&router, "/addElement Fruit Apple"),
            "Parent category does not exist."
        );
    }

    #[test]
    fn missing_arguments_show_usage() {
        let router = setup();

        assert_eq!(say(&router, "/addElement"), responses::ADD_USAGE);
    }
}

mod remove_element {
    use super::*;

    #[test]
    fn removes_multi_word_names() {
        let router = setup();
        router.tree().add_root(OWNER, "Stone Fruit").unwrap();

        let reply = say(&router, "/removeElement Stone Fruit");

        assert_eq!(reply, "Successfully removed category with name: Stone Fruit");
        assert!(!router.tree().exists(OWNER, "Stone Fruit").unwrap());
    }

    #[test]
    fn missing_category_is_reported() {
        let router = setup();

        let reply = say(&router, "/removeElement Ghost");

        assert!(reply.starts_with("Category with name Ghost does not exist"));
    }

    #[test]
    fn missing_arguments_show_usage() {
        let router = setup();

        assert_eq!(say(&router, "/removeElement"), responses::REMOVE_USAGE);
    }
}

mod view_and_download {
    use super::*;

    #[test]
    fn view_tree_renders_the_outline() {
        let router = setup();
        assert_eq!(say(&router, "/viewTree"), "There are no categories");

        say(&router, "/addElement Fruit");
        say(&router, "/addElement Fruit Apple");

        assert_eq!(say(&router, "/viewTree"), "-   Fruit\n    -   Apple\n");
    }

    #[test]
    fn download_returns_a_document_with_rows() {
        let router = setup();
        say(&router, "/addElement Fruit");
        say(&router, "/addElement Fruit Apple");

        let reply = router.handle_text(OWNER, "/download");

        assert_eq!(
            reply,
            Reply::Document {
                file_name: "AllCategoriesTree.xlsx".to_string(),
                caption: "Categories Tree".to_string(),
                rows: vec![TableRow::root("Fruit"), TableRow::child("Apple", "Fruit")],
            }
        );
    }
}

mod upload {
    use super::*;

    #[test]
    fn upload_command_marks_the_owner_as_waiting() {
        let router = setup();

        let reply = say(&router, "/upload");

        assert!(reply.contains("Please send your file."));
        assert!(router.uploads().is_pending(OWNER));
    }

    #[test]
    fn document_after_upload_is_imported() {
        let router = setup();
        say(&router, "/upload");

        let reply = router.handle_document(
            OWNER,
            Some("tree.xlsx"),
            vec![TableRow::child("Sneakers", "Shoes"), TableRow::root("Hats")],
        );

        assert_eq!(reply, Reply::text("Successfully added 2 categories."));
        assert!(!router.uploads().is_pending(OWNER));
        assert!(router.tree().exists(OWNER, "Shoes").unwrap());
    }

    #[test]
    fn document_without_upload_is_rejected() {
        let router = setup();

        let reply = router.handle_document(OWNER, None, vec![TableRow::root("Hats")]);

        assert_eq!(reply, Reply::text(responses::UNEXPECTED_DOCUMENT));
        assert!(!router.tree().exists(OWNER, "Hats").unwrap());
    }

    #[test]
    fn non_spreadsheet_file_is_rejected_and_clears_the_wait() {
        let router = setup();
        say(&router, "/upload");

        let reply = router.handle_document(OWNER, Some("tree.csv"), vec![TableRow::root("Hats")]);

        assert_eq!(reply, Reply::text(responses::WRONG_FILE_FORMAT));
        assert!(!router.uploads().is_pending(OWNER));
    }

    #[test]
    fn malformed_table_is_reported() {
        let router = setup();
        say(&router, "/upload");

        let reply = router.handle_document(OWNER, None, vec![TableRow::child("Hats", "")]);

        assert!(reply.as_text().starts_with("Malformed category table"));
    }

    #[test]
    fn waiting_is_per_owner() {
        let router = setup();
        say(&router, "/upload");

        let reply = router.handle_document(OWNER + 1, None, vec![TableRow::root("Hats")]);

        assert_eq!(reply, Reply::text(responses::UNEXPECTED_DOCUMENT));
        assert!(router.uploads().is_pending(OWNER));
    }
}

mod fixed_replies {
    use super::*;

    #[test]
    fn help_and_start() {
        let router = setup();

        assert_eq!(say(&router, "/help"), responses::HELP_MESSAGE);
        assert_eq!(say(&router, "/start"), responses::START_MESSAGE);
    }

    #[test]
    fn unknown_text_gets_the_unknown_command_reply() {
        let router = setup();

        assert_eq!(say(&router, "hello"), responses::UNKNOWN_COMMAND);
        assert_eq!(say(&router, "/addElements Fruit"), responses::UNKNOWN_COMMAND);
    }
}
