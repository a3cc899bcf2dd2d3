use category_tree::db::Database;
use category_tree::models::*;
use category_tree::tree::CategoryTree;
use speculate2::speculate;

const OWNER: OwnerId = 100;
const OTHER_OWNER: OwnerId = 200;

fn names(nodes: &[CategoryTreeNode]) -> Vec<String> {
    nodes.iter().map(|n| n.category.name.clone()).collect()
}

fn parent_of(tree: &CategoryTree, owner: OwnerId, name: &str) -> Option<String> {
    tree.export(owner)
        .expect("Export failed")
        .into_iter()
        .find(|row| row.category == name)
        .and_then(|row| row.parent_name().map(str::to_string))
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
        let tree = CategoryTree::new(db);
    }

    describe "add_root" {
        it "creates a parentless category" {
            let outcome = tree.add_root(OWNER, "Fruit").expect("Failed to add root");

            assert_eq!(outcome, Outcome::RootAdded { name: "Fruit".to_string() });
            assert!(tree.exists(OWNER, "Fruit").unwrap());
            assert_eq!(names(&tree.forest(OWNER).unwrap()), vec!["Fruit"]);
        }

        it "rejects a duplicate name for the same owner" {
            tree.add_root(OWNER, "Fruit").expect("Failed to add root");

            let err = tree.add_root(OWNER, "Fruit").unwrap_err();
            assert!(matches!(err, TreeError::AlreadyExists { ref name } if name == "Fruit"));
        }

        it "treats names case-sensitively" {
            tree.add_root(OWNER, "Fruit").unwrap();
            tree.add_root(OWNER, "fruit").expect("Different case is a different name");
        }

        it "allows the same name for different owners" {
            tree.add_root(OWNER, "Fruit").unwrap();
            tree.add_root(OTHER_OWNER, "Fruit").expect("Owners are independent");
        }

        it "rejects an empty name" {
            assert!(matches!(tree.add_root(OWNER, "  ").unwrap_err(), TreeError::EmptyName));
        }

        it "rejects the table root marker as a name" {
            let err = tree.add_root(OWNER, "-").unwrap_err();

            assert!(matches!(err, TreeError::ReservedName { ref name } if name == "-"));
            assert!(!tree.exists(OWNER, "-").unwrap());
        }
    }

    describe "add_child" {
        it "adds a new child under the parent" {
            tree.add_root(OWNER, "Fruit").unwrap();

            let outcome = tree.add_child(OWNER, &["Fruit", "Apple"]).expect("Failed to add child");

            assert_eq!(outcome, Outcome::ChildAdded {
                parent: "Fruit".to_string(),
                child: "Apple".to_string(),
            });
            assert_eq!(parent_of(&tree, OWNER, "Apple"), Some("Fruit".to_string()));
        }

        it "joins the remaining tokens into a multi-word child" {
            tree.add_root(OWNER, "Fruit").unwrap();

            tree.add_child(OWNER, &["Fruit", "Green", "Apple"]).unwrap();

            assert!(tree.exists(OWNER, "Green Apple").unwrap());
        }

        it "resolves a multi-word parent" {
            tree.add_root(OWNER, "Stone Fruit").unwrap();

            let outcome = tree.add_child_text(OWNER, "Stone Fruit Peach").unwrap();

            assert_eq!(outcome, Outcome::ChildAdded {
                parent: "Stone Fruit".to_string(),
                child: "Peach".to_string(),
            });
        }

        it "prefers the shortest matching parent prefix" {
            tree.add_root(OWNER, "Fruit").unwrap();
            tree.add_root(OWNER, "Fruit Tree").unwrap();

            let outcome = tree.add_child(OWNER, &["Fruit", "Tree", "Red"]).unwrap();

            assert_eq!(outcome, Outcome::ChildAdded {
                parent: "Fruit".to_string(),
                child: "Tree Red".to_string(),
            });
            assert!(!tree.exists(OWNER, "Red").unwrap());
        }

        it "fails when no prefix names an existing category" {
            tree.add_root(OWNER, "Fruit").unwrap();

            let err = tree.add_child(OWNER, &["Vegetable", "Carrot"]).unwrap_err();
            assert!(matches!(err, TreeError::ParentNotFound));
        }

        it "never uses every token as the parent" {
            tree.add_root(OWNER, "X").unwrap();

            let err = tree.add_child(OWNER, &["X"]).unwrap_err();
            assert!(matches!(err, TreeError::ParentNotFound));
        }

        it "rejects a category as its own parent" {
            tree.add_root(OWNER, "X").unwrap();

            let err = tree.add_child(OWNER, &["X", "X"]).unwrap_err();
            assert!(matches!(err, TreeError::SelfParent { ref name } if name == "X"));
        }

        it "rejects the table root marker as a child name" {
            tree.add_root(OWNER, "Fruit").unwrap();

            let err = tree.add_child_text(OWNER, "Fruit -").unwrap_err();

            assert!(matches!(err, TreeError::ReservedName { .. }));
            assert!(tree.forest(OWNER).unwrap()[0].children.is_empty());
        }

        it "moves an existing category under the new parent" {
            tree.add_root(OWNER, "Fruit").unwrap();
            tree.add_root(OWNER, "Trees").unwrap();
            tree.add_child_text(OWNER, "Fruit Apple").unwrap();

            tree.add_child_text(OWNER, "Trees Apple").expect("Failed to move child");

            assert_eq!(parent_of(&tree, OWNER, "Apple"), Some("Trees".to_string()));
            let forest = tree.forest(OWNER).unwrap();
            assert!(forest[0].children.is_empty());
            assert_eq!(names(&forest[1].children), vec!["Apple"]);
        }

        it "adopts an existing root as a child" {
            tree.add_root(OWNER, "Fruit").unwrap();
            tree.add_root(OWNER, "Apple").unwrap();

            tree.add_child_text(OWNER, "Fruit Apple").unwrap();

            assert_eq!(names(&tree.forest(OWNER).unwrap()), vec!["Fruit"]);
        }

        it "rejects re-adding a child to its current parent" {
            tree.add_root(OWNER, "Fruit").unwrap();
            tree.add_child_text(OWNER, "Fruit Apple").unwrap();

            let err = tree.add_child_text(OWNER, "Fruit Apple").unwrap_err();
            assert!(matches!(err, TreeError::AlreadyChild { .. }));
        }

        it "rejects moving a category under its own descendant" {
            tree.add_root(OWNER, "A").unwrap();
            tree.add_child_text(OWNER, "A B").unwrap();
            tree.add_child_text(OWNER, "B C").unwrap();

            let err = tree.add_child_text(OWNER, "C A").unwrap_err();
            assert!(matches!(err, TreeError::WouldCreateCycle { .. }));
            assert_eq!(names(&tree.forest(OWNER).unwrap()), vec!["A"]);
        }

        it "appends new children after existing siblings" {
            tree.add_root(OWNER, "Fruit").unwrap();
            tree.add_child_text(OWNER, "Fruit Pear").unwrap();
            tree.add_child_text(OWNER, "Fruit Apple").unwrap();

            let forest = tree.forest(OWNER).unwrap();
            assert_eq!(names(&forest[0].children), vec!["Pear", "Apple"]);
        }

        it "does not see parents owned by another chat" {
            tree.add_root(OTHER_OWNER, "Fruit").unwrap();

            let err = tree.add_child_text(OWNER, "Fruit Apple").unwrap_err();
            assert!(matches!(err, TreeError::ParentNotFound));
        }
    }

    describe "remove" {
        it "removes the category and its whole subtree" {
            tree.add_root(OWNER, "Fruit").unwrap();
            tree.add_child_text(OWNER, "Fruit Apple").unwrap();
            tree.add_child_text(OWNER, "Apple Gala").unwrap();
            tree.add_root(OWNER, "Vegetables").unwrap();

            let outcome = tree.remove(OWNER, "Fruit").expect("Failed to remove");

            assert_eq!(outcome, Outcome::Removed { name: "Fruit".to_string() });
            assert!(!tree.exists(OWNER, "Apple").unwrap());
            assert!(!tree.exists(OWNER, "Gala").unwrap());
            assert_eq!(names(&tree.forest(OWNER).unwrap()), vec!["Vegetables"]);
        }

        it "detaches a removed child from its parent" {
            tree.add_root(OWNER, "Fruit").unwrap();
            tree.add_child_text(OWNER, "Fruit Apple").unwrap();
            tree.add_child_text(OWNER, "Fruit Pear").unwrap();

            tree.remove(OWNER, "Apple").unwrap();

            let forest = tree.forest(OWNER).unwrap();
            assert_eq!(names(&forest[0].children), vec!["Pear"]);
        }

        it "reports NotFound the second time" {
            tree.add_root(OWNER, "Fruit").unwrap();

            tree.remove(OWNER, "Fruit").expect("First removal succeeds");
            let err = tree.remove(OWNER, "Fruit").unwrap_err();
            assert!(matches!(err, TreeError::NotFound { ref name } if name == "Fruit"));
        }

        it "leaves other owners untouched" {
            tree.add_root(OWNER, "Fruit").unwrap();
            tree.add_root(OTHER_OWNER, "Fruit").unwrap();

            tree.remove(OWNER, "Fruit").unwrap();

            assert!(tree.exists(OTHER_OWNER, "Fruit").unwrap());
        }
    }

    describe "render" {
        it "returns the empty-forest message for an owner with no categories" {
            assert_eq!(tree.render(OWNER).unwrap(), "There are no categories");
        }

        it "indents children four spaces per level in insertion order" {
            tree.add_root(OWNER, "Fruit").unwrap();
            tree.add_child_text(OWNER, "Fruit Pear").unwrap();
            tree.add_child_text(OWNER, "Pear Conference").unwrap();
            tree.add_child_text(OWNER, "Fruit Apple").unwrap();
            tree.add_root(OWNER, "Bread").unwrap();

            let expected = "-   Fruit\n    -   Pear\n        -   Conference\n    -   Apple\n-   Bread\n";
            assert_eq!(tree.render(OWNER).unwrap(), expected);
        }
    }
}
