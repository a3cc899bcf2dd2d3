mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use uuid::Uuid;

use crate::models::*;

/// Handle to the category database.
///
/// Cloning is cheap and shares the underlying connection. Every logical
/// operation runs through [`Database::read`] or [`Database::write`], which
/// hold the connection lock and a single SQLite transaction for the whole
/// closure, so no caller ever observes a half-applied mutation.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        schema::run_migrations(&conn)
    }

    /// Run `f` inside a read transaction.
    pub fn read<T, E>(&self, f: impl FnOnce(&Store<'_>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<anyhow::Error>,
    {
        self.run(TransactionBehavior::Deferred, f)
    }

    /// Run `f` inside a write transaction.
    ///
    /// The transaction commits only when `f` returns `Ok`; any error rolls
    /// back every write `f` made.
    pub fn write<T, E>(&self, f: impl FnOnce(&Store<'_>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<anyhow::Error>,
    {
        self.run(TransactionBehavior::Immediate, f)
    }

    fn run<T, E>(
        &self,
        behavior: TransactionBehavior,
        f: impl FnOnce(&Store<'_>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<anyhow::Error>,
    {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(behavior)
            .context("Failed to begin transaction")?;

        let value = f(&Store { conn: &tx })?;

        tx.commit().context("Failed to commit transaction")?;
        Ok(value)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database lock poisoned"))
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

/// Location of the database when no path is configured.
pub fn default_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "category-tree")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join("category-tree.db"))
}

/// Owner-scoped category queries bound to one open transaction.
pub struct Store<'a> {
    conn: &'a Connection,
}

const CATEGORY_COLUMNS: &str = "id, owner_id, name, parent_id, position, created_at";

impl Store<'_> {
    pub fn find_by_name(&self, owner_id: OwnerId, name: &str) -> Result<Option<Category>> {
        let category = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM categories WHERE owner_id = ? AND name = ?",
                    CATEGORY_COLUMNS
                ),
                (owner_id, name),
                map_category,
            )
            .optional()?;
        Ok(category)
    }

    pub fn exists(&self, owner_id: OwnerId, name: &str) -> Result<bool> {
        let found: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE owner_id = ? AND name = ?)",
            (owner_id, name),
            |row| row.get(0),
        )?;
        Ok(found)
    }

    /// Parentless categories in insertion order.
    pub fn find_roots(&self, owner_id: OwnerId) -> Result<Vec<Category>> {
        self.query_categories(
            &format!(
                "SELECT {} FROM categories WHERE owner_id = ? AND parent_id IS NULL ORDER BY position",
                CATEGORY_COLUMNS
            ),
            [owner_id],
        )
    }

    /// Every category of an owner, in insertion order.
    pub fn find_all(&self, owner_id: OwnerId) -> Result<Vec<Category>> {
        self.query_categories(
            &format!(
                "SELECT {} FROM categories WHERE owner_id = ? ORDER BY position",
                CATEGORY_COLUMNS
            ),
            [owner_id],
        )
    }

    pub fn count(&self, owner_id: OwnerId) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE owner_id = ?",
            [owner_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    pub fn create(
        &self,
        owner_id: OwnerId,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> Result<Category> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let position = self.next_position(owner_id)?;

        self.conn
            .execute(
                "INSERT INTO categories (id, owner_id, name, parent_id, position, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                (
                    id.to_string(),
                    owner_id,
                    name,
                    parent_id.map(|u| u.to_string()),
                    position,
                    now.to_rfc3339(),
                ),
            )
            .with_context(|| format!("Failed to insert category {:?}", name))?;

        Ok(Category {
            id,
            owner_id,
            name: name.to_string(),
            parent_id,
            position,
            created_at: now,
        })
    }

    /// Make `child` the last child of `parent_id`.
    ///
    /// Both directions of the edge change in this one update, since children
    /// are read back through `parent_id`.
    pub fn attach(&self, child: &mut Category, parent_id: Uuid) -> Result<()> {
        let position = self.next_position(child.owner_id)?;
        self.conn.execute(
            "UPDATE categories SET parent_id = ?, position = ? WHERE id = ?",
            (parent_id.to_string(), position, child.id.to_string()),
        )?;
        child.parent_id = Some(parent_id);
        child.position = position;
        Ok(())
    }

    /// Delete a category. Its whole subtree goes with it in the same statement.
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    /// Whether `ancestor_id` lies on the parent chain above `node_id`.
    pub fn is_ancestor(&self, ancestor_id: Uuid, node_id: Uuid) -> Result<bool> {
        let found: bool = self.conn.query_row(
            "WITH RECURSIVE chain(id) AS (
                 SELECT parent_id FROM categories WHERE id = ?1
                 UNION
                 SELECT c.parent_id FROM categories c JOIN chain ON c.id = chain.id
             )
             SELECT EXISTS(SELECT 1 FROM chain WHERE id = ?2)",
            (node_id.to_string(), ancestor_id.to_string()),
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn next_position(&self, owner_id: OwnerId) -> Result<i64> {
        let position: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(position), 0) + 1 FROM categories WHERE owner_id = ?",
            [owner_id],
            |row| row.get(0),
        )?;
        Ok(position)
    }

    fn query_categories(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(sql)?;
        let categories = stmt
            .query_map(params, map_category)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }
}

fn map_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: parse_uuid(row.get::<_, String>(0)?),
        owner_id: row.get(1)?,
        name: row.get(2)?,
        parent_id: row.get::<_, Option<String>>(3)?.map(parse_uuid),
        position: row.get(4)?,
        created_at: parse_datetime(row.get::<_, String>(5)?),
    })
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
