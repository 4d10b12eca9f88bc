use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::repository::Category;
use crate::store::{RepositoryStore, StoreError, StoredRepository};

/// Schema migrations applied on top of the base schema
/// Each version contains a list of SQL statements to execute
const MIGRATIONS: &[&[&str]] = &[];

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(db_path: &Path) -> Result<Self, StoreError> {
        info!("Initializing repository database at {:?}", db_path);

        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    /// Store that lives only as long as the process
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        // Enable WAL mode for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        debug!("Database connection established");

        let store = Self {
            conn: Mutex::new(conn),
        };

        store.create_schema()?;
        info!("Repository store initialized successfully");

        Ok(store)
    }

    /// Acquire database connection lock with proper error handling
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn create_schema(&self) -> Result<(), StoreError> {
        debug!("Creating database schema");

        let conn = self.lock_conn()?;

        // Create base tables
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS repositories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                full_name_lower TEXT NOT NULL UNIQUE,
                full_name TEXT NOT NULL,
                category TEXT NOT NULL,
                version_local TEXT,
                pending_restart INTEGER NOT NULL DEFAULT 0,
                first_install INTEGER NOT NULL DEFAULT 1,
                updated_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        // Apply migrations
        Self::apply_migrations(&conn)?;

        debug!("Database schema created successfully");
        Ok(())
    }

    /// Apply pending migrations based on user_version pragma
    fn apply_migrations(conn: &Connection) -> Result<(), StoreError> {
        let current_version: i32 =
            conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        for (i, statements) in MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i32;
            if version > current_version {
                for sql in *statements {
                    conn.execute(sql, [])?;
                }
                debug!("Applied migration v{}", version);
            }
        }

        let target_version = MIGRATIONS.len() as i32;
        if target_version > current_version {
            conn.pragma_update(None, "user_version", target_version)?;
            debug!("Updated schema version to v{}", target_version);
        }

        Ok(())
    }

    fn read_row(row: &Row<'_>) -> rusqlite::Result<StoredRow> {
        Ok(StoredRow {
            full_name: row.get(0)?,
            category: row.get(1)?,
            version_local: row.get(2)?,
            pending_restart: row.get(3)?,
            first_install: row.get(4)?,
        })
    }
}

/// Row as read from the database, before the category is checked
struct StoredRow {
    full_name: String,
    category: String,
    version_local: Option<String>,
    pending_restart: bool,
    first_install: bool,
}

impl TryFrom<StoredRow> for StoredRepository {
    type Error = StoreError;

    fn try_from(row: StoredRow) -> Result<Self, Self::Error> {
        let category = Category::from_str(&row.category)
            .map_err(|_| StoreError::UnknownCategory(row.category, row.full_name.clone()))?;
        Ok(Self {
            full_name: row.full_name,
            category,
            version_local: row.version_local,
            pending_restart: row.pending_restart,
            first_install: row.first_install,
        })
    }
}

impl RepositoryStore for SqliteStore {
    fn list_repositories(&self) -> Result<Vec<StoredRepository>, StoreError> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT full_name, category, version_local, pending_restart, first_install
            FROM repositories
            ORDER BY id
            "#,
        )?;

        let rows = stmt
            .query_map([], Self::read_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(StoredRepository::try_from).collect()
    }

    fn get_repository(&self, full_name: &str) -> Result<Option<StoredRepository>, StoreError> {
        let conn = self.lock_conn()?;
        let row = conn
            .query_row(
                r#"
                SELECT full_name, category, version_local, pending_restart, first_install
                FROM repositories
                WHERE full_name_lower = ?1
                "#,
                [full_name.to_lowercase()],
                Self::read_row,
            )
            .optional()?;

        row.map(StoredRepository::try_from).transpose()
    }

    fn save_repository(&self, repository: &StoredRepository) -> Result<(), StoreError> {
        let conn = self.lock_conn()?;
        let now = chrono::Utc::now().timestamp_millis();

        conn.execute(
            r#"
            INSERT INTO repositories
                (full_name_lower, full_name, category, version_local, pending_restart, first_install, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(full_name_lower) DO UPDATE SET
                full_name = excluded.full_name,
                category = excluded.category,
                version_local = excluded.version_local,
                pending_restart = excluded.pending_restart,
                first_install = excluded.first_install,
                updated_at = excluded.updated_at
            "#,
            (
                repository.full_name.to_lowercase(),
                &repository.full_name,
                repository.category.as_str(),
                &repository.version_local,
                repository.pending_restart,
                repository.first_install,
                now,
            ),
        )?;

        debug!("Saved repository {}", repository.full_name);
        Ok(())
    }

    fn remove_repository(&self, full_name: &str) -> Result<bool, StoreError> {
        let conn = self.lock_conn()?;
        let removed = conn.execute(
            "DELETE FROM repositories WHERE full_name_lower = ?1",
            [full_name.to_lowercase()],
        )?;

        Ok(removed > 0)
    }
}
