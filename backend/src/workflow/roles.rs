//! Role directory: an in-memory snapshot of the `roles` table keyed by
//! case-folded name. The resolver dispatches on the stored scope tag,
//! never on substrings of the role name, so renaming a role cannot
//! silently change routing behavior.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use log::warn;
use rusqlite::Connection;

use common::model::role::RoleScope;

#[derive(Clone, Debug)]
pub struct RoleEntry {
    pub id: i64,
    pub scope: RoleScope,
}

#[derive(Debug, Default)]
pub struct RoleDirectory {
    by_name: HashMap<String, RoleEntry>,
}

impl RoleDirectory {
    pub fn load(conn: &Connection) -> rusqlite::Result<RoleDirectory> {
        let mut stmt = conn.prepare("SELECT id, name, scope FROM roles")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut by_name = HashMap::new();
        for row in rows {
            let (id, name, scope_str) = row?;
            let scope = RoleScope::parse(&scope_str).unwrap_or_else(|| {
                warn!("role '{name}' has unknown scope '{scope_str}', treating as global");
                RoleScope::Global
            });
            by_name.insert(name.to_lowercase(), RoleEntry { id, scope });
        }
        Ok(RoleDirectory { by_name })
    }

    /// Case-folded lookup, matching how role names are written in flow
    /// definitions.
    pub fn lookup(&self, role_name: &str) -> Option<&RoleEntry> {
        self.by_name.get(&role_name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Shared, refreshable directory snapshot held in app state. Reads are
/// lock-cheap; admin role mutations call `refresh` so the snapshot never
/// goes stale.
pub struct RoleCache {
    inner: RwLock<RoleDirectory>,
}

impl RoleCache {
    pub fn new(directory: RoleDirectory) -> RoleCache {
        RoleCache {
            inner: RwLock::new(directory),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, RoleDirectory> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn refresh(&self, conn: &Connection) -> rusqlite::Result<()> {
        let directory = RoleDirectory::load(conn)?;
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = directory;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn loads_seeded_directory_with_scopes() {
        let conn = db::open_test_db();
        let dir = RoleDirectory::load(&conn).expect("load");
        assert_eq!(dir.len(), 8);
        assert_eq!(dir.lookup("hod").map(|e| e.scope), Some(RoleScope::Department));
        assert_eq!(
            dir.lookup("College Dean").map(|e| e.scope),
            Some(RoleScope::College)
        );
        assert_eq!(dir.lookup("dean sps").map(|e| e.scope), Some(RoleScope::Global));
        assert!(dir.lookup("registrar").is_none());
    }

    #[test]
    fn refresh_picks_up_new_roles() {
        let conn = db::open_test_db();
        let cache = RoleCache::new(RoleDirectory::load(&conn).expect("load"));
        conn.execute(
            "INSERT INTO roles (name, scope) VALUES ('registrar', 'college')",
            [],
        )
        .expect("insert");
        assert!(cache.read().lookup("registrar").is_none());
        cache.refresh(&conn).expect("refresh");
        assert_eq!(
            cache.read().lookup("registrar").map(|e| e.scope),
            Some(RoleScope::College)
        );
    }
}
