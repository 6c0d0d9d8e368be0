//! Namespace service
//!
//! Holds the store root and every user opened so far. The service never
//! tracks where a caller is; each call gets the caller's [`Session`].

use crate::config::NamespaceConfig;
use crate::entries::EntryManager;
use crate::operations::{NamespaceError, NamespaceOperations};
use crate::registry::{User, UserRegistry};
use crate::session::Session;
use block_store::{BlockId, EntryHeader};
use log::{debug, info};
use namespace_view::ListOptions;
use std::collections::HashMap;
use std::fs;

/// Namespace service
///
/// Not synchronised. Share it behind a mutex if several threads need it.
#[derive(Debug)]
pub struct NamespaceService {
    registry: UserRegistry,
    users: HashMap<String, User>,
}

impl NamespaceService {
    /// Creates a service over the configured store root
    pub fn new(config: NamespaceConfig) -> Result<Self, NamespaceError> {
        let root = &config.store_root;
        if !root.is_dir() {
            if !config.create_root {
                return Err(NamespaceError::NotFound(format!(
                    "store root {}",
                    root.display()
                )));
            }
            fs::create_dir_all(root).map_err(|e| {
                NamespaceError::Io(format!("creating store root {}: {}", root.display(), e))
            })?;
            info!("created store root {}", root.display());
        }

        debug!("namespace service over {}", root.display());
        Ok(Self {
            registry: UserRegistry::new(root.clone()),
            users: HashMap::new(),
        })
    }

    pub fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    /// Gets an opened user
    pub fn user(&self, name: &str) -> Option<&User> {
        self.users.get(name)
    }

    fn selected(&self, session: &Session) -> Result<(&User, BlockId), NamespaceError> {
        match session {
            Session::NoUser => Err(NamespaceError::no_user()),
            Session::UserSelected { user, block } => {
                let loaded = self.users.get(user).ok_or_else(|| {
                    NamespaceError::PreconditionFailed(format!("user '{}' is not open", user))
                })?;
                Ok((loaded, *block))
            }
        }
    }

    fn selected_mut(&mut self, session: &Session) -> Result<(&mut User, BlockId), NamespaceError> {
        match session {
            Session::NoUser => Err(NamespaceError::no_user()),
            Session::UserSelected { user, block } => {
                let loaded = self.users.get_mut(user).ok_or_else(|| {
                    NamespaceError::PreconditionFailed(format!("user '{}' is not open", user))
                })?;
                Ok((loaded, *block))
            }
        }
    }
}

impl NamespaceOperations for NamespaceService {
    fn register(&mut self, name: &str) -> Result<Session, NamespaceError> {
        let user = self.registry.register(name)?;
        self.users.insert(name.to_string(), user);
        Ok(Session::at_root(name))
    }

    fn use_user(&mut self, name: &str) -> Result<Session, NamespaceError> {
        if self.users.contains_key(name) {
            if self.registry.exists(name) {
                debug!("reusing loaded user '{}'", name);
                return Ok(Session::at_root(name));
            }
            self.users.remove(name);
            return Err(NamespaceError::NotFound(format!("user '{}'", name)));
        }

        let user = self.registry.open(name)?;
        self.users.insert(name.to_string(), user);
        Ok(Session::at_root(name))
    }

    fn delete_user(&mut self, session: &Session, name: &str) -> Result<Session, NamespaceError> {
        self.registry.delete(name)?;
        self.users.remove(name);

        if session.user() == Some(name) {
            Ok(Session::NoUser)
        } else {
            Ok(session.clone())
        }
    }

    fn change_folder(&self, session: &Session, path: &str) -> Result<Session, NamespaceError> {
        let (user, block) = self.selected(session)?;
        let target = user.resolve(block, path)?;
        Ok(session.moved_to(target.node_id))
    }

    fn list(
        &self,
        session: &Session,
        path: &str,
        options: ListOptions,
    ) -> Result<Vec<String>, NamespaceError> {
        let (user, block) = self.selected(session)?;
        EntryManager::list(user, block, path, options)
    }

    fn create_folder(
        &mut self,
        session: &Session,
        name: &str,
        description: &str,
    ) -> Result<EntryHeader, NamespaceError> {
        let (user, block) = self.selected_mut(session)?;
        EntryManager::create_folder(user, block, name, description)
    }

    fn delete_folder(
        &mut self,
        session: &Session,
        name: &str,
    ) -> Result<EntryHeader, NamespaceError> {
        let (user, block) = self.selected_mut(session)?;
        EntryManager::delete_folder(user, block, name)
    }

    fn rename_folder(
        &mut self,
        session: &Session,
        old_name: &str,
        new_name: &str,
    ) -> Result<EntryHeader, NamespaceError> {
        let (user, block) = self.selected_mut(session)?;
        EntryManager::rename_folder(user, block, old_name, new_name)
    }

    fn create_file(
        &mut self,
        session: &Session,
        name: &str,
        description: &str,
    ) -> Result<EntryHeader, NamespaceError> {
        let (user, block) = self.selected_mut(session)?;
        EntryManager::create_file(user, block, name, description)
    }

    fn delete_file(
        &mut self,
        session: &Session,
        name: &str,
    ) -> Result<EntryHeader, NamespaceError> {
        let (user, block) = self.selected_mut(session)?;
        EntryManager::delete_file(user, block, name)
    }

    fn rename_file(
        &mut self,
        session: &Session,
        old_name: &str,
        new_name: &str,
        description: &str,
    ) -> Result<EntryHeader, NamespaceError> {
        let (user, block) = self.selected_mut(session)?;
        EntryManager::rename_file(user, block, old_name, new_name, description)
    }

    fn update_file(
        &mut self,
        session: &Session,
        name: &str,
        description: &str,
    ) -> Result<EntryHeader, NamespaceError> {
        let (user, block) = self.selected_mut(session)?;
        EntryManager::update_file(user, block, name, description)
    }

    fn file_info(&self, session: &Session, name: &str) -> Result<EntryHeader, NamespaceError> {
        let (user, block) = self.selected(session)?;
        EntryManager::file_info(user, block, name)
    }

    fn current_path(&self, session: &Session) -> Result<String, NamespaceError> {
        let (user, block) = self.selected(session)?;
        user.path_of(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::ErrorKind;
    use tempfile::{tempdir, TempDir};

    fn setup() -> (TempDir, NamespaceService) {
        let dir = tempdir().unwrap();
        let service = NamespaceService::new(NamespaceConfig::new(dir.path())).unwrap();
        (dir, service)
    }

    #[test]
    fn test_new_creates_store_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("fs");

        NamespaceService::new(NamespaceConfig::new(&root)).unwrap();
        assert!(root.is_dir());
    }

    #[test]
    fn test_new_without_create_root() {
        let dir = tempdir().unwrap();
        let config = NamespaceConfig::new(dir.path().join("fs")).with_create_root(false);

        let err = NamespaceService::new(config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_operations_need_a_user() {
        let (_dir, mut service) = setup();
        let session = Session::NoUser;

        let err = service.list(&session, ".", ListOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PreconditionFailed);

        let err = service.create_folder(&session, "docs", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PreconditionFailed);

        let err = service.current_path(&session).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PreconditionFailed);
    }

    #[test]
    fn test_session_for_unopened_user() {
        let (_dir, service) = setup();
        let session = Session::at_root("ghost");

        let err = service.change_folder(&session, ".").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PreconditionFailed);
    }

    #[test]
    fn test_register_selects_root() {
        let (_dir, mut service) = setup();

        let session = service.register("alice").unwrap();
        assert_eq!(session, Session::at_root("alice"));
        assert_eq!(service.current_path(&session).unwrap(), "/");
        assert!(service.user("alice").is_some());
    }

    #[test]
    fn test_change_folder_and_path() {
        let (_dir, mut service) = setup();
        let root = service.register("alice").unwrap();
        service.create_folder(&root, "docs", "").unwrap();

        let docs = service.change_folder(&root, "docs").unwrap();
        service.create_folder(&docs, "notes", "").unwrap();
        let notes = service.change_folder(&docs, "notes").unwrap();
        assert_eq!(service.current_path(&notes).unwrap(), "/docs/notes");

        let back = service.change_folder(&notes, "../..").unwrap();
        assert_eq!(back, root);

        let err = service.change_folder(&docs, "missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_use_user_after_external_delete() {
        let (dir, mut service) = setup();
        service.register("alice").unwrap();
        fs::remove_dir_all(dir.path().join("alice")).unwrap();

        let err = service.use_user("alice").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(service.user("alice").is_none());
    }

    #[test]
    fn test_delete_selected_user() {
        let (_dir, mut service) = setup();
        let session = service.register("alice").unwrap();

        let session = service.delete_user(&session, "alice").unwrap();
        assert_eq!(session, Session::NoUser);
        assert!(!service.registry().exists("alice"));
    }

    #[test]
    fn test_delete_other_user_keeps_session() {
        let (_dir, mut service) = setup();
        service.register("bob").unwrap();
        let session = service.register("alice").unwrap();

        let after = service.delete_user(&session, "bob").unwrap();
        assert_eq!(after, session);

        let err = service.use_user("bob").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
