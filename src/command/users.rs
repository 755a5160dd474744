//! `Users` library backed by an in-memory sample store.

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;

use crate::internal::shell::{Args, CommandSignature, LibraryBuilder, Param, ParamKind};
use crate::utils::formatting::indent;

pub const LIBRARY: &str = "Users";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    pub fn new(id: u32, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// Shared list of users mutated by `Users.Create`.
#[derive(Debug, Default)]
pub struct UserStore {
    users: Mutex<Vec<User>>,
}

impl UserStore {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }

    /// Store seeded with the four initial sample users.
    pub fn sample() -> Self {
        Self::new(vec![
            User::new(1, "John", "Lennon"),
            User::new(2, "Paul", "McCartney"),
            User::new(3, "George", "Harrison"),
            User::new(4, "Ringo", "Starr"),
        ])
    }

    /// Append a user with the next free id.
    pub fn create(&self, first_name: &str, last_name: &str) -> anyhow::Result<User> {
        let mut users = self.lock()?;
        let id = users.iter().map(|u| u.id).max().map_or(1, |max| max + 1);
        let user = User::new(id, first_name, last_name);
        users.push(user.clone());
        tracing::debug!(id, "created user");
        Ok(user)
    }

    pub fn all(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Vec<User>>> {
        self.users
            .lock()
            .map_err(|_| anyhow!("user store is unavailable after a failed update"))
    }
}

pub fn library(store: Arc<UserStore>) -> LibraryBuilder {
    let create_store = Arc::clone(&store);
    LibraryBuilder::new(LIBRARY)
        .command(
            CommandSignature::new("Create")
                .param(Param::required("firstName", ParamKind::String))
                .param(Param::required("lastName", ParamKind::String)),
            move |args: &Args| -> anyhow::Result<String> {
                create_store.create(args.str(0)?, args.str(1)?)?;
                Ok(String::new())
            },
        )
        .command(
            CommandSignature::new("Get"),
            move |_: &Args| -> anyhow::Result<String> {
                let lines: Vec<String> = store
                    .all()?
                    .iter()
                    .map(|user| {
                        format!(
                            "{}Id:{} {} {}",
                            indent(2),
                            user.id,
                            user.first_name,
                            user.last_name
                        )
                    })
                    .collect();
                Ok(lines.join("\n"))
            },
        )
}
