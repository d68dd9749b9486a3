//! User and group name lookup

use std::collections::HashMap;

use nix::unistd::{Gid, Group, Uid, User};

/// Cached uid/gid to name resolution against the system account database.
#[derive(Debug, Default)]
pub struct Accounts {
    users: HashMap<u32, Option<String>>,
    groups: HashMap<u32, Option<String>>,
}

impl Accounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the user with `uid`, or `None` if there is no such user.
    pub fn user_name(&mut self, uid: u32) -> Option<&str> {
        self.users
            .entry(uid)
            .or_insert_with(|| lookup_user(uid))
            .as_deref()
    }

    /// Name of the group with `gid`, or `None` if there is no such group.
    pub fn group_name(&mut self, gid: u32) -> Option<&str> {
        self.groups
            .entry(gid)
            .or_insert_with(|| lookup_group(gid))
            .as_deref()
    }
}

fn lookup_user(uid: u32) -> Option<String> {
    User::from_uid(Uid::from_raw(uid))
        .ok()
        .flatten()
        .map(|user| user.name)
}

fn lookup_group(gid: u32) -> Option<String> {
    Group::from_gid(Gid::from_raw(gid))
        .ok()
        .flatten()
        .map(|group| group.name)
}
