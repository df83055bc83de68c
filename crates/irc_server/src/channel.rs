//! Channel membership, modes and topic. Members, operators and invites
//! are tracked as ordered sets of connection handles so iteration (e.g.
//! a NAMES listing) is always in ascending-handle order, not insertion
//! order.

use std::collections::BTreeSet;

use crate::connection::ConnId;

#[derive(Debug, Default)]
pub struct Channel {
    /// Canonical name, always `#`-prefixed, casing of first JOIN.
    pub name: String,
    pub topic: String,
    pub invite_only: bool,
    pub topic_op_only: bool,
    pub key: Option<String>,
    pub limit: Option<usize>,
    pub members: BTreeSet<ConnId>,
    pub operators: BTreeSet<ConnId>,
    pub invited: BTreeSet<ConnId>,
}

impl Channel {
    pub fn new(name: String) -> Self {
        Channel {
            name,
            ..Default::default()
        }
    }

    pub fn is_member(&self, id: ConnId) -> bool {
        self.members.contains(&id)
    }

    pub fn is_operator(&self, id: ConnId) -> bool {
        self.operators.contains(&id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn add_member(&mut self, id: ConnId) {
        self.members.insert(id);
    }

    /// Removes `id` from members, operators and invites. Idempotent:
    /// calling it on a handle that was never a member is a no-op.
    pub fn remove_member(&mut self, id: ConnId) {
        self.members.remove(&id);
        self.operators.remove(&id);
        self.invited.remove(&id);
    }

    pub fn grant_operator(&mut self, id: ConnId) {
        if self.members.contains(&id) {
            self.operators.insert(id);
        }
    }

    pub fn revoke_operator(&mut self, id: ConnId) {
        self.operators.remove(&id);
    }

    pub fn invite(&mut self, id: ConnId) {
        self.invited.insert(id);
    }

    pub fn is_invited(&self, id: ConnId) -> bool {
        self.invited.contains(&id)
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    pub fn has_limit(&self) -> bool {
        self.limit.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_member_is_idempotent_and_cascades() {
        let mut ch = Channel::new("#chan".into());
        ch.add_member(ConnId(1));
        ch.grant_operator(ConnId(1));
        ch.invite(ConnId(2));

        ch.remove_member(ConnId(1));
        assert!(!ch.is_member(ConnId(1)));
        assert!(!ch.is_operator(ConnId(1)));

        // idempotent: removing again does nothing and doesn't panic
        ch.remove_member(ConnId(1));
        assert_eq!(ch.member_count(), 0);

        assert!(ch.is_invited(ConnId(2)));
    }

    #[test]
    fn members_iterate_in_ascending_connid_order() {
        let mut ch = Channel::new("#chan".into());
        ch.add_member(ConnId(5));
        ch.add_member(ConnId(1));
        ch.add_member(ConnId(3));
        let order: Vec<i32> = ch.members.iter().map(|c| c.raw()).collect();
        assert_eq!(order, vec![1, 3, 5]);
    }
}
