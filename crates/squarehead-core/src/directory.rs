//! Member directory: the only place member records are written.
//!
//! Every write goes through here so that email uniqueness and the symmetric
//! partner relation hold for everything downstream. The assignment engine
//! reads members as given and never repairs the relation itself.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::DirectoryError;
use crate::models::{normalize_email, Member, MemberId, MemberStatus};

#[derive(Debug, Clone, Default)]
pub struct MemberDirectory {
    members: BTreeMap<MemberId, Member>,
}

impl MemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from stored records, checking every invariant.
    pub fn from_members(members: Vec<Member>) -> Result<Self, DirectoryError> {
        let mut dir = Self::new();
        for member in members {
            member.validate()?;
            if dir.members.contains_key(&member.id) {
                return Err(DirectoryError::DuplicateId(member.id));
            }
            dir.check_email_free(&member.email, None)?;
            dir.members.insert(member.id, member);
        }

        for member in dir.members.values() {
            for referenced in [member.partner_id, member.friend_id].into_iter().flatten() {
                if !dir.members.contains_key(&referenced) {
                    return Err(DirectoryError::UnknownMember(referenced));
                }
            }
            if let Some(partner_id) = member.partner_id {
                let back = dir.members.get(&partner_id).and_then(|p| p.partner_id);
                if back != Some(member.id) {
                    return Err(DirectoryError::AsymmetricPartner {
                        member: member.id,
                        partner: partner_id,
                    });
                }
            }
        }
        Ok(dir)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, id: MemberId) -> Option<&Member> {
        self.members.get(&id)
    }

    pub fn find_by_email(&self, email: &str) -> Option<&Member> {
        let key = normalize_email(email);
        self.members.values().find(|m| m.email_key() == key)
    }

    /// Members in id order.
    pub fn members(&self) -> Vec<Member> {
        self.members.values().cloned().collect()
    }

    /// Members sorted for display ("Last, First").
    pub fn list(&self) -> Vec<&Member> {
        let mut list: Vec<&Member> = self.members.values().collect();
        list.sort_by(|a, b| {
            a.last_name
                .to_lowercase()
                .cmp(&b.last_name.to_lowercase())
                .then_with(|| a.first_name.to_lowercase().cmp(&b.first_name.to_lowercase()))
                .then_with(|| a.id.cmp(&b.id))
        });
        list
    }

    pub fn eligible(&self) -> impl Iterator<Item = &Member> {
        self.members.values().filter(|m| m.is_assignable())
    }

    pub fn next_id(&self) -> MemberId {
        self.members.keys().next_back().map(|id| id + 1).unwrap_or(1)
    }

    pub fn insert(&mut self, member: Member) -> Result<(), DirectoryError> {
        member.validate()?;
        if self.members.contains_key(&member.id) {
            return Err(DirectoryError::DuplicateId(member.id));
        }
        self.check_email_free(&member.email, None)?;
        if let Some(friend_id) = member.friend_id {
            self.require(friend_id)?;
        }
        if let Some(partner_id) = member.partner_id {
            self.check_partner(member.id, partner_id)?;
        }

        let id = member.id;
        let partner_id = member.partner_id;
        debug!(member_id = id, "Adding member");
        self.members.insert(id, member);
        if let Some(partner_id) = partner_id {
            self.link(id, partner_id);
        }
        Ok(())
    }

    /// Replaces an existing record. Partner changes are mirrored on both sides.
    pub fn update(&mut self, member: Member) -> Result<(), DirectoryError> {
        member.validate()?;
        let old_partner = self.require(member.id)?.partner_id;
        self.check_email_free(&member.email, Some(member.id))?;
        if let Some(friend_id) = member.friend_id {
            self.require(friend_id)?;
        }
        if let Some(partner_id) = member.partner_id {
            if old_partner != Some(partner_id) {
                self.check_partner(member.id, partner_id)?;
            }
        }

        let id = member.id;
        let new_partner = member.partner_id;
        self.members.insert(id, member);
        if old_partner != new_partner {
            if let Some(old) = old_partner {
                self.unlink(old, id);
            }
            if let Some(partner_id) = new_partner {
                self.link(id, partner_id);
            }
        }
        Ok(())
    }

    pub fn remove(&mut self, id: MemberId) -> Result<Member, DirectoryError> {
        let removed = self
            .members
            .remove(&id)
            .ok_or(DirectoryError::UnknownMember(id))?;
        for other in self.members.values_mut() {
            if other.partner_id == Some(id) {
                other.partner_id = None;
            }
            if other.friend_id == Some(id) {
                other.friend_id = None;
            }
        }
        debug!(member_id = id, "Removed member");
        Ok(removed)
    }

    pub fn set_status(&mut self, id: MemberId, status: MemberStatus) -> Result<(), DirectoryError> {
        let member = self
            .members
            .get_mut(&id)
            .ok_or(DirectoryError::UnknownMember(id))?;
        member.status = status;
        Ok(())
    }

    /// Pairs two members as partners, or unpairs `id` when `partner` is `None`.
    pub fn set_partner(
        &mut self,
        id: MemberId,
        partner: Option<MemberId>,
    ) -> Result<(), DirectoryError> {
        let mut member = self.require(id)?.clone();
        member.partner_id = partner;
        if partner.is_some() && member.friend_id == partner {
            member.friend_id = None;
        }
        self.update(member)
    }

    pub fn set_friend(
        &mut self,
        id: MemberId,
        friend: Option<MemberId>,
    ) -> Result<(), DirectoryError> {
        let mut member = self.require(id)?.clone();
        member.friend_id = friend;
        self.update(member)
    }

    fn require(&self, id: MemberId) -> Result<&Member, DirectoryError> {
        self.members.get(&id).ok_or(DirectoryError::UnknownMember(id))
    }

    fn check_email_free(&self, email: &str, except: Option<MemberId>) -> Result<(), DirectoryError> {
        let key = normalize_email(email);
        let taken = self
            .members
            .values()
            .any(|m| Some(m.id) != except && m.email_key() == key);
        if taken {
            return Err(DirectoryError::DuplicateEmail(email.trim().to_string()));
        }
        Ok(())
    }

    fn check_partner(&self, id: MemberId, partner_id: MemberId) -> Result<(), DirectoryError> {
        let partner = self.require(partner_id)?;
        match partner.partner_id {
            Some(current) if current != id => Err(DirectoryError::PartnerTaken {
                partner: partner_id,
                current,
            }),
            _ => Ok(()),
        }
    }

    // Partner supersedes friend on the other side too.
    fn link(&mut self, id: MemberId, partner_id: MemberId) {
        if let Some(partner) = self.members.get_mut(&partner_id) {
            partner.partner_id = Some(id);
            if partner.friend_id == Some(id) {
                partner.friend_id = None;
            }
        }
    }

    fn unlink(&mut self, former: MemberId, id: MemberId) {
        if let Some(member) = self.members.get_mut(&former) {
            if member.partner_id == Some(id) {
                member.partner_id = None;
            }
        }
    }
}
