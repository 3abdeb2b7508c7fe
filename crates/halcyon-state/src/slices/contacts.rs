//! Contacts of the active wallet

use crate::events::Event;
use crate::slice::{Slice, SliceContext};
use halcyon_core::Contact;

/// Contacts slice
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactsState {
    /// Contacts sorted by name
    pub contacts: Vec<Contact>,
}

impl ContactsState {
    fn sort(&mut self) {
        self.contacts
            .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    }
}

impl Slice for ContactsState {
    fn initial(_ctx: &SliceContext) -> Self {
        Self::default()
    }

    fn reduce(&mut self, event: &Event) {
        match event {
            Event::WalletUnlocked(session) | Event::WalletSwitched(session) => {
                self.contacts = session.contacts.clone();
                self.sort();
            }
            Event::ContactStored { contact, .. } => {
                match self.contacts.iter_mut().find(|c| c.id == contact.id) {
                    Some(existing) => *existing = contact.clone(),
                    None => self.contacts.push(contact.clone()),
                }
                self.sort();
            }
            Event::ContactDeleted { contact_id, .. } => {
                self.contacts.retain(|c| &c.id != contact_id);
            }
            _ => {}
        }
    }

    fn on_wallet_locked(&mut self, ctx: &SliceContext) {
        *self = Self::initial(ctx);
    }

    fn on_wallet_switched(&mut self, ctx: &SliceContext) {
        *self = Self::initial(ctx);
    }

    fn on_active_wallet_deleted(&mut self, ctx: &SliceContext) {
        *self = Self::initial(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SessionKey;

    fn contact(id: &str, name: &str) -> Contact {
        Contact {
            id: id.to_string(),
            name: name.to_string(),
            address: format!("addr-{}", id),
        }
    }

    #[test]
    fn test_store_edit_delete() {
        let mut state = ContactsState::default();
        for c in [contact("1", "bob"), contact("2", "Alice")] {
            state.reduce(&Event::ContactStored {
                session: SessionKey::new("w", 1),
                contact: c,
            });
        }
        assert_eq!(state.contacts[0].name, "Alice");

        state.reduce(&Event::ContactStored {
            session: SessionKey::new("w", 1),
            contact: contact("1", "Bobby"),
        });
        assert_eq!(state.contacts.len(), 2);
        assert_eq!(state.contacts[1].name, "Bobby");

        state.reduce(&Event::ContactDeleted {
            session: SessionKey::new("w", 1),
            contact_id: "2".to_string(),
        });
        assert_eq!(state.contacts, vec![contact("1", "Bobby")]);
    }
}
