use indexmap::IndexMap;

use crate::{dao::models::SessionEntity, state::machine::Phase};

/// Runtime representation of a session, pairing the document key with the
/// stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Session code, the document key in the store.
    pub code: String,
    /// Identity of the member who created the session.
    pub creator: String,
    /// Member identities in join order.
    pub members: Vec<String>,
    /// Display names keyed by member identity. Sparse: members who joined
    /// without a recorded name simply have no entry here.
    pub member_names: IndexMap<String, String>,
    /// Whether a round is currently active.
    pub started: bool,
    /// Selected theme key.
    pub theme: String,
    /// Index of the word pair within the selected theme.
    pub word_index: usize,
    /// Members holding the odd word for the active round.
    pub odd_members: Vec<String>,
    /// Configured number of odd members for the next round.
    pub odd_count: u8,
    /// Common word of the last finished round, shown on the recap.
    pub last_word: Option<String>,
}

impl Session {
    /// Lifecycle phase derived from the `started` flag.
    pub fn phase(&self) -> Phase {
        Phase::of(self)
    }

    /// Whether `identity` currently belongs to the session.
    pub fn is_member(&self, identity: &str) -> bool {
        self.members.iter().any(|member| member == identity)
    }

    /// Whether `identity` created the session.
    pub fn is_creator(&self, identity: &str) -> bool {
        self.creator == identity
    }

    /// Display name for a member, falling back to the identity itself when no
    /// name was recorded.
    pub fn display_name<'a>(&'a self, identity: &'a str) -> &'a str {
        self.member_names
            .get(identity)
            .map(String::as_str)
            .unwrap_or(identity)
    }

    /// The single odd member when exactly one was assigned.
    ///
    /// Returns `None` while no round ran or when several members hold the odd
    /// word; callers that care about all of them read `odd_members` directly.
    pub fn odd_one(&self) -> Option<&str> {
        match self.odd_members.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}

impl From<(String, SessionEntity)> for Session {
    fn from((code, entity): (String, SessionEntity)) -> Self {
        Self {
            code,
            creator: entity.creator,
            members: entity.members,
            member_names: entity.member_names,
            started: entity.started,
            theme: entity.theme,
            word_index: entity.word_index,
            odd_members: entity.odd_members,
            odd_count: entity.odd_count,
            last_word: entity.last_word,
        }
    }
}

impl From<Session> for SessionEntity {
    fn from(session: Session) -> Self {
        Self {
            members: session.members,
            member_names: session.member_names,
            creator: session.creator,
            started: session.started,
            theme: session.theme,
            word_index: session.word_index,
            odd_members: session.odd_members,
            odd_count: session.odd_count,
            last_word: session.last_word,
        }
    }
}
