//! Per-viewer derivations over a session snapshot.
//!
//! Everything here is recomputed from the latest snapshot and never stored,
//! so a viewer can only ever act on state the store has already accepted.

use crate::{
    catalog,
    state::{
        machine::{self, MIN_MEMBERS_TO_START},
        session::Session,
    },
};

/// What a given viewer should see on the word screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordView {
    /// The viewer holds the common word.
    Common(&'static str),
    /// The viewer holds the odd word.
    Odd(&'static str),
    /// Lobby, nothing to show yet.
    Waiting,
    /// Lobby after a round, showing the common word of the last round.
    Recap(String),
    /// The viewer is not a member of this session.
    Spectator,
    /// The stored theme or index no longer resolves to a word pair.
    Unavailable,
}

/// One roster line for the member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberBadge {
    /// Member identity.
    pub identity: String,
    /// Display name, falling back to the identity.
    pub name: String,
    /// Whether this member created the session.
    pub host: bool,
    /// Whether this member holds the odd word.
    pub odd: bool,
}

/// Whether the host can start a round right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartGate {
    /// Enough members, the start action is enabled.
    Ready,
    /// The lobby is short this many members.
    NeedMorePlayers(usize),
}

/// Word screen content for `viewer`.
pub fn word_for_viewer(session: &Session, viewer: &str) -> WordView {
    if !session.is_member(viewer) {
        return WordView::Spectator;
    }

    if !session.started {
        return match &session.last_word {
            Some(word) => WordView::Recap(word.clone()),
            None => WordView::Waiting,
        };
    }

    let Some(pair) = catalog::pair_at(&session.theme, session.word_index) else {
        return WordView::Unavailable;
    };

    if session.odd_members.iter().any(|odd| odd == viewer) {
        WordView::Odd(pair.odd)
    } else {
        WordView::Common(pair.common)
    }
}

/// Roster lines in join order.
///
/// The odd badge is derived from `odd_members`, which can still name a
/// member who left mid-round; such entries simply do not appear here.
pub fn roster(session: &Session) -> Vec<MemberBadge> {
    session
        .members
        .iter()
        .map(|identity| MemberBadge {
            identity: identity.clone(),
            name: session.display_name(identity).to_string(),
            host: session.is_creator(identity),
            odd: session.odd_members.iter().any(|odd| odd == identity),
        })
        .collect()
}

/// Whether the start action should be enabled for the host.
pub fn start_gate(session: &Session) -> StartGate {
    let have = session.members.len();
    if have >= MIN_MEMBERS_TO_START {
        StartGate::Ready
    } else {
        StartGate::NeedMorePlayers(MIN_MEMBERS_TO_START - have)
    }
}

/// Ceiling on the odd count selector for the current lobby size.
pub fn max_odd_count(session: &Session) -> u8 {
    machine::max_odd_count(session.members.len())
}
