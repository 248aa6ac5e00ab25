//! Session transitions.
//!
//! Every transition is a pure function from a snapshot to a write intent:
//! either a full [`Session`] to persist or a [`MemberDelta`] to merge. The
//! store applies intents in arrival order per document, so two clients
//! issuing transitions concurrently converge on whichever write lands last.
//! Rules are enforced here, on the client side, not by the store.

use rand::{Rng, seq::SliceRandom};
use thiserror::Error;

use crate::{
    catalog::{self, RANDOM_THEME},
    dao::session_store::MemberDelta,
    state::session::Session,
};

/// Members required before a round can start.
pub const MIN_MEMBERS_TO_START: usize = 3;
/// Members required before more than one odd member is allowed.
pub const MIN_MEMBERS_FOR_EXTRA_ODD: usize = 6;
/// Hard ceiling on the configured odd member count.
pub const MAX_ODD_COUNT: u8 = 3;

/// Lifecycle phase of a session, derived from its `started` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for members; configuration is open.
    Lobby,
    /// A round is running; words are assigned.
    Active,
}

impl Phase {
    /// Phase the given session is in.
    pub fn of(session: &Session) -> Self {
        if session.started {
            Phase::Active
        } else {
            Phase::Lobby
        }
    }
}

/// Reasons a transition is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// The acting member is not the session creator.
    #[error("only the session creator can {action}")]
    NotCreator {
        /// Action that was attempted.
        action: &'static str,
    },
    /// The session is not in the phase the transition requires.
    #[error("cannot {action} while the session is {phase:?}")]
    WrongPhase {
        /// Action that was attempted.
        action: &'static str,
        /// Phase the session was actually in.
        phase: Phase,
    },
    /// The session has too few members for the transition.
    #[error("need at least {need} members to start (have {have})")]
    NotEnoughMembers {
        /// Current member count.
        have: usize,
        /// Required member count.
        need: usize,
    },
    /// The configured theme is not in the catalog.
    #[error("unknown theme `{theme}`")]
    UnknownTheme {
        /// The offending theme key.
        theme: String,
    },
}

fn ensure_creator(session: &Session, actor: &str, action: &'static str) -> Result<(), TransitionError> {
    if session.is_creator(actor) {
        Ok(())
    } else {
        Err(TransitionError::NotCreator { action })
    }
}

fn ensure_phase(session: &Session, expected: Phase, action: &'static str) -> Result<(), TransitionError> {
    let phase = Phase::of(session);
    if phase == expected {
        Ok(())
    } else {
        Err(TransitionError::WrongPhase { action, phase })
    }
}

/// Build a fresh lobby session created by `creator`.
pub fn create(code: String, creator: String) -> Session {
    let mut session = Session {
        code,
        creator: creator.clone(),
        members: vec![creator.clone()],
        member_names: Default::default(),
        started: false,
        theme: RANDOM_THEME.to_string(),
        word_index: 0,
        odd_members: vec![],
        odd_count: 1,
        last_word: None,
    };
    session.member_names.insert(creator.clone(), creator);
    session
}

/// Write intent for `identity` joining the session.
///
/// Joining is always a pure membership merge so that two simultaneous joins
/// cannot erase each other. The display name is backfilled later, either by
/// the read side or when a round starts.
pub fn join(identity: String) -> MemberDelta {
    MemberDelta::add(identity)
}

/// Write intent for `identity` leaving the session.
pub fn leave(identity: String) -> MemberDelta {
    MemberDelta::remove(identity)
}

/// Record a display name for a member.
pub fn rename(mut session: Session, identity: String, name: String) -> Session {
    session.member_names.insert(identity, name);
    session
}

/// Effective ceiling on the odd member count for a lobby of `member_count`.
pub fn max_odd_count(member_count: usize) -> u8 {
    if member_count >= MIN_MEMBERS_FOR_EXTRA_ODD {
        MAX_ODD_COUNT
    } else {
        1
    }
}

/// Update the round configuration.
///
/// Creator-only and lobby-only. The requested odd count is clamped rather
/// than refused: first to `1..=MAX_ODD_COUNT`, then down to one when the
/// lobby is too small for extras.
pub fn configure(
    mut session: Session,
    actor: &str,
    odd_count: u8,
    theme: String,
) -> Result<Session, TransitionError> {
    ensure_creator(&session, actor, "configure the session")?;
    ensure_phase(&session, Phase::Lobby, "configure the session")?;

    if catalog::pairs_for_theme(&theme).is_none() {
        return Err(TransitionError::UnknownTheme { theme });
    }

    let clamped = odd_count.clamp(1, MAX_ODD_COUNT);
    session.odd_count = clamped.min(max_odd_count(session.members.len()));
    session.theme = theme;
    Ok(session)
}

/// Start a round: pick a word pair and assign odd members.
///
/// Creator-only, lobby-only, and the lobby needs at least
/// [`MIN_MEMBERS_TO_START`] members. Odd members are drawn by shuffling a
/// copy of the member list; display names are backfilled for everyone so the
/// round screen never shows a blank entry.
pub fn start<R: Rng + ?Sized>(
    mut session: Session,
    actor: &str,
    rng: &mut R,
) -> Result<Session, TransitionError> {
    ensure_creator(&session, actor, "start a round")?;
    ensure_phase(&session, Phase::Lobby, "start a round")?;

    if session.members.len() < MIN_MEMBERS_TO_START {
        return Err(TransitionError::NotEnoughMembers {
            have: session.members.len(),
            need: MIN_MEMBERS_TO_START,
        });
    }

    let pairs = catalog::pairs_for_theme(&session.theme).ok_or_else(|| {
        TransitionError::UnknownTheme {
            theme: session.theme.clone(),
        }
    })?;

    session.word_index = rng.random_range(0..pairs.len());

    let mut shuffled = session.members.clone();
    shuffled.shuffle(rng);
    let odd_total = (session.odd_count as usize).min(shuffled.len());
    session.odd_members = shuffled.into_iter().take(odd_total).collect();

    for member in &session.members {
        if !session.member_names.contains_key(member) {
            session
                .member_names
                .insert(member.clone(), member.clone());
        }
    }

    session.started = true;
    Ok(session)
}

/// Stop the active round and record the common word for the recap.
///
/// The odd assignment is left in place so the recap can still show who held
/// the odd word. If the stored theme or index no longer resolves, the
/// previous recap word is kept rather than replaced with garbage.
pub fn stop(mut session: Session, actor: &str) -> Result<Session, TransitionError> {
    ensure_creator(&session, actor, "stop the round")?;
    ensure_phase(&session, Phase::Active, "stop the round")?;

    if let Some(pair) = catalog::pair_at(&session.theme, session.word_index) {
        session.last_word = Some(pair.common.to_string());
    }
    session.started = false;
    Ok(session)
}

/// Check that `actor` may delete the session.
pub fn authorize_end(session: &Session, actor: &str) -> Result<(), TransitionError> {
    ensure_creator(session, actor, "end the session")
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn rng() -> impl Rng {
        rand::rng()
    }

    fn lobby_of(n: usize) -> Session {
        let mut session = create("ab12".into(), "Zany Fox".into());
        for i in 1..n {
            session.members.push(format!("Member {i}"));
        }
        session
    }

    #[test]
    fn create_seeds_a_singleton_lobby() {
        let session = create("ab12".into(), "Zany Fox".into());
        assert_eq!(session.members, vec!["Zany Fox"]);
        assert_eq!(session.display_name("Zany Fox"), "Zany Fox");
        assert_eq!(session.theme, RANDOM_THEME);
        assert_eq!(session.odd_count, 1);
        assert_eq!(Phase::of(&session), Phase::Lobby);
        assert!(session.last_word.is_none());
    }

    #[test]
    fn join_and_leave_are_membership_deltas() {
        assert_eq!(join("Bold Owl".into()), MemberDelta::add("Bold Owl"));
        assert_eq!(leave("Bold Owl".into()), MemberDelta::remove("Bold Owl"));
    }

    #[test]
    fn configure_clamps_the_odd_count() {
        let session = lobby_of(6);
        let session = configure(session, "Zany Fox", 9, "foods".into()).unwrap();
        assert_eq!(session.odd_count, MAX_ODD_COUNT);
        assert_eq!(session.theme, "foods");

        let session = configure(session, "Zany Fox", 0, "foods".into()).unwrap();
        assert_eq!(session.odd_count, 1);
    }

    #[test]
    fn small_lobbies_only_get_one_odd_member() {
        let session = lobby_of(5);
        let session = configure(session, "Zany Fox", 3, "places".into()).unwrap();
        assert_eq!(session.odd_count, 1);
    }

    #[test]
    fn configure_rejects_unknown_themes_and_non_creators() {
        let session = lobby_of(4);
        assert_eq!(
            configure(session.clone(), "Zany Fox", 1, "animals".into()),
            Err(TransitionError::UnknownTheme {
                theme: "animals".into()
            })
        );
        assert!(matches!(
            configure(session, "Member 1", 1, "foods".into()),
            Err(TransitionError::NotCreator { .. })
        ));
    }

    #[test]
    fn start_requires_enough_members() {
        let session = lobby_of(2);
        assert_eq!(
            start(session, "Zany Fox", &mut rng()),
            Err(TransitionError::NotEnoughMembers { have: 2, need: 3 })
        );
    }

    #[test]
    fn start_is_creator_only() {
        let session = lobby_of(4);
        assert!(matches!(
            start(session, "Member 1", &mut rng()),
            Err(TransitionError::NotCreator { .. })
        ));
    }

    #[test]
    fn start_assigns_odd_members_from_the_lobby() {
        let session = lobby_of(7);
        let session = configure(session, "Zany Fox", 3, "objects".into()).unwrap();
        let session = start(session, "Zany Fox", &mut rng()).unwrap();

        assert!(session.started);
        assert_eq!(session.odd_members.len(), 3);
        for odd in &session.odd_members {
            assert!(session.is_member(odd));
        }
        assert!(catalog::pair_at(&session.theme, session.word_index).is_some());
    }

    #[test]
    fn start_caps_odd_members_at_the_member_count() {
        let mut session = lobby_of(3);
        // A stale configuration can outlive departures.
        session.odd_count = 3;
        let session = start(session, "Zany Fox", &mut rng()).unwrap();
        assert_eq!(session.odd_members.len(), 3);
    }

    #[test]
    fn start_backfills_missing_display_names() {
        let session = lobby_of(4);
        assert!(!session.member_names.contains_key("Member 2"));
        let session = start(session, "Zany Fox", &mut rng()).unwrap();
        assert_eq!(session.member_names.get("Member 2").unwrap(), "Member 2");
    }

    #[test]
    fn start_twice_is_refused() {
        let session = lobby_of(4);
        let session = start(session, "Zany Fox", &mut rng()).unwrap();
        assert!(matches!(
            start(session, "Zany Fox", &mut rng()),
            Err(TransitionError::WrongPhase { .. })
        ));
    }

    #[test]
    fn stop_records_the_common_word_and_keeps_the_assignment() {
        let session = lobby_of(4);
        let session = configure(session, "Zany Fox", 1, "foods".into()).unwrap();
        let session = start(session, "Zany Fox", &mut rng()).unwrap();
        let expected = catalog::pair_at("foods", session.word_index)
            .unwrap()
            .common
            .to_string();

        let session = stop(session, "Zany Fox").unwrap();
        assert!(!session.started);
        assert_eq!(session.last_word, Some(expected));
        assert_eq!(session.odd_members.len(), 1);
    }

    #[test]
    fn stop_keeps_the_previous_recap_when_the_word_is_unresolvable() {
        let mut session = lobby_of(4);
        session.started = true;
        session.theme = "retired-theme".into();
        session.last_word = Some("library".into());

        let session = stop(session, "Zany Fox").unwrap();
        assert!(!session.started);
        assert_eq!(session.last_word, Some("library".into()));
    }

    #[test]
    fn stop_outside_a_round_is_refused() {
        let session = lobby_of(4);
        assert!(matches!(
            stop(session, "Zany Fox"),
            Err(TransitionError::WrongPhase { .. })
        ));
    }

    #[test]
    fn end_is_creator_only() {
        let session = lobby_of(4);
        assert!(authorize_end(&session, "Zany Fox").is_ok());
        assert!(matches!(
            authorize_end(&session, "Member 1"),
            Err(TransitionError::NotCreator { .. })
        ));
    }

    #[test]
    fn start_is_reproducible_for_a_fixed_seed() {
        let session = lobby_of(6);
        let a = start(session.clone(), "Zany Fox", &mut StdRng::seed_from_u64(7)).unwrap();
        let b = start(session, "Zany Fox", &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a.word_index, b.word_index);
        assert_eq!(a.odd_members, b.odd_members);
    }
}
