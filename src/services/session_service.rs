//! Client engine driving the session state machine through the store.
//!
//! Each operation reads the latest snapshot, applies a pure transition and
//! writes the intent back. There is no lock across the read and the write:
//! the store only promises per-document write ordering, so concurrent
//! full-record writes resolve to whichever lands last. Membership changes
//! go through the merge operation precisely so they escape that race.

use std::sync::Arc;

use rand::Rng;

use crate::{
    dao::session_store::SessionStore,
    error::ServiceError,
    state::{Session, machine},
};

const CODE_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const CODE_LEN: usize = 4;
const CODE_ATTEMPTS: usize = 5;

fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CODE_LEN)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

fn ensure_identity(identity: &str) -> Result<(), ServiceError> {
    if identity.is_empty() {
        Err(ServiceError::InvalidInput(
            "identity is not available yet".into(),
        ))
    } else {
        Ok(())
    }
}

async fn load(store: &Arc<dyn SessionStore>, code: &str) -> Result<Session, ServiceError> {
    store
        .get(code.to_string())
        .await?
        .map(|entity| Session::from((code.to_string(), entity)))
        .ok_or_else(|| ServiceError::NotFound(format!("no session with code `{code}`")))
}

async fn save(store: &Arc<dyn SessionStore>, session: Session) -> Result<Session, ServiceError> {
    let code = session.code.clone();
    store.put(code, session.clone().into()).await?;
    Ok(session)
}

/// Create a session with a freshly drawn code and `identity` as creator.
///
/// Codes are drawn client-side; a handful of draws are checked against the
/// store to dodge collisions, but uniqueness stays best-effort.
pub async fn create_session(
    store: &Arc<dyn SessionStore>,
    identity: &str,
) -> Result<Session, ServiceError> {
    ensure_identity(identity)?;

    let mut code = generate_code(&mut rand::rng());
    for _ in 1..CODE_ATTEMPTS {
        if store.get(code.clone()).await?.is_none() {
            break;
        }
        code = generate_code(&mut rand::rng());
    }

    save(store, machine::create(code, identity.to_string())).await
}

/// Join an existing session.
///
/// The membership change is a merge, never a full write, so simultaneous
/// joins cannot erase each other.
pub async fn join_session(
    store: &Arc<dyn SessionStore>,
    code: &str,
    identity: &str,
) -> Result<Session, ServiceError> {
    ensure_identity(identity)?;
    load(store, code).await?;

    let joined = store
        .merge_members(code.to_string(), machine::join(identity.to_string()))
        .await?;
    if !joined {
        return Err(ServiceError::NotFound(format!(
            "no session with code `{code}`"
        )));
    }

    load(store, code).await
}

/// Leave a session. Quietly succeeds when the session is already gone.
pub async fn leave_session(
    store: &Arc<dyn SessionStore>,
    code: &str,
    identity: &str,
) -> Result<(), ServiceError> {
    ensure_identity(identity)?;
    store
        .merge_members(code.to_string(), machine::leave(identity.to_string()))
        .await?;
    Ok(())
}

/// Record a display name for a member.
pub async fn rename_member(
    store: &Arc<dyn SessionStore>,
    code: &str,
    identity: &str,
    name: &str,
) -> Result<Session, ServiceError> {
    ensure_identity(identity)?;
    if name.is_empty() {
        return Err(ServiceError::InvalidInput(
            "display name must not be empty".into(),
        ));
    }

    let session = load(store, code).await?;
    let session = machine::rename(session, identity.to_string(), name.to_string());
    save(store, session).await
}

/// Update the odd count and theme for the next round.
pub async fn configure_session(
    store: &Arc<dyn SessionStore>,
    code: &str,
    actor: &str,
    odd_count: u8,
    theme: &str,
) -> Result<Session, ServiceError> {
    let session = load(store, code).await?;
    let session = machine::configure(session, actor, odd_count, theme.to_string())?;
    save(store, session).await
}

/// Start a round, drawing the word pair and the odd members.
pub async fn start_round(
    store: &Arc<dyn SessionStore>,
    code: &str,
    actor: &str,
) -> Result<Session, ServiceError> {
    let session = load(store, code).await?;
    let session = machine::start(session, actor, &mut rand::rng())?;
    save(store, session).await
}

/// Stop the active round, recording the recap word.
pub async fn stop_round(
    store: &Arc<dyn SessionStore>,
    code: &str,
    actor: &str,
) -> Result<Session, ServiceError> {
    let session = load(store, code).await?;
    let session = machine::stop(session, actor)?;
    save(store, session).await
}

/// Delete the session. Watchers observe a `Missing` signal.
pub async fn end_session(
    store: &Arc<dyn SessionStore>,
    code: &str,
    actor: &str,
) -> Result<(), ServiceError> {
    let session = load(store, code).await?;
    machine::authorize_end(&session, actor)?;
    store.delete(code.to_string()).await?;
    Ok(())
}
