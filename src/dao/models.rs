use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Persisted session record, keyed in the store by its session code.
///
/// Field names follow the wire contract every client build agrees on; the
/// code itself is the document key and never stored inside the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionEntity {
    /// Identities currently in the session, in join order.
    pub members: Vec<String>,
    /// Display names keyed by member identity. Entries for departed members
    /// are never pruned.
    #[serde(default)]
    pub member_names: IndexMap<String, String>,
    /// Identity of the client that created the session; immutable.
    pub creator: String,
    /// Whether a round is currently in progress.
    pub started: bool,
    /// Theme key the current (or next) round draws pairs from.
    pub theme: String,
    /// Index into the resolved theme's pair list; meaningful while started.
    pub word_index: usize,
    /// Members assigned the odd word for the current round, frozen at start.
    #[serde(default)]
    pub odd_members: Vec<String>,
    /// Host-configured number of odd ones out for the next round.
    pub odd_count: u8,
    /// Common word of the most recently ended round, for the post-round recap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_word: Option<String>,
}

/// Subset of a session record returned by the listing operation, enough for
/// a lobby browser to show join codes and spot orphaned sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct SessionListItemEntity {
    /// Session code (the document key).
    pub code: String,
    /// Identities currently in the session.
    pub members: Vec<String>,
}
