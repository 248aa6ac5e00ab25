use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::dao::session_store::MemberDelta;

/// Membership patch applied to a session document.
///
/// Both fields are optional but at least one must be present. An `add` of a
/// member already in the list is a no-op, as is a `remove` of an absent one.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MemberPatchRequest {
    /// Member identity to append if not already present.
    #[serde(default)]
    pub add: Option<String>,
    /// Member identity to remove if present.
    #[serde(default)]
    pub remove: Option<String>,
}

impl Validate for MemberPatchRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.add.is_none() && self.remove.is_none() {
            let mut err = ValidationError::new("member_patch_empty");
            err.message = Some("At least one of `add` or `remove` must be set".into());
            errors.add("add", err);
        }

        if let Some(add) = &self.add
            && add.is_empty()
        {
            let mut err = ValidationError::new("member_patch_blank");
            err.message = Some("`add` must not be an empty string".into());
            errors.add("add", err);
        }

        if let Some(remove) = &self.remove
            && remove.is_empty()
        {
            let mut err = ValidationError::new("member_patch_blank");
            err.message = Some("`remove` must not be an empty string".into());
            errors.add("remove", err);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl From<MemberPatchRequest> for MemberDelta {
    fn from(request: MemberPatchRequest) -> Self {
        Self {
            add: request.add,
            remove: request.remove,
        }
    }
}
