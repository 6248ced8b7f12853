//! Profile metadata reconciliation after an OAuth sign-in.
//!
//! Providers resend name claims on every login. Names a user already stored
//! win over whatever the provider sends.

use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::governance::extract::ApiJson;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Name claims as sent by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProviderClaims {
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Split a display name into first name and the remainder.
fn split_full_name(full: &str) -> (Option<String>, Option<String>) {
    let mut parts = full.split_whitespace();
    let first = parts.next().map(str::to_string);
    let rest = parts.collect::<Vec<_>>().join(" ");
    (first, Some(rest).filter(|rest| !rest.is_empty()))
}

pub fn reconcile_profile_metadata(
    stored: &ProfileMetadata,
    claims: &ProviderClaims,
) -> ProfileMetadata {
    let (split_first, split_last) = present(&claims.full_name)
        .or_else(|| present(&claims.name))
        .map(|full| split_full_name(&full))
        .unwrap_or_default();

    let first_name = present(&stored.first_name)
        .or_else(|| present(&claims.given_name))
        .or(split_first);
    let last_name = present(&stored.last_name)
        .or_else(|| present(&claims.family_name))
        .or(split_last);

    let full_name = match (&first_name, &last_name) {
        (Some(first), Some(last)) => Some(format!("{first} {last}")),
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (None, None) => present(&stored.full_name),
    };

    ProfileMetadata {
        first_name,
        last_name,
        full_name,
    }
}

/// Reconcile against raw provider metadata. Claims that fail to decode are
/// logged and the stored profile is kept as is.
pub fn reconcile_raw_metadata(stored: &ProfileMetadata, raw: &Value) -> ProfileMetadata {
    match ProviderClaims::deserialize(raw) {
        Ok(claims) => reconcile_profile_metadata(stored, &claims),
        Err(err) => {
            warn!(error = %err, "ignoring unreadable provider metadata");
            stored.clone()
        }
    }
}

/// Callback payload: the stored profile and the provider's raw metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReconcileRequest {
    #[serde(default)]
    pub profile: ProfileMetadata,
    #[serde(default)]
    pub provider_metadata: Value,
}

/// Sign-in callback endpoint that merges provider claims into a profile.
pub fn identity_router() -> Router {
    Router::new().route("/api/v1/profiles/reconcile", post(reconcile_handler))
}

pub(crate) async fn reconcile_handler(
    ApiJson(request): ApiJson<ReconcileRequest>,
) -> Json<ProfileMetadata> {
    let merged = reconcile_raw_metadata(&request.profile, &request.provider_metadata);
    debug!(changed = merged != request.profile, "profile metadata reconciled");
    Json(merged)
}
