//! Referral routes: invitation creation, listing and resolution.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use domain::models::{CreateInvitationRequest, InvitationResponse, InvitationStatusResponse};
use domain::services::{ReferralError, DUPLICATE_INVITATION_NOTICE};
use shared::Envelope;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{
    record_duplicate_invitation, record_invitation_created, record_resolution, ResolutionOutcome,
};

/// Versioned referral routes, mounted under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/referrals", get(get_all).post(create_invitation))
        .route(
            "/referrals/resolve/:referral_code",
            get(resolve_referral).post(resolve_referral),
        )
        .route("/referrals/:user_id", get(get_invitations))
}

/// List every invitation.
///
/// GET /api/v1/referrals
pub async fn get_all(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<InvitationResponse>>>, ApiError> {
    let result = state.service.get_all().await?;
    Ok(Json(result))
}

/// Record an invitation and return the shareable link.
///
/// POST /api/v1/referrals
///
/// A second request for the same referral code writes nothing and returns the
/// link with a duplicate notice.
pub async fn create_invitation(
    State(state): State<AppState>,
    Json(request): Json<CreateInvitationRequest>,
) -> Result<Json<Envelope<String>>, ApiError> {
    request.validate()?;

    let channel = request.channel.trim().to_lowercase();
    let result = state.service.create_invitation(request).await?;

    if result.has_message(DUPLICATE_INVITATION_NOTICE) {
        record_duplicate_invitation();
    } else {
        record_invitation_created(&channel);
    }

    Ok(Json(result))
}

/// List the invitations sent by one referrer.
///
/// GET /api/v1/referrals/:user_id
pub async fn get_invitations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Envelope<Vec<InvitationStatusResponse>>>, ApiError> {
    let result = state.service.get_invitations(&user_id).await?;

    info!(
        referrer_user_id = %user_id,
        invitation_count = result.data.len(),
        "Listed invitations"
    );

    Ok(Json(result))
}

/// Accept a referral code.
///
/// GET|POST /api/v1/referrals/resolve/:referral_code
///
/// 200 with an empty body on success, 404 for an unknown code and 409 for a
/// code that was already used.
pub async fn resolve_referral(
    State(state): State<AppState>,
    Path(referral_code): Path<String>,
) -> Result<(), ApiError> {
    let result = state.service.resolve_referral(&referral_code).await;

    record_resolution(match &result {
        Ok(()) => ResolutionOutcome::Completed,
        Err(ReferralError::NotFound(_)) => ResolutionOutcome::NotFound,
        Err(ReferralError::AlreadyProcessed(_)) => ResolutionOutcome::AlreadyProcessed,
        Err(ReferralError::Store(_)) => ResolutionOutcome::Error,
    });

    result.map_err(ApiError::from)
}
