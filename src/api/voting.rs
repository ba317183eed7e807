use mongodb::{bson::doc, options::FindOptions, Client};
use rocket::{futures::TryStreamExt, serde::json::Json, Route, State};

use crate::{
    error::{Error, Result},
    matching::resolve_matches,
    model::{
        api::vote::{CandidateView, MatchedPeer, VoteRequest, VoteView},
        auth::{AuthToken, ParticipantAuth},
        db::{NewVote, Participant, TimeSlotSettings, Vote},
        mongodb::Coll,
    },
};

use super::common::{profile_by_token, settings_for};

pub fn routes() -> Vec<Route> {
    routes![get_candidates, get_votes, submit_votes, get_matches]
}

/// The participants the caller may vote for: opposite gender, same slot,
/// ordered by seat number.
#[get("/voting/candidates")]
async fn get_candidates(
    token: AuthToken<ParticipantAuth>,
    participants: Coll<Participant>,
) -> Result<Json<Vec<CandidateView>>> {
    let caller = profile_by_token(&token, &participants).await?;

    let filter = doc! {
        "day": caller.day,
        "time": caller.time,
        "gender": caller.gender.opposite(),
    };
    let by_seat = FindOptions::builder()
        .sort(doc! { "seat_number": 1 })
        .build();
    let candidates: Vec<Participant> = participants.find(filter, by_seat).await?.try_collect().await?;

    Ok(Json(candidates.into_iter().map(CandidateView::from).collect()))
}

/// The caller's current outgoing votes.
#[get("/voting/votes")]
async fn get_votes(
    token: AuthToken<ParticipantAuth>,
    participants: Coll<Participant>,
    votes: Coll<Vote>,
) -> Result<Json<Vec<VoteView>>> {
    let caller = profile_by_token(&token, &participants).await?;

    let outgoing: Vec<Vote> = votes
        .find(doc! { "voter": caller.id }, None)
        .await?
        .try_collect()
        .await?;

    Ok(Json(outgoing.into_iter().map(VoteView::from).collect()))
}

/// Replace the caller's entire outgoing vote set.
///
/// The delete and insert run inside one transaction, so a concurrent reader
/// sees either the fully-old or fully-new set, never a partially-deleted one.
#[post("/voting/votes", data = "<request>", format = "json")]
async fn submit_votes(
    token: AuthToken<ParticipantAuth>,
    request: Json<VoteRequest>,
    participants: Coll<Participant>,
    votes: Coll<Vote>,
    new_votes: Coll<NewVote>,
    settings: Coll<TimeSlotSettings>,
    db_client: &State<Client>,
) -> Result<()> {
    let caller = profile_by_token(&token, &participants).await?;

    let slot_settings = settings_for(&caller, &settings).await?;
    if !slot_settings.voting_open {
        return Err(Error::VotingClosed(caller.slot().to_string()));
    }

    // Targets are validated server-side: they must exist, sit in the
    // caller's slot, and be of the opposite gender.
    let found: Vec<Participant> = if request.targets.is_empty() {
        Vec::new()
    } else {
        participants
            .find(doc! { "_id": { "$in": request.targets.clone() } }, None)
            .await
            .map_err(Error::VoteSubmissionFailed)?
            .try_collect()
            .await
            .map_err(Error::VoteSubmissionFailed)?
    };
    let targets = request.validated_targets(&caller, &found)?;

    let replacement = NewVote::replacement_set(caller.id, targets);

    let mut session = db_client
        .start_session(None)
        .await
        .map_err(Error::VoteSubmissionFailed)?;
    session
        .start_transaction(None)
        .await
        .map_err(Error::VoteSubmissionFailed)?;
    votes
        .delete_many_with_session(doc! { "voter": caller.id }, None, &mut session)
        .await
        .map_err(Error::VoteSubmissionFailed)?;
    if !replacement.is_empty() {
        new_votes
            .insert_many_with_session(&replacement, None, &mut session)
            .await
            .map_err(Error::VoteSubmissionFailed)?;
    }
    session
        .commit_transaction()
        .await
        .map_err(Error::VoteSubmissionFailed)?;

    info!(
        "Participant {} replaced their votes ({} targets)",
        caller.id,
        replacement.len()
    );
    Ok(())
}

/// The caller's mutual matches, available once results are open for their
/// slot.
#[get("/voting/matches")]
async fn get_matches(
    token: AuthToken<ParticipantAuth>,
    participants: Coll<Participant>,
    votes: Coll<Vote>,
    settings: Coll<TimeSlotSettings>,
) -> Result<Json<Vec<MatchedPeer>>> {
    let caller = profile_by_token(&token, &participants).await?;

    let slot_settings = settings_for(&caller, &settings).await?;
    if !slot_settings.results_open {
        return Err(Error::ResultsClosed(caller.slot().to_string()));
    }

    let matches = resolve_matches(&caller, &votes, &participants).await?;
    Ok(Json(matches))
}
