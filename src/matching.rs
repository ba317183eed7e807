//! The match resolver: given a participant, find every other participant
//! with whom interest is mutual and surface their contact details.
//!
//! Resolution is a pure read in three stages; it performs no writes and is
//! safe to retry. Any storage failure aborts the whole call; partial
//! results are never returned.

use std::collections::HashSet;

use mongodb::{bson::doc, options::FindOptions};
use rocket::futures::TryStreamExt;

use crate::{
    error::{Error, Result},
    model::{
        api::vote::MatchedPeer,
        db::{Participant, Vote},
        mongodb::{Coll, Id},
    },
};

/// Resolve the given participant's mutual matches.
///
/// 1. Fetch the set T of targets the caller voted for. Empty T short-circuits
///    to an empty result without consulting anyone else's votes.
/// 2. Fetch the votes targeting the caller and keep only those whose voter is
///    in T (the reciprocity filter). A vote from outside T is irrelevant even
///    though it targets the caller.
/// 3. Hydrate the reciprocal voters into [`MatchedPeer`]s, ordered by seat
///    number for deterministic output.
pub async fn resolve_matches(
    caller: &Participant,
    votes: &Coll<Vote>,
    participants: &Coll<Participant>,
) -> Result<Vec<MatchedPeer>> {
    // Stage 1: outgoing edges.
    let outgoing: Vec<Vote> = votes
        .find(doc! { "voter": caller.id }, None)
        .await
        .map_err(Error::MatchLookupFailed)?
        .try_collect()
        .await
        .map_err(Error::MatchLookupFailed)?;
    let targets = match chosen_targets(&outgoing) {
        Some(targets) => targets,
        None => return Ok(Vec::new()),
    };

    // Stage 2: incoming edges, filtered for reciprocity.
    let incoming: Vec<Vote> = votes
        .find(doc! { "target": caller.id }, None)
        .await
        .map_err(Error::MatchLookupFailed)?
        .try_collect()
        .await
        .map_err(Error::MatchLookupFailed)?;
    let mutual = reciprocal_voters(&targets, &incoming);
    if mutual.is_empty() {
        return Ok(Vec::new());
    }

    // Stage 3: hydrate into peer views.
    let ids: Vec<_> = mutual.iter().copied().collect();
    let by_seat = FindOptions::builder()
        .sort(doc! { "seat_number": 1 })
        .build();
    let peers: Vec<Participant> = participants
        .find(doc! { "_id": { "$in": ids } }, by_seat)
        .await
        .map_err(Error::MatchLookupFailed)?
        .try_collect()
        .await
        .map_err(Error::MatchLookupFailed)?;

    Ok(peers.into_iter().map(MatchedPeer::from).collect())
}

/// Stage 1 decision: the set T of targets the caller voted for, or `None`
/// when the caller cast no votes. `None` ends resolution; incoming votes are
/// never fetched in that case.
fn chosen_targets(outgoing: &[Vote]) -> Option<HashSet<Id>> {
    let targets: HashSet<Id> = outgoing.iter().map(|vote| vote.target).collect();
    (!targets.is_empty()).then_some(targets)
}

/// The reciprocity filter: of the given incoming votes, the voters that the
/// caller also chose. Votes from anyone outside `targets` are discarded.
fn reciprocal_voters(targets: &HashSet<Id>, incoming: &[Vote]) -> HashSet<Id> {
    incoming
        .iter()
        .map(|vote| vote.voter)
        .filter(|voter| targets.contains(voter))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(pairs: &[(Id, Id)]) -> Vec<Vote> {
        pairs
            .iter()
            .map(|&(voter, target)| Vote::example(voter, target))
            .collect()
    }

    #[test]
    fn mutual_votes_match_both_ways() {
        let (a, b) = (Id::new(), Id::new());

        // From A's perspective.
        let targets: HashSet<Id> = [b].into_iter().collect();
        let incoming = edges(&[(b, a)]);
        assert_eq!(
            reciprocal_voters(&targets, &incoming),
            [b].into_iter().collect()
        );

        // And symmetrically from B's.
        let targets: HashSet<Id> = [a].into_iter().collect();
        let incoming = edges(&[(a, b)]);
        assert_eq!(
            reciprocal_voters(&targets, &incoming),
            [a].into_iter().collect()
        );
    }

    #[test]
    fn no_outgoing_votes_ends_resolution_before_incoming() {
        let (a, b) = (Id::new(), Id::new());

        // With no votes cast, stage 1 already decides the result; there is
        // no target set to filter incoming votes against.
        assert_eq!(chosen_targets(&[]), None);

        // Any outgoing vote produces a set to carry into stage 2.
        let outgoing = edges(&[(a, b)]);
        assert_eq!(chosen_targets(&outgoing), Some([b].into_iter().collect()));
    }

    #[test]
    fn unreciprocated_vote_is_not_a_match() {
        let (_a, b) = (Id::new(), Id::new());

        // A voted for B, but no vote targeting A exists.
        let targets: HashSet<Id> = [b].into_iter().collect();
        assert!(reciprocal_voters(&targets, &[]).is_empty());
    }

    #[test]
    fn votes_from_outside_the_chosen_set_are_irrelevant() {
        let (a, b, c) = (Id::new(), Id::new(), Id::new());

        // A chose only B; C's vote for A must not surface.
        let targets: HashSet<Id> = [b].into_iter().collect();
        let incoming = edges(&[(c, a)]);
        assert!(reciprocal_voters(&targets, &incoming).is_empty());
    }

    #[test]
    fn mixed_incoming_votes_filtered_to_chosen_targets() {
        let (a, b, c, d) = (Id::new(), Id::new(), Id::new(), Id::new());

        // A chose B and C. B and D voted back; only B is mutual.
        let targets: HashSet<Id> = [b, c].into_iter().collect();
        let incoming = edges(&[(b, a), (d, a)]);
        assert_eq!(
            reciprocal_voters(&targets, &incoming),
            [b].into_iter().collect()
        );
    }
}
