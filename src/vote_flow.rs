use chrono::{DateTime, Utc};
use rand::Rng;

use crate::{
    device::readable_device_name,
    geo::LocationStatus,
    model::{poll::Poll, vote::VoteRequest},
};

pub const GENERIC_VOTE_ERROR: &str = "Vote failed";

/// The three mutually exclusive render states of the vote page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollView {
    Ballot,
    Confirmation,
    Results,
}

/// Pure view selection. An ended poll always shows results, even to a
/// device that never voted; otherwise any known vote (server-side or
/// just submitted locally) shows the confirmation.
pub fn select_view(
    poll: &Poll,
    my_vote: Option<&str>,
    has_voted_locally: bool,
    now: DateTime<Utc>,
) -> PollView {
    if poll.is_ended(now) {
        PollView::Results
    } else if my_vote.is_some() || has_voted_locally {
        PollView::Confirmation
    } else {
        PollView::Ballot
    }
}

/// Per-page-instance vote state: pending selection, in-flight flag,
/// last message, and the cosmetic social-proof counter. Holds no poll
/// data; the view is always re-derived from the latest fetch and clock.
pub struct VotePage {
    poll_id: String,
    device_id: String,
    selected: Option<String>,
    has_voted: bool,
    voting: bool,
    message: Option<String>,
    social_proof: u32,
}

impl VotePage {
    pub fn new(poll_id: String, device_id: String) -> Self {
        // cosmetic only, fixed for the lifetime of this page instance
        let social_proof = rand::thread_rng().gen_range(2000..=5000);
        Self {
            poll_id,
            device_id,
            selected: None,
            has_voted: false,
            voting: false,
            message: None,
            social_proof,
        }
    }

    pub fn poll_id(&self) -> &str {
        &self.poll_id
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_voting(&self) -> bool {
        self.voting
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Never recomputed; see [`VotePage::new`].
    pub fn social_proof(&self) -> u32 {
        self.social_proof
    }

    /// Folds the server's `myVote` into local state after a fetch.
    pub fn apply_fetch(&mut self, my_vote: Option<&str>) {
        if let Some(vote) = my_vote {
            self.selected = Some(vote.to_string());
            self.has_voted = true;
        }
    }

    pub fn view(&self, poll: &Poll, now: DateTime<Utc>) -> PollView {
        select_view(poll, None, self.has_voted, now)
    }

    /// Changes the pending selection. Re-selecting before submit just
    /// replaces it; nothing is sent.
    pub fn select(&mut self, option_id: &str) {
        if self.has_voted || self.voting {
            return;
        }
        self.selected = Some(option_id.to_string());
    }

    /// Claims the single in-flight submission slot and returns the
    /// option to submit. `None` when nothing is selected or a
    /// submission is already in flight — a no-op, by contract.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.voting || self.has_voted {
            return None;
        }
        let option_id = self.selected.clone()?;
        self.voting = true;
        self.message = None;
        Some(option_id)
    }

    /// Builds the wire request for an in-flight submission. Location
    /// fields are omitted unless the enricher reached `Ready`.
    pub fn vote_request(
        &self,
        option_id: String,
        location: &LocationStatus,
        user_agent: &str,
    ) -> VoteRequest {
        let (voter_city, voter_country) = location.fields();
        VoteRequest {
            option_id,
            unique_device_id: self.device_id.clone(),
            voter_city,
            voter_country,
            voter_device_name: Some(readable_device_name(user_agent)),
        }
    }

    pub fn finish_submit_ok(&mut self) {
        self.voting = false;
        self.has_voted = true;
        self.message = Some("Vote recorded".to_string());
    }

    /// Keeps the selection so the user can retry as-is. Prefers the
    /// server-supplied message.
    pub fn finish_submit_err(&mut self, server_message: Option<String>) {
        self.voting = false;
        self.message = Some(
            server_message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_VOTE_ERROR.to_string()),
        );
    }
}
