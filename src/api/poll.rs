use anyhow::{Context, Result};
use reqwest::Method;
use serde::Deserialize;

use super::{read_envelope, ApiClient, ApiEnvelope};
use crate::{
    model::{
        poll::Poll,
        vote::{PollSnapshot, VoteRequest},
    },
    vote_flow::GENERIC_VOTE_ERROR,
};

#[derive(Debug, Deserialize)]
struct VoteData {
    poll: Poll,
}

impl ApiClient {
    /// `GET /poll/{id}?uniqueDeviceId=…`. The device-id parameter is
    /// omitted when the device has no identity, exactly as an empty id
    /// means "anonymous".
    pub async fn get_poll(&self, poll_id: &str, device_id: &str) -> Result<PollSnapshot> {
        let mut req = self.request(Method::GET, &format!("/poll/{poll_id}"));
        if !device_id.is_empty() {
            req = req.query(&[("uniqueDeviceId", device_id)]);
        }
        let resp = req.send().await.context("Failed to load poll")?;
        let envelope: ApiEnvelope<PollSnapshot> =
            read_envelope(resp, "Failed to load poll").await?;
        Ok(envelope.data)
    }

    /// `POST /poll/{id}/vote`. Returns the updated poll on success; the
    /// error string is the server's rejection message when one exists.
    pub async fn vote(&self, poll_id: &str, request: &VoteRequest) -> Result<Poll> {
        let resp = self
            .request(Method::POST, &format!("/poll/{poll_id}/vote"))
            .json(request)
            .send()
            .await
            .context(GENERIC_VOTE_ERROR)?;
        let envelope: ApiEnvelope<VoteData> = read_envelope(resp, GENERIC_VOTE_ERROR).await?;
        Ok(envelope.data.poll)
    }
}
