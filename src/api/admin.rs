use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{read_envelope, Ack, ApiClient, ApiEnvelope};
use crate::{
    model::{
        admin::{
            Admin, AdminPoll, AdminUser, DashboardStats, NotificationItem, Pagination,
            PollQuestion,
        },
        poll::Poll,
    },
    session::SessionContext,
};

/// Common list-endpoint query. `filter` maps to `status` or `type`
/// depending on the endpoint; empty or "all" filters are not sent.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub filter: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
            filter: None,
        }
    }
}

impl ListQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    fn params(&self, filter_key: &str) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            params.push(("search".to_string(), search.to_string()));
        }
        if let Some(filter) = self
            .filter
            .as_deref()
            .filter(|f| !f.trim().is_empty() && *f != "all")
        {
            params.push((filter_key.to_string(), filter.to_string()));
        }
        params
    }
}

#[derive(Debug, Deserialize)]
struct LoginData {
    token: String,
    admin: Admin,
}

#[derive(Debug, Deserialize)]
struct AdminData {
    admin: Admin,
}

#[derive(Debug, Deserialize)]
struct UsersData {
    users: Vec<AdminUser>,
    pagination: Pagination,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserStatusData {
    user_id: String,
    is_active: bool,
}

#[derive(Debug, Deserialize)]
struct PollsData {
    polls: Vec<AdminPoll>,
    pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct AdminPollData {
    poll: AdminPoll,
}

#[derive(Debug, Deserialize)]
struct CreatedPollData {
    poll: Poll,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PollQuestionData {
    poll_question: PollQuestion,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PollQuestionsData {
    #[serde(default, alias = "questions")]
    poll_questions: Vec<PollQuestion>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct NotificationsData {
    notifications: Vec<NotificationItem>,
    pagination: Pagination,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    pub poll_name: String,
    pub poll_duration: DateTime<Utc>,
    pub options: Vec<CreatePollOption>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollOption {
    pub option_text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollQuestionRequest {
    pub question: String,
    pub end_time: DateTime<Utc>,
}

impl ApiClient {
    /// `POST /admin/login`. Works without a session; the returned
    /// context is what later admin calls get injected with.
    pub async fn admin_login(&self, email: &str, password: &str) -> Result<(SessionContext, Admin)> {
        let resp = self
            .request(Method::POST, "/admin/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .context("Login failed")?;
        let envelope: ApiEnvelope<LoginData> = read_envelope(resp, "Login failed").await?;
        let LoginData { token, admin } = envelope.data;
        let session = SessionContext {
            token,
            admin_email: admin.admin_email.clone(),
            is_admin: admin.is_admin,
        };
        Ok((session, admin))
    }

    pub async fn admin_me(&self) -> Result<Admin> {
        let resp = self
            .request(Method::GET, "/admin/me")
            .send()
            .await
            .context("Failed to load admin profile")?;
        let envelope: ApiEnvelope<AdminData> =
            read_envelope(resp, "Failed to load admin profile").await?;
        Ok(envelope.data.admin)
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let resp = self
            .request(Method::GET, "/admin/dashboard")
            .send()
            .await
            .context("Failed to load dashboard stats")?;
        let envelope: ApiEnvelope<DashboardStats> =
            read_envelope(resp, "Failed to load dashboard stats").await?;
        Ok(envelope.data)
    }

    pub async fn list_users(&self, query: &ListQuery) -> Result<(Vec<AdminUser>, Pagination)> {
        let resp = self
            .request(Method::GET, "/admin/users")
            .query(&query.params("status"))
            .send()
            .await
            .context("Failed to load users")?;
        let envelope: ApiEnvelope<UsersData> = read_envelope(resp, "Failed to load users").await?;
        Ok((envelope.data.users, envelope.data.pagination))
    }

    pub async fn set_user_status(&self, user_id: &str, is_active: bool) -> Result<bool> {
        let resp = self
            .request(Method::PATCH, &format!("/admin/users/{user_id}/status"))
            .json(&serde_json::json!({ "isActive": is_active }))
            .send()
            .await
            .context("Failed to update user status")?;
        let envelope: ApiEnvelope<UserStatusData> =
            read_envelope(resp, "Failed to update user status").await?;
        Ok(envelope.data.is_active)
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<String> {
        let resp = self
            .request(Method::DELETE, &format!("/admin/users/{user_id}"))
            .send()
            .await
            .context("Failed to delete user")?;
        let ack: Ack = read_ack(resp, "Failed to delete user").await?;
        Ok(ack.message)
    }

    pub async fn list_polls(&self, query: &ListQuery) -> Result<(Vec<AdminPoll>, Pagination)> {
        let resp = self
            .request(Method::GET, "/admin/polls")
            .query(&query.params("status"))
            .send()
            .await
            .context("Failed to load polls")?;
        let envelope: ApiEnvelope<PollsData> = read_envelope(resp, "Failed to load polls").await?;
        Ok((envelope.data.polls, envelope.data.pagination))
    }

    pub async fn admin_poll(&self, poll_id: &str) -> Result<AdminPoll> {
        let resp = self
            .request(Method::GET, &format!("/admin/polls/{poll_id}"))
            .send()
            .await
            .context("Failed to load poll")?;
        let envelope: ApiEnvelope<AdminPollData> =
            read_envelope(resp, "Failed to load poll").await?;
        Ok(envelope.data.poll)
    }

    pub async fn delete_poll(&self, poll_id: &str) -> Result<String> {
        let resp = self
            .request(Method::DELETE, &format!("/admin/polls/{poll_id}"))
            .send()
            .await
            .context("Failed to delete poll")?;
        let ack: Ack = read_ack(resp, "Failed to delete poll").await?;
        Ok(ack.message)
    }

    pub async fn create_poll(&self, request: &CreatePollRequest) -> Result<Poll> {
        let resp = self
            .request(Method::POST, "/poll")
            .json(request)
            .send()
            .await
            .context("Failed to create poll")?;
        let envelope: ApiEnvelope<CreatedPollData> =
            read_envelope(resp, "Failed to create poll").await?;
        Ok(envelope.data.poll)
    }

    pub async fn create_poll_question(
        &self,
        request: &CreatePollQuestionRequest,
    ) -> Result<PollQuestion> {
        let resp = self
            .request(Method::POST, "/admin/poll-questions")
            .json(request)
            .send()
            .await
            .context("Failed to create poll question")?;
        let envelope: ApiEnvelope<PollQuestionData> =
            read_envelope(resp, "Failed to create poll question").await?;
        Ok(envelope.data.poll_question)
    }

    pub async fn delete_poll_question(&self, question_id: &str) -> Result<String> {
        let resp = self
            .request(Method::DELETE, &format!("/admin/poll-questions/{question_id}"))
            .send()
            .await
            .context("Failed to delete poll question")?;
        let ack: Ack = read_ack(resp, "Failed to delete poll question").await?;
        Ok(ack.message)
    }

    pub async fn list_poll_questions(
        &self,
        query: &ListQuery,
    ) -> Result<(Vec<PollQuestion>, Option<Pagination>)> {
        let resp = self
            .request(Method::GET, "/poll/questions")
            .query(&[
                ("page", query.page.to_string()),
                ("limit", query.limit.to_string()),
            ])
            .send()
            .await
            .context("Failed to load poll questions")?;
        let envelope: ApiEnvelope<PollQuestionsData> =
            read_envelope(resp, "Failed to load poll questions").await?;
        Ok((envelope.data.poll_questions, envelope.data.pagination))
    }

    pub async fn list_notifications(
        &self,
        query: &ListQuery,
    ) -> Result<(Vec<NotificationItem>, Pagination)> {
        let resp = self
            .request(Method::GET, "/admin/notifications")
            .query(&query.params("type"))
            .send()
            .await
            .context("Failed to load notifications")?;
        let envelope: ApiEnvelope<NotificationsData> =
            read_envelope(resp, "Failed to load notifications").await?;
        Ok((envelope.data.notifications, envelope.data.pagination))
    }
}

async fn read_ack(resp: reqwest::Response, fallback: &str) -> Result<Ack> {
    let status = resp.status();
    let body = resp.bytes().await.unwrap_or_default();
    if let Ok(ack) = serde_json::from_slice::<Ack>(&body) {
        if ack.success {
            return Ok(ack);
        }
        if !ack.message.trim().is_empty() {
            anyhow::bail!("{}", ack.message);
        }
    }
    anyhow::bail!("{fallback} ({status})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_skips_empty_and_all_filters() {
        let query = ListQuery {
            page: 2,
            limit: 25,
            search: Some("ana".into()),
            filter: Some("active".into()),
        };
        assert_eq!(
            query.params("status"),
            vec![
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "25".to_string()),
                ("search".to_string(), "ana".to_string()),
                ("status".to_string(), "active".to_string()),
            ]
        );

        let query = ListQuery {
            filter: Some("all".into()),
            search: Some("  ".into()),
            ..ListQuery::default()
        };
        assert_eq!(
            query.params("type"),
            vec![
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn create_poll_request_serializes_camel_case() {
        let request = CreatePollRequest {
            poll_name: "Best snack".into(),
            poll_duration: "2025-06-01T12:00:00Z".parse().unwrap(),
            options: vec![CreatePollOption {
                option_text: "Chips".into(),
            }],
        };
        let raw = serde_json::to_value(&request).unwrap();
        assert_eq!(raw["pollName"], "Best snack");
        assert_eq!(raw["options"][0]["optionText"], "Chips");
        assert!(raw["pollDuration"].as_str().unwrap().starts_with("2025-06-01T12:00:00"));
    }
}
