//! Typed HTTP client for the notedeck API, used by the terminal dashboard.

use super::models::{NewTaskInput, Note, NoteInput, Summary, Task, TaskInput};
use anyhow::{bail, Context, Result};
use reqwest::{header, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiClient {
    pub fn new(base_url: &str, session: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session: session.to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header(header::COOKIE, format!("session={}", self.session))
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let res = req.send().await.context("server unreachable")?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        match res.json::<ErrorBody>().await {
            Ok(body) => bail!("{} ({})", body.error, status.as_u16()),
            Err(_) => bail!("request failed ({})", status.as_u16()),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let res = self.send(self.request(Method::GET, path)).await?;
        res.json().await.context("unexpected response body")
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let res = self.send(self.request(method, path).json(body)).await?;
        res.json().await.context("unexpected response body")
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        self.get("/notes").await
    }

    pub async fn create_note(&self, note: &NoteInput) -> Result<Note> {
        self.send_json(Method::POST, "/notes", note).await
    }

    pub async fn update_note(&self, id: Uuid, note: &NoteInput) -> Result<Note> {
        self.send_json(Method::PUT, &format!("/notes/{id}"), note).await
    }

    pub async fn delete_note(&self, id: Uuid) -> Result<()> {
        self.delete(&format!("/notes/{id}")).await
    }

    pub async fn summarize_note(&self, id: Uuid) -> Result<String> {
        let res = self
            .send(self.request(Method::POST, &format!("/notes/{id}/summarize")))
            .await?;
        let Summary { summary } =
            res.json().await.context("unexpected response body")?;
        Ok(summary)
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.get("/tasks").await
    }

    pub async fn create_task(&self, task: &NewTaskInput) -> Result<Task> {
        self.send_json(Method::POST, "/tasks", task).await
    }

    pub async fn update_task(&self, id: Uuid, task: &TaskInput) -> Result<Task> {
        self.send_json(Method::PUT, &format!("/tasks/{id}"), task).await
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<()> {
        self.delete(&format!("/tasks/{id}")).await
    }
}
