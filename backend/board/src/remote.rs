use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    constants::ADMIN_HEADER,
    error::RemoteError,
    models::{
        AdminLog, AdminUser, Comment, CreatedNote, JoinTree, LikeCount, LikeRequest, Moderation,
        NewComment, NewNote, NewTree, Note, Sanction, Tree,
    },
};

/// Client for the note-board REST API.
#[derive(Clone)]
pub struct RemoteBoard {
    client: Client,
    base: Url,
    base_url: String,
}

impl RemoteBoard {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let base =
            Url::parse(&base_url).map_err(|e| RemoteError::BaseUrl(format!("{base_url}: {e}")))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL under the base with each segment percent-encoded, `/` included.
    fn segments_url(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base.clone();

        url.path_segments_mut()
            .map_err(|_| RemoteError::BaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{method} {url}");

        self.client.request(method, url)
    }

    fn admin(&self, method: Method, path: &str, admin_id: u64) -> RequestBuilder {
        self.request(method, path).header(ADMIN_HEADER, admin_id.to_string())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        read(self.request(Method::GET, path).send().await?).await
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, RemoteError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        read(self.request(method, path).json(body).send().await?).await
    }

    pub async fn user_trees(&self, user_id: u64) -> Result<Vec<Tree>, RemoteError> {
        self.get(&format!("/users/{user_id}/trees")).await
    }

    pub async fn tree_by_key(&self, tree_key: &str) -> Result<Tree, RemoteError> {
        let url = self.segments_url(&["tree", "by-key", tree_key])?;
        debug!("GET {url}");

        read(self.client.get(url).send().await?).await
    }

    pub async fn create_tree(&self, tree: &NewTree) -> Result<Tree, RemoteError> {
        self.send(Method::POST, "/trees", tree).await
    }

    pub async fn join_tree(&self, tree_id: u64, join: &JoinTree) -> Result<(), RemoteError> {
        let response = self
            .request(Method::POST, &format!("/trees/{tree_id}/join"))
            .json(join)
            .send()
            .await?;

        ensure_success(response).await.map(|_| ())
    }

    pub async fn tree_notes(&self, tree_id: u64) -> Result<Vec<Note>, RemoteError> {
        self.get(&format!("/trees/{tree_id}/notes")).await
    }

    pub async fn create_note(
        &self,
        tree_id: u64,
        note: &NewNote,
    ) -> Result<CreatedNote, RemoteError> {
        self.send(Method::POST, &format!("/trees/{tree_id}/notes"), note).await
    }

    pub async fn like_count(&self, note_id: u64) -> Result<u64, RemoteError> {
        let count: LikeCount = self.get(&format!("/notes/{note_id}/likes/count")).await?;

        Ok(count.like_count)
    }

    pub async fn like(&self, note_id: u64, user_id: u64) -> Result<LikeCount, RemoteError> {
        self.send(Method::POST, &format!("/notes/{note_id}/likes"), &LikeRequest { user_id })
            .await
    }

    pub async fn unlike(&self, note_id: u64, user_id: u64) -> Result<LikeCount, RemoteError> {
        self.send(Method::DELETE, &format!("/notes/{note_id}/likes"), &LikeRequest { user_id })
            .await
    }

    pub async fn note_comments(&self, note_id: u64) -> Result<Vec<Comment>, RemoteError> {
        self.get(&format!("/notes/{note_id}/comments")).await
    }

    pub async fn create_comment(
        &self,
        note_id: u64,
        comment: &NewComment,
    ) -> Result<(), RemoteError> {
        let response = self
            .request(Method::POST, &format!("/notes/{note_id}/comments"))
            .json(comment)
            .send()
            .await?;

        ensure_success(response).await.map(|_| ())
    }

    pub async fn admin_users(&self, admin_id: u64) -> Result<Vec<AdminUser>, RemoteError> {
        read(self.admin(Method::GET, "/admin/users", admin_id).send().await?).await
    }

    pub async fn admin_user_notes(
        &self,
        admin_id: u64,
        user_id: u64,
    ) -> Result<Vec<Note>, RemoteError> {
        let path = format!("/admin/users/{user_id}/notes");

        read(self.admin(Method::GET, &path, admin_id).send().await?).await
    }

    pub async fn admin_user_comments(
        &self,
        admin_id: u64,
        user_id: u64,
    ) -> Result<Vec<Comment>, RemoteError> {
        let path = format!("/admin/users/{user_id}/comments");

        read(self.admin(Method::GET, &path, admin_id).send().await?).await
    }

    pub async fn admin_logs(&self, admin_id: u64) -> Result<Vec<AdminLog>, RemoteError> {
        read(self.admin(Method::GET, "/admin/logs", admin_id).send().await?).await
    }

    pub async fn moderate_note(
        &self,
        admin_id: u64,
        note_id: u64,
        action: Moderation,
    ) -> Result<(), RemoteError> {
        self.moderate("notes", admin_id, note_id, action).await
    }

    pub async fn moderate_comment(
        &self,
        admin_id: u64,
        comment_id: u64,
        action: Moderation,
    ) -> Result<(), RemoteError> {
        self.moderate("comments", admin_id, comment_id, action).await
    }

    pub async fn sanction_user(
        &self,
        admin_id: u64,
        user_id: u64,
        action: Sanction,
    ) -> Result<(), RemoteError> {
        let path = format!("/admin/users/{user_id}/{action}");
        let response = self.admin(Method::PATCH, &path, admin_id).send().await?;

        ensure_success(response).await.map(|_| ())
    }

    async fn moderate(
        &self,
        collection: &str,
        admin_id: u64,
        id: u64,
        action: Moderation,
    ) -> Result<(), RemoteError> {
        let (method, path) = moderation_route(collection, id, action);
        let response = self.admin(method, &path, admin_id).send().await?;

        ensure_success(response).await.map(|_| ())
    }
}

fn moderation_route(collection: &str, id: u64, action: Moderation) -> (Method, String) {
    match action {
        Moderation::Delete => (Method::DELETE, format!("/admin/{collection}/{id}")),
        Moderation::Show | Moderation::Hide => {
            (Method::PATCH, format!("/admin/{collection}/{id}/{action}"))
        }
    }
}

async fn ensure_success(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(RemoteError::Status { status, body })
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    let response = ensure_success(response).await?;

    Ok(response.json().await?)
}
