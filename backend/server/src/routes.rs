use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State as Shared},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use board::{
    Point, Viewport,
    models::{
        AdminLog, AdminUser, Comment, JoinTree, LikeCount, LikeRequest, Moderation, NewComment,
        NewNote, NewTree, Note, PlacedNote, Sanction, Tree,
    },
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    error::AppError,
    state::State,
    utils::{
        admin_id, check_click, check_message, first_public, is_member, like_counts, required_text,
    },
};

#[derive(Deserialize)]
pub struct ViewQuery {
    pub user_id: u64,
    pub width: f64,
    pub height: f64,
}

#[derive(Deserialize)]
pub struct PlaceNote {
    pub user_id: u64,
    pub message: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Deserialize)]
pub struct JoinByKey {
    pub user_id: u64,
    pub tree_key: String,
}

async fn ensure_member(state: &State, user_id: u64, tree_id: u64) -> Result<(), AppError> {
    let trees = state.remote.user_trees(user_id).await?;

    if !is_member(&trees, tree_id) {
        return Err(AppError::NotMember);
    }

    Ok(())
}

pub async fn tree_notes_handler(
    Shared(state): Shared<Arc<State>>,
    Path(tree_id): Path<u64>,
    Query(view): Query<ViewQuery>,
) -> Result<Json<Vec<PlacedNote>>, AppError> {
    ensure_member(&state, view.user_id, tree_id).await?;

    let notes: Vec<Note> = state
        .remote
        .tree_notes(tree_id)
        .await?
        .into_iter()
        .filter(|note| !note.is_hidden)
        .collect();

    let likes = like_counts(&state, &notes).await;
    let viewport = Viewport::new(view.width, view.height);

    let placed = notes
        .into_iter()
        .zip(likes)
        .map(|(note, likes)| PlacedNote::place(note, &viewport, likes))
        .collect();

    Ok(Json(placed))
}

pub async fn create_note_handler(
    Shared(state): Shared<Arc<State>>,
    Path(tree_id): Path<u64>,
    Json(payload): Json<PlaceNote>,
) -> Result<impl IntoResponse, AppError> {
    check_message(&payload.message)?;

    let viewport = Viewport::new(payload.width, payload.height);
    let click = Point::new(payload.x, payload.y);
    check_click(&viewport, click)?;

    ensure_member(&state, payload.user_id, tree_id).await?;

    let (pos_x, pos_y) = viewport.encode(click);

    let new_note = NewNote {
        user_id: payload.user_id,
        message: payload.message,
        pos_x,
        pos_y,
    };
    let created = state.remote.create_note(tree_id, &new_note).await?;

    info!(
        "Note {} pinned on tree {tree_id} at ({pos_x}, {pos_y})",
        created.note_id
    );

    let note = Note {
        note_id: created.note_id,
        message: new_note.message,
        pos_x: Some(pos_x),
        pos_y: Some(pos_y),
        author: None,
        user_id: Some(new_note.user_id),
        is_hidden: false,
    };

    Ok((
        StatusCode::CREATED,
        Json(PlacedNote::place(note, &viewport, 0)),
    ))
}

pub async fn create_tree_handler(
    Shared(state): Shared<Arc<State>>,
    Json(payload): Json<NewTree>,
) -> Result<Json<Tree>, AppError> {
    let new_tree = NewTree {
        tree_name: required_text(&payload.tree_name, "tree name is empty")?,
        ..payload
    };

    let tree = state.remote.create_tree(&new_tree).await?;

    let join = JoinTree {
        user_id: new_tree.owner_id,
        tree_key: tree.tree_key.clone(),
    };

    if let Err(e) = state.remote.join_tree(tree.tree_id, &join).await {
        warn!("Owner {} could not join tree {}: {e}", new_tree.owner_id, tree.tree_id);
    }

    Ok(Json(tree))
}

pub async fn join_tree_handler(
    Shared(state): Shared<Arc<State>>,
    Json(payload): Json<JoinByKey>,
) -> Result<Json<Tree>, AppError> {
    let tree_key = required_text(&payload.tree_key, "tree key is empty")?;

    let tree = state.remote.tree_by_key(&tree_key).await?;

    let join = JoinTree {
        user_id: payload.user_id,
        tree_key: Some(tree_key),
    };
    state.remote.join_tree(tree.tree_id, &join).await?;

    Ok(Json(tree))
}

pub async fn user_trees_handler(
    Shared(state): Shared<Arc<State>>,
    Path(user_id): Path<u64>,
) -> Result<Json<Vec<Tree>>, AppError> {
    Ok(Json(state.remote.user_trees(user_id).await?))
}

pub async fn public_tree_handler(
    Shared(state): Shared<Arc<State>>,
    Path(user_id): Path<u64>,
) -> Result<Json<Tree>, AppError> {
    let trees = state.remote.user_trees(user_id).await?;

    first_public(trees).map(Json).ok_or(AppError::NotFound)
}

pub async fn comments_handler(
    Shared(state): Shared<Arc<State>>,
    Path(note_id): Path<u64>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let comments = state
        .remote
        .note_comments(note_id)
        .await?
        .into_iter()
        .filter(|comment| !comment.is_hidden)
        .collect();

    Ok(Json(comments))
}

pub async fn create_comment_handler(
    Shared(state): Shared<Arc<State>>,
    Path(note_id): Path<u64>,
    Json(payload): Json<NewComment>,
) -> Result<impl IntoResponse, AppError> {
    let comment = NewComment {
        content: required_text(&payload.content, "comment is empty")?,
        ..payload
    };

    state.remote.create_comment(note_id, &comment).await?;

    Ok(StatusCode::CREATED)
}

pub async fn like_handler(
    Shared(state): Shared<Arc<State>>,
    Path(note_id): Path<u64>,
    Json(payload): Json<LikeRequest>,
) -> Result<Json<LikeCount>, AppError> {
    Ok(Json(state.remote.like(note_id, payload.user_id).await?))
}

pub async fn unlike_handler(
    Shared(state): Shared<Arc<State>>,
    Path(note_id): Path<u64>,
    Json(payload): Json<LikeRequest>,
) -> Result<Json<LikeCount>, AppError> {
    Ok(Json(state.remote.unlike(note_id, payload.user_id).await?))
}

pub async fn admin_users_handler(
    Shared(state): Shared<Arc<State>>,
    headers: HeaderMap,
) -> Result<Json<Vec<AdminUser>>, AppError> {
    let admin = admin_id(&headers)?;

    Ok(Json(state.remote.admin_users(admin).await?))
}

pub async fn admin_user_notes_handler(
    Shared(state): Shared<Arc<State>>,
    Path(user_id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<Vec<Note>>, AppError> {
    let admin = admin_id(&headers)?;

    Ok(Json(state.remote.admin_user_notes(admin, user_id).await?))
}

pub async fn admin_user_comments_handler(
    Shared(state): Shared<Arc<State>>,
    Path(user_id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<Vec<Comment>>, AppError> {
    let admin = admin_id(&headers)?;

    Ok(Json(state.remote.admin_user_comments(admin, user_id).await?))
}

pub async fn admin_logs_handler(
    Shared(state): Shared<Arc<State>>,
    headers: HeaderMap,
) -> Result<Json<Vec<AdminLog>>, AppError> {
    let admin = admin_id(&headers)?;

    Ok(Json(state.remote.admin_logs(admin).await?))
}

pub async fn moderate_note_handler(
    Shared(state): Shared<Arc<State>>,
    Path((note_id, action)): Path<(u64, String)>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let admin = admin_id(&headers)?;
    let action = Moderation::parse(&action).ok_or(AppError::MalformedPayload("unknown action"))?;

    state.remote.moderate_note(admin, note_id, action).await?;
    info!("Admin {admin} applied {action} to note {note_id}");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_note_handler(
    Shared(state): Shared<Arc<State>>,
    Path(note_id): Path<u64>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let admin = admin_id(&headers)?;

    state
        .remote
        .moderate_note(admin, note_id, Moderation::Delete)
        .await?;
    info!("Admin {admin} deleted note {note_id}");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn moderate_comment_handler(
    Shared(state): Shared<Arc<State>>,
    Path((comment_id, action)): Path<(u64, String)>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let admin = admin_id(&headers)?;
    let action = Moderation::parse(&action).ok_or(AppError::MalformedPayload("unknown action"))?;

    state
        .remote
        .moderate_comment(admin, comment_id, action)
        .await?;
    info!("Admin {admin} applied {action} to comment {comment_id}");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_comment_handler(
    Shared(state): Shared<Arc<State>>,
    Path(comment_id): Path<u64>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let admin = admin_id(&headers)?;

    state
        .remote
        .moderate_comment(admin, comment_id, Moderation::Delete)
        .await?;
    info!("Admin {admin} deleted comment {comment_id}");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn sanction_user_handler(
    Shared(state): Shared<Arc<State>>,
    Path((user_id, action)): Path<(u64, String)>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let admin = admin_id(&headers)?;
    let action = Sanction::parse(&action).ok_or(AppError::MalformedPayload("unknown action"))?;

    state.remote.sanction_user(admin, user_id, action).await?;
    info!("Admin {admin} applied {action} to user {user_id}");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, time::Duration};

    use axum::{Router, routing::get};
    use board::{
        RemoteBoard,
        constants::{ADMIN_HEADER, OFFSET, SCALE},
    };
    use reqwest::Client;
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use super::*;
    use crate::{config::Config, router};

    type Posted = Arc<Mutex<Vec<Value>>>;

    async fn upstream_user_trees(Path(user_id): Path<u64>) -> Json<Value> {
        if user_id == 1 {
            return Json(json!([{ "tree_id": 10, "tree_name": "Family", "tree_type": "PUBLIC" }]));
        }

        Json(json!([]))
    }

    async fn upstream_tree_notes() -> Json<Value> {
        let center = OFFSET + SCALE / 2;

        Json(json!([
            { "note_id": 1, "message": "ratio", "pos_x": center, "pos_y": center },
            { "note_id": 2, "message": "legacy", "pos_x": 200, "pos_y": 430.4, "is_hidden": 0 },
            { "note_id": 3, "message": "hidden", "pos_x": 10, "pos_y": 10, "is_hidden": "1" },
        ]))
    }

    async fn upstream_create_note(
        Shared(posted): Shared<Posted>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        posted.lock().unwrap().push(body);

        Json(json!({ "note_id": 99 }))
    }

    async fn upstream_like_count(Path(note_id): Path<u64>) -> Result<Json<Value>, StatusCode> {
        if note_id == 1 {
            return Ok(Json(json!({ "likeCount": 5 })));
        }

        Err(StatusCode::INTERNAL_SERVER_ERROR)
    }

    async fn upstream_comments() -> Json<Value> {
        Json(json!([
            { "comment_id": 1, "content": "Merry Christmas", "is_hidden": 0 },
            { "comment_id": 2, "content": "spam", "is_hidden": 1 },
        ]))
    }

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        format!("http://{address}")
    }

    /// Gateway in front of a canned note-board API. Returns the gateway URL and
    /// every note body the gateway forwarded.
    async fn gateway() -> (String, Posted) {
        let posted = Posted::default();

        let upstream = Router::new()
            .route("/users/{user_id}/trees", get(upstream_user_trees))
            .route(
                "/trees/{tree_id}/notes",
                get(upstream_tree_notes).post(upstream_create_note),
            )
            .route("/notes/{note_id}/likes/count", get(upstream_like_count))
            .route("/notes/{note_id}/comments", get(upstream_comments))
            .with_state(posted.clone());
        let upstream_url = serve(upstream).await;

        let config = Config {
            port: 0,
            board_api_url: upstream_url.clone(),
            board_api_timeout: Duration::from_secs(5),
            cors_max_age: Duration::from_secs(60),
            like_fetch_concurrency: 4,
        };
        let remote = RemoteBoard::new(&upstream_url, config.board_api_timeout).unwrap();
        let state = Arc::new(State { config, remote });

        (serve(router(state)).await, posted)
    }

    fn client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    fn place_note(user_id: u64, message: &str, x: f64, y: f64) -> Value {
        json!({
            "user_id": user_id,
            "message": message,
            "x": x,
            "y": y,
            "width": 600.0,
            "height": 800.0,
        })
    }

    #[tokio::test]
    async fn test_notes_placed_for_viewer() {
        let (url, _) = gateway().await;

        let response = client()
            .get(format!("{url}/trees/10/notes?user_id=1&width=330&height=430"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);

        let notes: Vec<Value> = response.json().await.unwrap();
        assert_eq!(notes.len(), 2);

        assert_eq!(notes[0]["note_id"], 1);
        assert_eq!(notes[0]["x"].as_f64(), Some(165.0));
        assert_eq!(notes[0]["y"].as_f64(), Some(215.0));
        assert_eq!(notes[0]["likes"], 5);

        assert_eq!(notes[1]["note_id"], 2);
        assert_eq!(notes[1]["pos_y"], 430);
        assert_eq!(notes[1]["x"].as_f64(), Some(100.0));
        assert_eq!(notes[1]["y"].as_f64(), Some(215.0));
        assert_eq!(notes[1]["likes"], 0);
    }

    #[tokio::test]
    async fn test_notes_need_membership() {
        let (url, _) = gateway().await;

        let response = client()
            .get(format!("{url}/trees/10/notes?user_id=2&width=330&height=430"))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 403);
    }

    #[tokio::test]
    async fn test_create_note() {
        let (url, posted) = gateway().await;

        let response = client()
            .post(format!("{url}/trees/10/notes"))
            .json(&place_note(1, "Happy holidays", 300.0, 400.0))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 201);

        let created: Value = response.json().await.unwrap();
        assert_eq!(created["note_id"], 99);
        assert_eq!(created["x"].as_f64(), Some(300.0));
        assert_eq!(created["y"].as_f64(), Some(400.0));
        assert_eq!(created["likes"], 0);

        let posted = posted.lock().unwrap();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0]["user_id"], 1);
        assert_eq!(posted[0]["message"], "Happy holidays");
        assert_eq!(posted[0]["pos_x"], OFFSET + SCALE / 2);
        assert_eq!(posted[0]["pos_y"], OFFSET + SCALE / 2);
    }

    #[tokio::test]
    async fn test_create_note_rejected_before_forwarding() {
        let (url, posted) = gateway().await;
        let client = client();

        let cases = [
            (place_note(1, "off the tree", 100.0, 100.0), 422),
            (place_note(2, "not joined", 300.0, 400.0), 403),
            (place_note(1, "   ", 300.0, 400.0), 400),
        ];

        for (body, status) in cases {
            let response = client
                .post(format!("{url}/trees/10/notes"))
                .json(&body)
                .send()
                .await
                .unwrap();

            assert_eq!(response.status().as_u16(), status, "{body}");
        }

        assert!(posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hidden_comments_dropped() {
        let (url, _) = gateway().await;

        let comments: Vec<Value> = client()
            .get(format!("{url}/notes/1/comments"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0]["comment_id"], 1);
    }

    #[tokio::test]
    async fn test_admin_routes_checked_locally() {
        let (url, _) = gateway().await;
        let client = client();

        let response = client.get(format!("{url}/admin/logs")).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 401);

        let response = client
            .patch(format!("{url}/admin/notes/1/archive"))
            .header(ADMIN_HEADER, "7")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
    }
}
