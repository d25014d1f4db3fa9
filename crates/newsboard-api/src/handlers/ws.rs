use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures::{stream::SplitStream, SinkExt, StreamExt};
use newsboard_board::{encode_event, BoardError, Subscriber, ThreadTarget};
use newsboard_types::{BoardEvent, PostSubmissionMessage};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::error::{ApiError, ApiResult};
use crate::routes::{required, required_index};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WsQuery {
    #[serde(rename = "newspaper-id")]
    pub newspaper_id: Option<String>,
    pub index: Option<String>,
    #[serde(rename = "thread-id")]
    pub thread_id: Option<String>,
}

/// Live thread connection
///
/// On open the server sends a `start` snapshot; afterwards every text frame
/// `{threadId, userName, post}` is submitted to the thread and the resulting
/// `new_post` / `max_new_post` events reach every subscriber.
#[utoipa::path(
    get,
    path = "/ws",
    params(WsQuery),
    responses(
        (status = 101, description = "Switching to the WebSocket protocol"),
        (status = 400, description = "Missing parameter or not an upgrade request")
    ),
    tag = "threads"
)]
pub async fn thread_socket(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WsQuery>,
    ws: Option<WebSocketUpgrade>,
) -> ApiResult<Response> {
    let newspaper_id = required(&query.newspaper_id, "newspaper-id")?;
    let thread_id = required(&query.thread_id, "thread-id")?;
    let index = required_index(&query.index)?;
    let target = ThreadTarget::new(newspaper_id, index, thread_id);

    let ws = ws.ok_or_else(|| ApiError::BadRequest("expected a WebSocket upgrade".to_string()))?;
    Ok(ws.on_upgrade(move |socket| run_connection(socket, state, target)))
}

async fn run_connection(socket: WebSocket, state: Arc<AppState>, target: ThreadTarget) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (subscriber, mut outbound) = state.board.subscriber();
    let connection_id = subscriber.id();

    if let Err(err) = state.board.attach(&target, subscriber.clone()).await {
        tracing::warn!(
            thread_id = %target.thread_id,
            connection_id = %connection_id,
            error = %err,
            "Rejecting connection"
        );
        if let Ok(frame) = encode_event(&BoardEvent::error(err.to_string())) {
            if let Err(e) = ws_sender.send(Message::Text(frame.to_string())).await {
                tracing::debug!(connection_id = %connection_id, "Failed to send rejection: {}", e);
            }
        }
        if let Err(e) = ws_sender.send(policy_close("thread unavailable")).await {
            tracing::debug!(connection_id = %connection_id, "Failed to send close frame: {}", e);
        }
        return;
    }

    // Writer task: forwards queued frames to the socket, closes on eviction
    let watcher = subscriber.clone();
    let mut writer = tokio::spawn(async move {
        loop {
            tokio::select! {
                frame = outbound.recv() => {
                    let Some(frame) = frame else { break };
                    if ws_sender.send(Message::Text(frame.to_string())).await.is_err() {
                        break;
                    }
                }
                _ = watcher.evicted() => {
                    if let Err(e) = ws_sender.send(policy_close("too slow")).await {
                        tracing::debug!(connection_id = %connection_id, "Failed to send close frame: {}", e);
                    }
                    break;
                }
            }
        }
    });

    let reader = read_frames(&mut ws_receiver, &state, &target, &subscriber);

    tokio::select! {
        _ = &mut writer => {}
        _ = reader => {}
    }
    writer.abort();

    state.board.detach(&target.thread_id, connection_id).await;
}

async fn read_frames(
    ws_receiver: &mut SplitStream<WebSocket>,
    state: &AppState,
    target: &ThreadTarget,
    subscriber: &Subscriber,
) {
    while let Some(message) = ws_receiver.next().await {
        match message {
            Ok(Message::Text(text)) => handle_text(state, target, subscriber, &text).await,
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(connection_id = %subscriber.id(), "WebSocket error: {}", e);
                break;
            }
        }
    }
}

async fn handle_text(state: &AppState, target: &ThreadTarget, subscriber: &Subscriber, text: &str) {
    let message: PostSubmissionMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(
                connection_id = %subscriber.id(),
                "Dropping malformed frame: {}",
                e
            );
            return;
        }
    };

    if let Some(thread_id) = message.thread_id.as_deref() {
        if thread_id != target.thread_id {
            reply(state, subscriber, BoardEvent::error("threadId does not match this connection"));
            return;
        }
    }

    let mut submission = target.submission();
    submission.author = message.user_name;
    submission.body = message.post;

    // Admitted posts reach this connection through the broadcast
    let event = match state.board.submit(submission).await {
        Ok(_) => return,
        Err(err @ BoardError::ThreadFull { .. }) => BoardEvent::full(err.to_string()),
        Err(err @ (BoardError::Validation(_) | BoardError::ThreadNotFound { .. })) => {
            BoardEvent::error(err.to_string())
        }
        Err(err) => {
            tracing::error!(thread_id = %target.thread_id, error = %err, "Post submission failed");
            BoardEvent::error("post could not be stored")
        }
    };
    reply(state, subscriber, event);
}

fn reply(state: &AppState, subscriber: &Subscriber, event: BoardEvent) {
    if let Err(err) = state.board.reply(subscriber, &event) {
        tracing::debug!(connection_id = %subscriber.id(), error = %err, "Reply not delivered");
    }
}

fn policy_close(reason: &'static str) -> Message {
    Message::Close(Some(CloseFrame {
        code: close_code::POLICY,
        reason: reason.into(),
    }))
}
