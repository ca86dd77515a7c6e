//! Notification WebSocket - 通知实时推送
//!
//! GET /api/notifications/ws?token=<JWT>
//! Auth: 浏览器 WebSocket 不支持自定义 headers，令牌可走 query parameter
//! (由认证中间件处理)
//!
//! 协议 (Server → Client, JSON):
//! - `snapshot` - 连接建立后的完整列表
//! - `feed_updated` - 列表变化后的完整列表
//!
//! Client frames are ignored apart from close.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Extension, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use shared::RealtimeEvent;
use tokio::sync::broadcast;
use tokio::time::Duration;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::realtime::{FeedUpdate, NotificationFeed};
use crate::services::notifications;

const PING_INTERVAL: Duration = Duration::from_secs(30);

/// GET /api/notifications/ws
pub async fn handle_notification_ws(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let user_id = current_user.id;
    ws.on_upgrade(move |socket| notification_ws_session(socket, state, user_id))
}

async fn notification_ws_session(socket: WebSocket, state: ServerState, user_id: String) {
    let (mut sink, mut stream) = socket.split();

    // 先订阅再加载，避免加载期间的通知丢失 (重复由 feed 去重)
    let mut hub_rx = state.hub.subscribe(&user_id);

    let initial = match notifications::list(&state.pool, &user_id).await {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "Failed to load notifications for WS");
            let _ = sink.send(Message::Close(None)).await;
            drop(hub_rx);
            state.hub.release(&user_id);
            return;
        }
    };

    tracing::info!(user_id = %user_id, "Notification WS connected");

    let feed = NotificationFeed::spawn(initial.clone());
    let mut feed_rx = feed.watch();

    if send_event(&mut sink, &RealtimeEvent::snapshot(initial)).await.is_err() {
        drop(hub_rx);
        state.hub.release(&user_id);
        return;
    }

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = hub_rx.recv() => {
                match event {
                    Ok(hub_event) => {
                        if !feed.push(hub_event).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(user_id = %user_id, lagged = n, "Notification subscriber lagged, reloading");
                        // 重新订阅以获取从当前位置开始的新 receiver
                        hub_rx = state.hub.subscribe(&user_id);
                        match notifications::list(&state.pool, &user_id).await {
                            Ok(list) => {
                                if !feed.push(FeedUpdate::Reset(list)).await {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::warn!(user_id = %user_id, error = %e, "Failed to reload notifications");
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            changed = feed_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let list = feed_rx.borrow_and_update().clone();
                if send_event(&mut sink, &RealtimeEvent::feed_updated(list)).await.is_err() {
                    break;
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }

            _ = state.shutdown.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }
        }
    }

    drop(hub_rx);
    state.hub.release(&user_id);
    tracing::info!(user_id = %user_id, "Notification WS disconnected");
}

async fn send_event<S>(sink: &mut S, event: &RealtimeEvent) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(event).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
