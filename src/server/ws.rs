use super::http::App;
use crate::dto::ApiReplayFrame;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::web;
use futures::StreamExt;

/// streams a replay session's events as JSON frames. text messages from
/// the client drive the pacing: pause, resume, stop.
pub async fn replay_stream(
    req: HttpRequest,
    stream: web::Payload,
    app: web::Data<App>,
    path: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let id = path.into_inner();
    let Ok(handle) = app.sessions.replay(&id).await else {
        return Ok(HttpResponse::NotFound().body(format!("Session not found: {}", id)));
    };
    let Some(mut events) = handle.take_events() else {
        return Ok(HttpResponse::Conflict().body("replay already has a listener"));
    };

    let (response, mut session, mut messages) = actix_ws::handle(&req, stream)?;
    let app = app.clone();
    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    let frame = ApiReplayFrame::from(&event);
                    let Ok(text) = serde_json::to_string(&frame) else { continue };
                    if session.text(text).await.is_err() {
                        break;
                    }
                }
                message = messages.next() => {
                    match message {
                        Some(Ok(actix_ws::Message::Text(text))) => {
                            match text.trim() {
                                "pause" => handle.pause(),
                                "resume" => handle.resume(),
                                "stop" => handle.stop(),
                                _ => {}
                            }
                        }
                        Some(Ok(actix_ws::Message::Close(_))) | None => break,
                        _ => {}
                    }
                }
            }
        }
        handle.stop();
        app.sessions.remove_replay(&handle.id).await;
        let _ = session.close(None).await;
    });
    Ok(response)
}
