//! Single binary relay server: WebSocket snapshot relay plus a small REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, BROADCAST_CAPACITY.

use actix_web::{
    get, post,
    web::{self, Data, Json},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use actix_ws::{CloseReason, Message, MessageStream, Session};
use bracket_relay::{
    is_complete, standings, Action, PendingWinner, Relay, ServerConfig, Standings,
    TournamentError, TournamentState, Transition,
};
use serde::Serialize;
use uuid::Uuid;

/// The one relay shared by every connection and handler.
type AppState = Data<Relay>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActionResponse {
    tournament: TournamentState,
    pending_winner: Option<PendingWinner>,
    complete: bool,
    standings: Standings,
}

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Bracket relay is running")
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-relay",
    })
}

/// Connected clients and a summary of the current snapshot.
#[get("/api/status")]
async fn api_status(state: AppState) -> HttpResponse {
    HttpResponse::Ok().json(state.status())
}

/// Current tournament snapshot.
#[get("/api/tournament")]
async fn api_get_tournament(state: AppState) -> HttpResponse {
    HttpResponse::Ok().json(state.snapshot())
}

/// Apply an action to the current snapshot and relay the result like any client submission.
#[post("/api/tournament/actions")]
async fn api_apply_action(state: AppState, body: Json<Action>) -> HttpResponse {
    action_reply(&body, state.apply_action(&body))
}

/// 200 with the new snapshot, or 400 with the refusal reason.
fn action_reply(action: &Action, result: Result<Transition, TournamentError>) -> HttpResponse {
    match result {
        Ok(transition) => HttpResponse::Ok().json(ActionResponse {
            complete: is_complete(&transition.state),
            standings: standings(&transition.state),
            tournament: transition.state,
            pending_winner: transition.pending_winner,
        }),
        Err(e) => {
            log::debug!("Rejected {:?}: {}", action, e);
            HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}

/// Upgrade to a WebSocket speaking `update` / `tournament` envelopes.
#[get("/ws")]
async fn ws_connect(
    state: AppState,
    req: HttpRequest,
    body: web::Payload,
) -> actix_web::Result<HttpResponse> {
    let (response, session, msg_stream) = actix_ws::handle(&req, body)?;
    actix_web::rt::spawn(run_client(Uuid::new_v4(), state, session, msg_stream));
    Ok(response)
}

async fn send_frames(session: &mut Session, frames: Vec<String>) -> bool {
    for frame in frames {
        if session.text(frame).await.is_err() {
            return false;
        }
    }
    true
}

/// Per-connection loop: relay inbound frames, forward broadcasts, resync on lag.
async fn run_client(
    client_id: Uuid,
    relay: AppState,
    mut session: Session,
    mut msg_stream: MessageStream,
) {
    // Subscribe before the greeting so nothing submitted in between is missed.
    let mut updates = relay.subscribe();
    let connected = relay.client_connected();
    log::info!("Client {} connected ({} connected)", client_id, connected);

    let mut close_reason: Option<CloseReason> = None;
    if send_frames(&mut session, relay.greeting()).await {
        loop {
            tokio::select! {
                inbound = msg_stream.recv() => match inbound {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(e) = relay.handle_inbound(&text) {
                            log::warn!("Client {}: {}", client_id, e);
                        }
                    }
                    Some(Ok(Message::Ping(bytes))) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(reason))) => {
                        close_reason = reason;
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        log::warn!("Client {} protocol error: {}", client_id, e);
                        break;
                    }
                    None => break,
                },
                outbound = updates.recv() => {
                    let Some(frames) = relay.frames_for(outbound) else {
                        break;
                    };
                    if !send_frames(&mut session, frames).await {
                        log::debug!("Client {} send failed", client_id);
                        break;
                    }
                }
            }
        }
    }

    let _ = session.close(close_reason).await;
    let remaining = relay.client_disconnected();
    log::info!("Client {} disconnected ({} connected)", client_id, remaining);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let bind = config.bind_addr();
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(Relay::new(config.broadcast_capacity));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(hello)
            .service(api_health)
            .service(api_status)
            .service(api_get_tournament)
            .service(api_apply_action)
            .service(ws_connect)
    })
    .bind(bind)?
    .run()
    .await
}
