use super::replay::*;
use super::simulator::*;
use super::ws::replay_stream;
use crate::analysis::QualityAnalyzer;
use crate::database::Repository;
use crate::engine::DraftService;
use crate::knowledge::Knowledge;
use crate::session::EnemyService;
use crate::session::SessionError;
use crate::session::Sessions;
use actix_cors::Cors;
use actix_web::App as ActixApp;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;

/// everything the route handlers share. knowledge and the repository are
/// immutable; sessions serialize their own mutation.
pub struct App {
    pub knowledge: Arc<Knowledge>,
    pub repository: Arc<Repository>,
    pub sessions: Sessions,
    /// current-meta service used by simulator sessions; replays build
    /// their own with era-appropriate tournament data
    pub service: Arc<DraftService>,
    pub enemy: EnemyService,
    pub quality: QualityAnalyzer,
}

pub struct Server;

impl Server {
    pub async fn run(
        knowledge: Arc<Knowledge>,
        repository: Arc<Repository>,
    ) -> Result<(), std::io::Error> {
        let app = web::Data::new(App {
            service: Arc::new(DraftService::new(
                knowledge.clone(),
                Some(repository.clone()),
                None,
            )),
            enemy: EnemyService::new(knowledge.clone(), repository.clone()),
            quality: QualityAnalyzer::from(knowledge.clone()),
            sessions: Sessions::default(),
            knowledge,
            repository,
        });
        log::info!("starting HTTP server");
        HttpServer::new(move || {
            ActixApp::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(app.clone())
                .route("/api/series", web::get().to(list_series))
                .route("/api/series/{series_id}/games", web::get().to(series_games))
                .route(
                    "/api/game/preview/{series_id}/{game_number}",
                    web::get().to(game_preview),
                )
                .route("/api/replay/start", web::post().to(start_replay))
                .route("/api/replay/{session_id}", web::get().to(replay_status))
                .route("/api/replay/{session_id}", web::delete().to(stop_replay))
                .route("/ws/replay/{session_id}", web::get().to(replay_stream))
                .route("/api/simulator/teams", web::get().to(list_teams))
                .route("/api/simulator/sessions", web::post().to(start_simulator))
                .route(
                    "/api/simulator/sessions/{session_id}",
                    web::get().to(simulator_state),
                )
                .route(
                    "/api/simulator/sessions/{session_id}",
                    web::delete().to(end_simulator),
                )
                .route(
                    "/api/simulator/sessions/{session_id}/actions",
                    web::post().to(submit_action),
                )
                .route(
                    "/api/simulator/sessions/{session_id}/actions/enemy",
                    web::post().to(enemy_action),
                )
                .route(
                    "/api/simulator/sessions/{session_id}/recommendations",
                    web::get().to(simulator_recommendations),
                )
                .route(
                    "/api/simulator/sessions/{session_id}/evaluation",
                    web::get().to(simulator_evaluation),
                )
                .route(
                    "/api/simulator/sessions/{session_id}/draft-quality",
                    web::get().to(simulator_quality),
                )
                .route(
                    "/api/simulator/sessions/{session_id}/insights",
                    web::post().to(simulator_insights),
                )
                .route(
                    "/api/simulator/sessions/{session_id}/games/complete",
                    web::post().to(complete_game),
                )
                .route(
                    "/api/simulator/sessions/{session_id}/games/next",
                    web::post().to(next_game),
                )
        })
        .workers(6)
        .bind("127.0.0.1:8888")?
        .run()
        .await
    }
}

/// session refusals map onto plain HTTP refusals; the session survives
pub fn refuse(error: SessionError) -> HttpResponse {
    match &error {
        SessionError::NotFound(_) => HttpResponse::NotFound().body(error.to_string()),
        SessionError::Stale { .. } => HttpResponse::Ok().json(serde_json::json!({
            "status": "stale",
            "message": error.to_string(),
        })),
        SessionError::Timeout | SessionError::Parse(_) => {
            HttpResponse::InternalServerError().body(error.to_string())
        }
        _ => HttpResponse::BadRequest().body(error.to_string()),
    }
}
