use super::http::App;
use super::http::refuse;
use crate::draft::Side;
use crate::draft::State;
use crate::draft::Team;
use crate::dto::*;
use crate::engine::DraftService;
use crate::reranker::Reranker;
use crate::session::Replay;
use crate::session::session_id;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use std::sync::Arc;

pub async fn list_series(app: web::Data<App>, query: web::Query<Paging>) -> impl Responder {
    let limit = query.limit.clamp(1, 100);
    match app.repository.series_list(limit).await {
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
        Ok(series) => HttpResponse::Ok().json(serde_json::json!({ "series": series })),
    }
}

pub async fn series_games(app: web::Data<App>, path: web::Path<String>) -> impl Responder {
    let series_id = path.into_inner();
    match app.repository.games_for_series(&series_id).await {
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
        Ok(games) if games.is_empty() => {
            HttpResponse::NotFound().body(format!("Series not found: {}", series_id))
        }
        Ok(games) => HttpResponse::Ok().json(serde_json::json!({
            "series_id": series_id,
            "games": games,
        })),
    }
}

pub async fn game_preview(
    app: web::Data<App>,
    path: web::Path<(String, i32)>,
) -> impl Responder {
    let (series_id, game_number) = path.into_inner();
    let info = match app.repository.game_info(&series_id, game_number).await {
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
        Ok(None) => {
            return HttpResponse::NotFound()
                .body(format!("Game not found: {} game {}", series_id, game_number));
        }
        Ok(Some(info)) => info,
    };
    match load_teams(&app, &info.game_id).await {
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
        Ok((blue, red)) => HttpResponse::Ok().json(serde_json::json!({
            "game_id": info.game_id,
            "series_id": info.series_id,
            "game_number": info.game_number,
            "patch": info.patch_version,
            "blue_team": ApiTeam::from(&blue),
            "red_team": ApiTeam::from(&red),
        })),
    }
}

pub async fn start_replay(app: web::Data<App>, body: web::Json<StartReplay>) -> impl Responder {
    let info = match app.repository.game_info(&body.series_id, body.game_number).await {
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
        Ok(None) => {
            return HttpResponse::NotFound().body(format!(
                "Game not found: {} game {}",
                body.series_id, body.game_number
            ));
        }
        Ok(Some(info)) => info,
    };
    let (blue, red) = match load_teams(&app, &info.game_id).await {
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
        Ok(teams) => teams,
    };
    let actions = match app.repository.draft_actions(&info.game_id).await {
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
        Ok(actions) => actions,
    };

    // series score on either side of this game, from game-side team ids
    let games = match app.repository.games_for_series(&body.series_id).await {
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
        Ok(games) => games,
    };
    let mut before = (0usize, 0usize);
    let mut after = (0usize, 0usize);
    for game in &games {
        let Some(winner) = game.winner_team_id.as_deref() else {
            continue;
        };
        let tally = if winner == blue.id {
            Some(Side::Blue)
        } else if winner == red.id {
            Some(Side::Red)
        } else {
            None
        };
        if let Some(side) = tally {
            let slot = |score: &mut (usize, usize)| match side {
                Side::Blue => score.0 += 1,
                Side::Red => score.1 += 1,
            };
            if game.game_number < info.game_number {
                slot(&mut before);
            }
            if game.game_number <= info.game_number {
                slot(&mut after);
            }
        }
    }
    let winner_side = info.winner_team_id.as_deref().and_then(|winner| {
        if winner == blue.id {
            Some(Side::Blue)
        } else if winner == red.id {
            Some(Side::Red)
        } else {
            None
        }
    });

    // era-appropriate meta for historical games
    let tournament_file = match app.repository.tournament_id_for_game(&info.game_id).await {
        Err(_) => None,
        Ok(id) => id.map(|id| format!("replay_meta/{}.json", id)),
    };
    let service = Arc::new(DraftService::new(
        app.knowledge.clone(),
        Some(app.repository.clone()),
        tournament_file.as_deref(),
    ));
    let reranker = body
        .llm_api_key
        .as_deref()
        .filter(|_| body.llm_enabled && body.wait_for_llm)
        .map(|key| Arc::new(Reranker::new(app.knowledge.clone(), key, Some(body.llm_timeout))));

    let patch = info.patch_version.clone().unwrap_or_else(|| "unknown".to_string());
    let id = session_id("replay");
    let root = State::root(
        &info.game_id,
        &body.series_id,
        info.game_number,
        &patch,
        blue.clone(),
        red.clone(),
    );
    let base = State::at(&root, &actions, 0);
    let total_actions = actions.len();
    let (replay, handle) = Replay::create(
        &id,
        base,
        actions,
        body.speed,
        body.delay_seconds,
        before,
        after,
        winner_side,
        service,
        reranker,
    );
    app.sessions.insert_replay(handle).await;
    if crate::diagnostics_enabled(true) {
        log::info!("diagnostic capture on for replay {}", id);
    }
    tokio::spawn(replay.run());

    HttpResponse::Ok().json(serde_json::json!({
        "session_id": id,
        "total_actions": total_actions,
        "blue_team": blue.name,
        "red_team": red.name,
        "patch": info.patch_version,
        "websocket_url": format!("/ws/replay/{}", id),
    }))
}

pub async fn replay_status(app: web::Data<App>, path: web::Path<String>) -> impl Responder {
    match app.sessions.replay(&path.into_inner()).await {
        Err(e) => refuse(e),
        Ok(handle) => HttpResponse::Ok().json(serde_json::json!({
            "session_id": handle.id,
            "status": handle.status().as_str(),
            "current_index": handle.index(),
            "total_actions": handle.total_actions,
            "speed": handle.speed,
        })),
    }
}

pub async fn stop_replay(app: web::Data<App>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match app.sessions.remove_replay(&id).await {
        None => HttpResponse::NotFound().body(format!("Session not found: {}", id)),
        Some(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "session_id": id,
        })),
    }
}

/// teams by the side they actually played, not series-level assignment
async fn load_teams(app: &App, game_id: &str) -> anyhow::Result<(Team, Team)> {
    let mut teams = Vec::new();
    for side in [Side::Blue, Side::Red] {
        let row = app
            .repository
            .team_for_game_side(game_id, side)
            .await?
            .ok_or_else(|| anyhow::anyhow!("failed to load team data for game"))?;
        let players = app.repository.players_for_game_by_side(game_id, side).await?;
        teams.push(Team::new(&row.id, &row.name, side, players));
    }
    let red = teams.pop().expect("red pushed");
    let blue = teams.pop().expect("blue pushed");
    Ok((blue, red))
}
