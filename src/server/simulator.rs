use super::http::App;
use super::http::refuse;
use crate::DEFAULT_PATCH_VERSION;
use crate::draft::ActionKind;
use crate::draft::Side;
use crate::dto::*;
use crate::reranker::Candidate;
use crate::reranker::DraftContext;
use crate::reranker::Reranker;
use crate::session::DraftMode;
use crate::session::SessionError;
use crate::session::Simulator;
use crate::session::session_id;
use crate::analysis::SeriesContext;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;

const MAX_TEAMS: i64 = 500;

pub async fn list_teams(app: web::Data<App>, query: web::Query<Paging>) -> impl Responder {
    app.sessions.sweep().await;
    match app.repository.teams(query.limit.clamp(1, MAX_TEAMS)).await {
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
        Ok(teams) => HttpResponse::Ok().json(serde_json::json!({ "teams": teams })),
    }
}

pub async fn start_simulator(app: web::Data<App>, body: web::Json<StartSimulator>) -> impl Responder {
    app.sessions.sweep().await;
    let blue = match app.repository.team_context(&body.blue_team_id, Side::Blue).await {
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
        Ok(None) => return HttpResponse::NotFound().body("Team not found"),
        Ok(Some(team)) => team,
    };
    let red = match app.repository.team_context(&body.red_team_id, Side::Red).await {
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
        Ok(None) => return HttpResponse::NotFound().body("Team not found"),
        Ok(Some(team)) => team,
    };
    let enemy_team_id = match body.coaching_side {
        Side::Blue => &body.red_team_id,
        Side::Red => &body.blue_team_id,
    };
    let strategy = match app.enemy.strategy(enemy_team_id).await {
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
        Ok(strategy) => strategy,
    };

    let id = session_id("sim");
    let simulator = Simulator::new(
        &id,
        blue.clone(),
        red.clone(),
        body.coaching_side,
        body.series_length,
        body.draft_mode,
        strategy,
        DEFAULT_PATCH_VERSION,
    );
    let is_our_turn = simulator.is_our_turn();
    let state = ApiState::from(&simulator.state);
    app.sessions.insert_simulator(simulator).await;
    if crate::diagnostics_enabled(false) {
        log::info!("diagnostic capture on for simulator {}", id);
    }

    HttpResponse::Created().json(serde_json::json!({
        "session_id": id,
        "game_number": 1,
        "blue_team": ApiTeam::from(&blue),
        "red_team": ApiTeam::from(&red),
        "draft_state": state,
        "is_our_turn": is_our_turn,
    }))
}

pub async fn simulator_state(app: web::Data<App>, path: web::Path<String>) -> impl Responder {
    let session = match app.sessions.simulator(&path.into_inner()).await {
        Err(e) => return refuse(e),
        Ok(session) => session,
    };
    let mut simulator = session.lock().await;
    simulator.touch();
    let status = match simulator.state.phase.is_complete() {
        true => "game_complete",
        false => "drafting",
    };
    let mut response = serde_json::json!({
        "session_id": simulator.id,
        "status": status,
        "game_number": simulator.current_game,
        "draft_state": ApiState::from(&simulator.state),
        "series_status": series_status(&simulator),
        "fearless_blocked": simulator.fearless_blocked,
    });
    if simulator.state.phase.is_complete() {
        response["blue_comp_with_roles"] =
            serde_json::json!(assignments(&app, &simulator.state.picks(Side::Blue)));
        response["red_comp_with_roles"] =
            serde_json::json!(assignments(&app, &simulator.state.picks(Side::Red)));
    }
    HttpResponse::Ok().json(response)
}

pub async fn end_simulator(app: web::Data<App>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    app.sessions.remove_simulator(&id).await;
    HttpResponse::Ok().json(serde_json::json!({ "status": "ended" }))
}

pub async fn submit_action(
    app: web::Data<App>,
    path: web::Path<String>,
    query: web::Query<ActionOptions>,
    body: web::Json<SubmitAction>,
) -> impl Responder {
    let session = match app.sessions.simulator(&path.into_inner()).await {
        Err(e) => return refuse(e),
        Ok(session) => session,
    };
    let mut simulator = session.lock().await;
    simulator.touch();
    let action = match simulator.submit(&body.champion) {
        Err(e) => return refuse(e),
        Ok(action) => action,
    };
    action_response(&app, &mut simulator, &action, &query, None)
}

pub async fn enemy_action(
    app: web::Data<App>,
    path: web::Path<String>,
    query: web::Query<ActionOptions>,
) -> impl Responder {
    let session = match app.sessions.simulator(&path.into_inner()).await {
        Err(e) => return refuse(e),
        Ok(session) => session,
    };
    let mut simulator = session.lock().await;
    simulator.touch();
    let Some((side, kind)) = simulator.state.next else {
        return refuse(SessionError::InvalidTurn("Draft already complete"));
    };
    if side == simulator.coaching {
        return refuse(SessionError::InvalidTurn("Not enemy's turn"));
    }

    // the AI sees the board from its own bench
    let enemy_side = simulator.enemy_side();
    let enemy_own_picks = simulator.state.picks(enemy_side);
    let coach_picks = simulator.state.picks(simulator.coaching);
    let banned = simulator.state.all_bans();
    let unavailable = simulator.unavailable();
    let (champion, source) = match app
        .enemy
        .act(
            &simulator.strategy,
            kind,
            &enemy_own_picks,
            &coach_picks,
            &banned,
            &unavailable,
        )
        .await
    {
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
        Ok(choice) => choice,
    };
    let action = match simulator.submit_enemy(&champion) {
        Err(e) => return refuse(e),
        Ok(action) => action,
    };
    action_response(&app, &mut simulator, &action, &query, Some(source.as_str()))
}

pub async fn simulator_recommendations(
    app: web::Data<App>,
    path: web::Path<String>,
) -> impl Responder {
    let session = match app.sessions.simulator(&path.into_inner()).await {
        Err(e) => return refuse(e),
        Ok(session) => session,
    };
    let mut simulator = session.lock().await;
    simulator.touch();
    let action_count = simulator.action_count();
    if simulator.state.phase.is_complete() {
        return HttpResponse::Ok().json(serde_json::json!({
            "for_action_count": action_count,
            "phase": simulator.state.phase.to_string(),
            "recommendations": [],
        }));
    }
    let recommendations = recommend(&app, &mut simulator);
    HttpResponse::Ok().json(serde_json::json!({
        "for_action_count": action_count,
        "phase": simulator.state.phase.to_string(),
        "recommendations": recommendations,
    }))
}

pub async fn simulator_evaluation(app: web::Data<App>, path: web::Path<String>) -> impl Responder {
    let session = match app.sessions.simulator(&path.into_inner()).await {
        Err(e) => return refuse(e),
        Ok(session) => session,
    };
    let mut simulator = session.lock().await;
    simulator.touch();
    let action_count = simulator.action_count();
    let our_picks = simulator.state.picks(simulator.coaching);
    let enemy_picks = simulator.state.picks(simulator.enemy_side());
    if our_picks.is_empty() && enemy_picks.is_empty() {
        return HttpResponse::Ok().json(serde_json::json!({
            "for_action_count": action_count,
            "our_evaluation": null,
            "enemy_evaluation": null,
            "matchup_advantage": 1.0,
            "matchup_description": "No picks yet",
        }));
    }
    let versus = app.quality.versus(&our_picks, &enemy_picks);
    HttpResponse::Ok().json(serde_json::json!({
        "for_action_count": action_count,
        "our_evaluation": versus.ours,
        "enemy_evaluation": versus.theirs,
        "matchup_advantage": versus.matchup_advantage,
        "matchup_description": versus.matchup_description,
    }))
}

pub async fn simulator_quality(app: web::Data<App>, path: web::Path<String>) -> impl Responder {
    let session = match app.sessions.simulator(&path.into_inner()).await {
        Err(e) => return refuse(e),
        Ok(session) => session,
    };
    let mut simulator = session.lock().await;
    simulator.touch();
    if !simulator.state.phase.is_complete() {
        return refuse(SessionError::Conflict(
            "Draft quality analysis only available when draft is complete",
        ));
    }
    let our_picks = simulator.state.picks(simulator.coaching);
    let enemy_picks = simulator.state.picks(simulator.enemy_side());
    let report = app
        .quality
        .analyze(&our_picks, &simulator.recommended_picks, &enemy_picks);
    HttpResponse::Ok().json(serde_json::json!({
        "session_id": simulator.id,
        "game_number": simulator.current_game,
        "coaching_side": simulator.coaching,
        "actual_draft": report.actual,
        "recommended_draft": report.recommended,
        "comparison": report.comparison,
    }))
}

pub async fn simulator_insights(
    app: web::Data<App>,
    path: web::Path<String>,
    body: web::Json<Insights>,
) -> impl Responder {
    let session = match app.sessions.simulator(&path.into_inner()).await {
        Err(e) => return refuse(e),
        Ok(session) => session,
    };

    // copy everything the model needs, then release the session before
    // the slow outbound call
    let (context, our_players, enemy_players, series, kind, coaching, action_count) = {
        let mut simulator = session.lock().await;
        simulator.touch();
        let action_count = simulator.action_count();
        if let Err(e) = simulator.check_fresh(body.action_count) {
            return refuse(e);
        }
        if simulator.state.phase.is_complete() {
            return HttpResponse::Ok().json(serde_json::json!({
                "status": "complete",
                "insights": null,
            }));
        }
        let Some((_, kind)) = simulator.state.next else {
            return HttpResponse::Ok().json(serde_json::json!({
                "status": "complete",
                "insights": null,
            }));
        };
        let coaching = simulator.coaching;
        let our_team = simulator.state.team(coaching).clone();
        let enemy_team = simulator.state.team(coaching.flip()).clone();
        let fearless = simulator.fearless_blocked_set().into_iter().collect::<Vec<_>>();
        let mut banned = simulator.state.all_bans();
        banned.extend(fearless.iter().cloned());
        let context = DraftContext {
            phase: simulator.state.phase,
            patch: simulator.state.patch.clone(),
            our_team: our_team.name.clone(),
            enemy_team: enemy_team.name.clone(),
            our_picks: simulator.state.picks(coaching),
            enemy_picks: simulator.state.picks(coaching.flip()),
            banned,
            mode: simulator.mode,
            fearless_blocked: match simulator.mode {
                DraftMode::Fearless => fearless,
                DraftMode::Normal => Vec::new(),
            },
        };
        let series = match simulator.current_game > 1 && !simulator.results.is_empty() {
            true => Some(SeriesContext::build(
                simulator.current_game,
                &simulator.results,
                coaching,
            )),
            false => None,
        };
        (
            context,
            our_team.players,
            enemy_team.players,
            series,
            kind,
            coaching,
            action_count,
        )
    };

    let candidates = match kind {
        ActionKind::Ban => app
            .service
            .bans
            .recommend(
                &context.our_picks,
                &context.enemy_picks,
                &context.banned,
                context.phase,
                Some(enemy_players.as_slice()),
                15,
            )
            .iter()
            .map(Candidate::from)
            .collect::<Vec<_>>(),
        ActionKind::Pick => app
            .service
            .picks
            .recommend(
                &our_players,
                &context.our_picks,
                &context.enemy_picks,
                &context.banned,
                15,
            )
            .iter()
            .map(Candidate::from)
            .collect::<Vec<_>>(),
    };

    let reranker = Reranker::new(app.knowledge.clone(), &body.api_key, None);
    let result = match kind {
        ActionKind::Ban => {
            reranker
                .rerank_bans(&candidates, &context, &our_players, &enemy_players, 5, series.as_ref())
                .await
        }
        ActionKind::Pick => {
            reranker
                .rerank_picks(&candidates, &context, &our_players, &enemy_players, 5, series.as_ref())
                .await
        }
    };

    HttpResponse::Ok().json(serde_json::json!({
        "status": "ready",
        "action_count": action_count,
        "for_team": coaching,
        "draft_analysis": result.draft_analysis,
        "reranked": result.reranked,
        "additional_suggestions": result.additional_suggestions,
    }))
}

pub async fn complete_game(
    app: web::Data<App>,
    path: web::Path<String>,
    body: web::Json<CompleteGame>,
) -> impl Responder {
    let session = match app.sessions.simulator(&path.into_inner()).await {
        Err(e) => return refuse(e),
        Ok(session) => session,
    };
    let mut simulator = session.lock().await;
    simulator.touch();
    let blue_with_roles = assignments(&app, &simulator.state.picks(Side::Blue));
    let red_with_roles = assignments(&app, &simulator.state.picks(Side::Red));
    simulator.complete_game(body.winner);

    let our_picks = simulator.state.picks(simulator.coaching);
    let enemy_picks = simulator.state.picks(simulator.enemy_side());
    let quality = app
        .quality
        .analyze(&our_picks, &simulator.recommended_picks, &enemy_picks);

    HttpResponse::Ok().json(serde_json::json!({
        "series_status": series_status(&simulator),
        "fearless_blocked": simulator.fearless_blocked,
        "next_game_ready": !simulator.series_complete(),
        "blue_comp_with_roles": blue_with_roles,
        "red_comp_with_roles": red_with_roles,
        "draft_quality": {
            "actual_draft": quality.actual,
            "recommended_draft": quality.recommended,
            "comparison": quality.comparison,
        },
    }))
}

pub async fn next_game(app: web::Data<App>, path: web::Path<String>) -> impl Responder {
    let session = match app.sessions.simulator(&path.into_inner()).await {
        Err(e) => return refuse(e),
        Ok(session) => session,
    };
    let mut simulator = session.lock().await;
    simulator.touch();
    let enemy_team_id = match simulator.coaching {
        Side::Blue => simulator.red.id.clone(),
        Side::Red => simulator.blue.id.clone(),
    };
    let strategy = match app.enemy.strategy(&enemy_team_id).await {
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
        Ok(strategy) => strategy,
    };
    match simulator.next_game(strategy) {
        Err(e) => refuse(e),
        Ok(game_number) => HttpResponse::Ok().json(serde_json::json!({
            "game_number": game_number,
            "draft_state": ApiState::from(&simulator.state),
            "fearless_blocked": simulator.fearless_blocked,
        })),
    }
}

// shared pieces

fn series_status(simulator: &Simulator) -> serde_json::Value {
    let (blue, red) = simulator.series_score();
    serde_json::json!({
        "blue_wins": blue,
        "red_wins": red,
        "games_played": simulator.results.len(),
        "series_complete": simulator.series_complete(),
    })
}

fn assignments(app: &App, picks: &[String]) -> Vec<ApiAssignment> {
    app.service
        .flex
        .finalize(picks)
        .into_iter()
        .map(|(role, champion)| ApiAssignment { role, champion })
        .collect()
}

/// ranked suggestions for the coach at the current decision point,
/// recording the top pick per slot for later quality analysis
fn recommend(app: &App, simulator: &mut Simulator) -> serde_json::Value {
    let Some((_, kind)) = simulator.state.next else {
        return serde_json::json!([]);
    };
    let coaching = simulator.coaching;
    let our_picks = simulator.state.picks(coaching);
    let enemy_picks = simulator.state.picks(coaching.flip());
    let mut banned = simulator.state.all_bans();
    banned.extend(simulator.fearless_blocked_set());
    match kind {
        ActionKind::Ban => {
            let enemy_players = simulator.state.team(coaching.flip()).players.clone();
            let bans = app.service.bans.recommend(
                &our_picks,
                &enemy_picks,
                &banned,
                simulator.state.phase,
                Some(enemy_players.as_slice()),
                5,
            );
            serde_json::json!(bans.iter().map(ApiBan::from).collect::<Vec<_>>())
        }
        ActionKind::Pick => {
            let players = simulator.state.team(coaching).players.clone();
            // wider list so the supplemental role-grouped view has depth
            let picks = app
                .service
                .picks
                .recommend(&players, &our_picks, &enemy_picks, &banned, 20);
            if simulator.is_our_turn() {
                simulator.track_recommendations(
                    picks.iter().take(5).map(|p| p.champion.clone()).collect(),
                );
            }
            let grouped = crate::engine::RoleGrouped::from_picks(&picks, 2);
            serde_json::json!({
                "picks": picks.iter().take(5).map(ApiPick::from).collect::<Vec<_>>(),
                "role_grouped": {
                    "view_type": "supplemental",
                    "description": "Alternative view: top picks per unfilled role",
                    "roles": grouped
                        .roles
                        .iter()
                        .map(|(role, picks)| {
                            (
                                role.to_string(),
                                picks.iter().map(ApiPick::from).collect::<Vec<_>>(),
                            )
                        })
                        .collect::<std::collections::BTreeMap<_, _>>(),
                },
            })
        }
    }
}

fn action_response(
    app: &App,
    simulator: &mut Simulator,
    action: &crate::draft::Action,
    options: &ActionOptions,
    source: Option<&str>,
) -> HttpResponse {
    let mut response = serde_json::json!({
        "action": ApiAction::from(action),
        "draft_state": ApiState::from(&simulator.state),
        "is_our_turn": simulator.is_our_turn(),
    });
    if let Some(source) = source {
        response["source"] = serde_json::json!(source);
    }
    if simulator.state.phase.is_complete() {
        response["blue_comp_with_roles"] =
            serde_json::json!(assignments(app, &simulator.state.picks(Side::Blue)));
        response["red_comp_with_roles"] =
            serde_json::json!(assignments(app, &simulator.state.picks(Side::Red)));
    }
    if options.include_recommendations && !simulator.state.phase.is_complete() {
        response["recommendations"] = recommend(app, simulator);
    }
    if options.include_evaluation {
        let our_picks = simulator.state.picks(simulator.coaching);
        let enemy_picks = simulator.state.picks(simulator.enemy_side());
        if !our_picks.is_empty() || !enemy_picks.is_empty() {
            let versus = app.quality.versus(&our_picks, &enemy_picks);
            response["evaluation"] = serde_json::json!({
                "our_evaluation": versus.ours,
                "enemy_evaluation": versus.theirs,
                "matchup_advantage": versus.matchup_advantage,
                "matchup_description": versus.matchup_description,
            });
        }
    }
    HttpResponse::Ok().json(response)
}
