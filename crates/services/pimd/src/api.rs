use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
};
use pim_auth::auth_body::AuthBody;
use pim_web::{
    ctx::{
        Ctx,
        resolver::{AUTH_TOKEN_COOKIE, login_user, mw_ctx_resolver},
    },
    mw_auth::{mw_require_admin_key, mw_require_auth},
    particles::{self, ParticleApi, ParticleList, ParticlePatch, ParticlePost, ParticleViews},
    user::{ChangePasswordRequest, PimCredentials, PimUserApi, ResetPasswordRequest},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tower_cookies::{CookieManagerLayer, Cookie, Cookies};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::prelude::*;
use crate::state::AppState;
use pim_web::prelude::Result as PimWebResult;

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/change-password", post(change_password))
        .route("/auth/delete", delete(delete_user));

    let session_routes = Router::new()
        .route("/auth/user/{username}", get(get_user))
        .route("/particles", get(list_particles).post(create_particle))
        .route("/particles/search", get(search_particles))
        .route(
            "/particles/{id}",
            get(get_particle).put(edit_particle).delete(delete_particle),
        )
        .route("/particles/{id}/view", post(record_view))
        .route_layer(middleware::from_fn(mw_require_auth));

    let admin_routes = Router::new()
        .route("/auth/reset-password", post(reset_password))
        .route_layer(middleware::from_fn_with_state(
            state.admin_key.clone(),
            mw_require_admin_key,
        ));

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            mw_ctx_resolver,
        ))
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

pub async fn setup_api(app: Router, addr: SocketAddr) -> Result<JoinHandle<Result<()>>> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await?;
        Ok(())
    });

    Ok(handle)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<PimCredentials>,
) -> PimWebResult<(StatusCode, Json<PimUserApi>)> {
    let id = state.auth.register(&payload.username, &payload.password)?;
    let user = PimUserApi {
        id,
        username: payload.username,
    };
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<PimCredentials>,
) -> PimWebResult<Json<AuthBody>> {
    Ok(Json(login_user(&state.auth, &payload, &cookies)?))
}

async fn change_password(
    State(state): State<AppState>,
    Json(payload): Json<ChangePasswordRequest>,
) -> PimWebResult<()> {
    state.auth.change_password(
        &payload.username,
        &payload.old_password,
        &payload.new_password,
    )
}

async fn delete_user(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<PimCredentials>,
) -> PimWebResult<()> {
    state.auth.delete_user(&payload.username, &payload.password)?;
    cookies.remove(Cookie::from(AUTH_TOKEN_COOKIE));
    Ok(())
}

async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> PimWebResult<()> {
    state
        .auth
        .reset_password(&payload.username, &payload.new_password)
}

async fn get_user(
    State(state): State<AppState>,
    _ctx: Ctx,
    Path(username): Path<String>,
) -> PimWebResult<Json<PimUserApi>> {
    Ok(Json(state.auth.get_user(&username)?))
}

async fn list_particles(
    State(state): State<AppState>,
    ctx: Ctx,
) -> PimWebResult<Json<ParticleList>> {
    Ok(Json(particles::list_particles(
        ctx.user_id,
        state.connection(),
    )?))
}

async fn create_particle(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(payload): Json<ParticlePost>,
) -> PimWebResult<(StatusCode, Json<ParticleApi>)> {
    let particle = particles::create_particle(ctx.user_id, payload, state.connection())?;
    Ok((StatusCode::CREATED, Json(particle)))
}

async fn search_particles(
    State(state): State<AppState>,
    ctx: Ctx,
    Query(query): Query<SearchQuery>,
) -> PimWebResult<Json<ParticleList>> {
    Ok(Json(particles::search_particles(
        ctx.user_id,
        &query.q,
        state.connection(),
    )?))
}

async fn get_particle(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<i32>,
) -> PimWebResult<Json<ParticleApi>> {
    Ok(Json(particles::fetch_particle(
        ctx.user_id,
        id,
        state.connection(),
    )?))
}

async fn edit_particle(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<i32>,
    Json(payload): Json<ParticlePatch>,
) -> PimWebResult<Json<ParticleApi>> {
    Ok(Json(particles::edit_particle(
        ctx.user_id,
        id,
        payload,
        state.connection(),
    )?))
}

async fn delete_particle(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<i32>,
) -> PimWebResult<()> {
    particles::delete_particle(ctx.user_id, id, state.connection())
}

async fn record_view(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<i32>,
) -> PimWebResult<Json<ParticleViews>> {
    Ok(Json(particles::record_view(
        ctx.user_id,
        id,
        state.connection(),
    )?))
}
