use crate::domain::outcome::Outcome;
use crate::domain::params::RequestParams;
use crate::http::session::session_id;
use crate::repo::session_store::{Session, FLASH};
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use std::collections::HashMap;

type Fields = HashMap<String, String>;

fn open_session(state: &AppState, headers: &HeaderMap) -> Session {
    Session::new(state.sessions.clone(), session_id(headers, &state.session_cookie))
}

async fn respond(state: &AppState, session: &Session, outcome: Outcome) -> Response {
    if let Some(flash) = &outcome.flash {
        match serde_json::to_string(flash) {
            Ok(raw) => session.put(FLASH, &raw).await,
            Err(e) => tracing::warn!(error = %e, "could not encode flash message"),
        }
    }
    Redirect::to(&outcome.target.location(&state.routes)).into_response()
}

pub async fn pay(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<Fields>,
    form: Option<Form<Fields>>,
) -> Response {
    let session = open_session(&state, &headers);
    let params = RequestParams::merged(query, form.map(|Form(f)| f));
    let outcome = state.checkout_service.start_payment(&session, &params).await;
    respond(&state, &session, outcome).await
}

pub async fn success(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<Fields>,
    form: Option<Form<Fields>>,
) -> Response {
    let session = open_session(&state, &headers);
    let params = RequestParams::merged(query, form.map(|Form(f)| f));
    let outcome = state.callback_service.handle_success(&session, &params).await;
    respond(&state, &session, outcome).await
}

pub async fn fail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<Fields>,
    form: Option<Form<Fields>>,
) -> Response {
    let session = open_session(&state, &headers);
    let params = RequestParams::merged(query, form.map(|Form(f)| f));
    let outcome = state.callback_service.handle_fail(&session, &params).await;
    respond(&state, &session, outcome).await
}

pub async fn cancel(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<Fields>,
    form: Option<Form<Fields>>,
) -> Response {
    let session = open_session(&state, &headers);
    let params = RequestParams::merged(query, form.map(|Form(f)| f));
    let outcome = state.callback_service.handle_cancel(&session, &params).await;
    respond(&state, &session, outcome).await
}
