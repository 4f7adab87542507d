use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use driver_log_core::application::entry_form::{EntryFormInput, FormErrors, FORM_DATE_FORMAT};
use driver_log_core::domain::driver::session::DriverSession;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

use crate::notice::Notice;
use crate::pages;
use crate::state::AppState;

/// Driver identity, both as the welcome form body and as the entry screen's query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionParams {
    pub username: String,
    pub car_number: String,
}

impl SessionParams {
    fn session(&self) -> Option<DriverSession> {
        DriverSession::new(&self.username, &self.car_number).ok()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome).post(start_session))
        .route("/data-entry", get(entry_form).post(submit_entry))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}

async fn welcome() -> Html<String> {
    Html(pages::welcome_page("", "", &[]))
}

#[instrument(skip_all, fields(username = %params.username))]
async fn start_session(Form(params): Form<SessionParams>) -> Response {
    match DriverSession::new(&params.username, &params.car_number) {
        Ok(session) => Redirect::to(&pages::entry_path(&session)).into_response(),
        Err(errors) => {
            warn!(?errors, "Rejected driver session");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(pages::welcome_page(
                    &params.username,
                    &params.car_number,
                    &errors,
                )),
            )
                .into_response()
        }
    }
}

fn blank_form(state: &AppState) -> EntryFormInput {
    EntryFormInput {
        date: (state.today)().format(FORM_DATE_FORMAT).to_string(),
        ..Default::default()
    }
}

async fn entry_form(
    State(state): State<AppState>,
    Query(params): Query<SessionParams>,
) -> Response {
    let Some(session) = params.session() else {
        return Redirect::to("/").into_response();
    };

    Html(pages::entry_page(
        &session,
        &blank_form(&state),
        &FormErrors::default(),
        None,
        (state.today)(),
    ))
    .into_response()
}

#[instrument(skip_all, fields(username = %params.username))]
async fn submit_entry(
    State(state): State<AppState>,
    Query(params): Query<SessionParams>,
    Form(input): Form<EntryFormInput>,
) -> Response {
    let Some(session) = params.session() else {
        return Redirect::to("/").into_response();
    };
    let today = (state.today)();

    let record = match input.validate(&session, today) {
        Ok(record) => record,
        Err(errors) => {
            warn!(?errors, "Rejected entry form");
            let page = pages::entry_page(&session, &input, &errors, None, today);
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response();
        }
    };

    match state.sheet_client.submit(&session, &record).await {
        Ok(row) => {
            info!(%row, entry_type = %record.entry_type(), "Entry saved");
            let page = pages::entry_page(
                &session,
                &blank_form(&state),
                &FormErrors::default(),
                Some(Notice::SAVED),
                today,
            );
            Html(page).into_response()
        }
        Err(report) => {
            error!("Error writing to sheet: {report:?}");
            let (status, notice) = Notice::for_failure(report.current_context());
            let page =
                pages::entry_page(&session, &input, &FormErrors::default(), Some(notice), today);
            (status, Html(page)).into_response()
        }
    }
}
