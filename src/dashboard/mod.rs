pub mod session;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::gateway::FetchError;
use crate::view::{assemble, filter_options, Action, FilterCriteria, SortField};
pub use session::Session;

#[derive(Clone)]
pub struct AppState {
    pub session: Session,
}

/// Build the Axum router for the dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/view", get(view_handler))
        .route("/api/filters", post(filters_handler))
        .route("/api/sort/:field", post(sort_handler))
        .route("/api/select", post(select_handler))
        .route("/api/filter-options", get(filter_options_handler))
        .route("/api/predictions/:id", get(prediction_handler))
        .route("/api/events/week", get(week_handler))
        .route("/api/events/weekend", get(weekend_handler))
        .route("/api/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

fn upstream_error(e: FetchError) -> (StatusCode, String) {
    warn!("Prediction service request failed: {}", e);
    (StatusCode::BAD_GATEWAY, e.user_message().to_string())
}

async fn index_handler() -> impl IntoResponse {
    Html(DASHBOARD_HTML)
}

/// GET /api/view
async fn view_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(assemble(&state.session.snapshot().await))
}

/// POST /api/filters  { "sport": "soccer", ... }
async fn filters_handler(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<FilterCriteria>,
) -> impl IntoResponse {
    state.session.dispatch(Action::SetFilters(criteria)).await;
    (
        StatusCode::ACCEPTED,
        Json(assemble(&state.session.snapshot().await)),
    )
}

/// POST /api/sort/:field
async fn sort_handler(
    State(state): State<Arc<AppState>>,
    Path(field): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let field: SortField = field
        .parse()
        .map_err(|e: String| (StatusCode::BAD_REQUEST, e))?;
    state.session.dispatch(Action::ToggleSort(field)).await;
    Ok(Json(assemble(&state.session.snapshot().await)))
}

#[derive(Debug, Deserialize)]
struct SelectRequest {
    event: Option<String>,
}

/// POST /api/select  { "event": "Arsenal vs Chelsea" } or { "event": null }
async fn select_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectRequest>,
) -> impl IntoResponse {
    state.session.dispatch(Action::SelectEvent(req.event)).await;
    Json(assemble(&state.session.snapshot().await))
}

/// GET /api/filter-options
async fn filter_options_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.session.snapshot().await;
    Json(filter_options(snapshot.predictions()))
}

/// GET /api/predictions/:id
async fn prediction_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match state.session.source().fetch_prediction(&id).await {
        Ok(Some(p)) => Ok(Json(p)),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Prediction not found".to_string())),
        Err(e) => Err(upstream_error(e)),
    }
}

/// GET /api/events/week
async fn week_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .session
        .source()
        .fetch_week_events()
        .await
        .map(Json)
        .map_err(upstream_error)
}

/// GET /api/events/weekend
async fn weekend_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .session
        .source()
        .fetch_weekend_events()
        .await
        .map(Json)
        .map_err(upstream_error)
}

/// GET /api/health
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let backend = match state.session.source().health().await {
        Ok(ok) => ok,
        Err(e) => {
            warn!("Backend health check failed: {}", e);
            false
        }
    };
    Json(serde_json::json!({ "status": "ok", "backend": backend }))
}

/// Embedded single-file dashboard (HTML + CSS + JS)
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Sports Predictor</title>
<style>
  :root { --bg: #f8fafc; --card: #fff; --border: #e2e8f0; --text: #0f172a; --muted: #475569; --accent: #2563eb; --red: #b91c1c; }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; }
  .card { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1rem; }
  .meta { color: var(--muted); font-size: .85rem; margin-top: .2rem; }
  .filters { display: flex; gap: .75rem; flex-wrap: wrap; }
  .filters label { display: grid; gap: .25rem; font-size: .8rem; color: var(--muted); }
  .filters input, .filters select { padding: .4rem .6rem; border: 1px solid var(--border); border-radius: 6px; }
  table { width: 100%; border-collapse: collapse; }
  th { padding: .6rem; text-align: left; font-size: .75rem; text-transform: uppercase; color: var(--muted); border-bottom: 1px solid var(--border); }
  th.sortable { cursor: pointer; }
  td { padding: .55rem .6rem; font-size: .88rem; border-bottom: 1px solid var(--border); }
  tbody tr { cursor: pointer; }
  .badge { padding: .15rem .55rem; border-radius: 20px; font-size: .75rem; font-weight: 600; }
  .badge.low { background: #fee2e2; color: #991b1b; }
  .badge.medium { background: #fef3c7; color: #92400e; }
  .badge.high { background: #dcfce7; color: #166534; }
  .error { color: var(--red); }
  .empty { color: var(--muted); text-align: center; padding: 1.5rem; }
  button { border: none; background: var(--border); border-radius: 8px; padding: .45rem .75rem; cursor: pointer; }
</style>
</head>
<body>
<header>
  <p class="meta">Local-first sports intelligence</p>
  <h1>Sports Predictor</h1>
</header>
<main>
  <div class="card">
    <div class="filters">
      <label>Sport <input id="f-sport" placeholder="e.g. soccer"></label>
      <label>League <input id="f-league" placeholder="e.g. EPL"></label>
      <label>Market type <input id="f-market_type" placeholder="moneyline, player prop"></label>
      <label>Confidence
        <select id="f-confidence">
          <option value="">Any</option><option value="low">Low</option>
          <option value="medium">Medium</option><option value="high">High</option>
        </select>
      </label>
    </div>
  </div>
  <div class="card">
    <div id="status"></div>
    <table>
      <thead><tr>
        <th>Event</th><th class="sortable" data-sort="sport">Sport</th><th class="sortable" data-sort="league">League</th>
        <th>Market</th><th class="sortable" data-sort="probability">Probability</th><th>Confidence</th><th>Source mix</th>
      </tr></thead>
      <tbody id="rows"></tbody>
    </table>
  </div>
  <div class="card" id="detail" hidden></div>
</main>
<script>
const esc = (s) => String(s ?? '').replace(/[&<>"']/g, (c) => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'}[c]));
const post = (url, body) => fetch(url, { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify(body ?? {}) }).then((r) => r.json());

function render(view) {
  const status = document.getElementById('status');
  status.innerHTML = view.loading ? '<p class="meta">Loading predictions…</p>' : view.error ? `<p class="error">${esc(view.error)}</p>` : '';
  const rows = document.getElementById('rows');
  if (view.loading || view.error) { rows.innerHTML = ''; }
  else if (!view.table.length) { rows.innerHTML = '<tr><td colspan="7" class="empty">No predictions</td></tr>'; }
  else {
    rows.innerHTML = view.table.map((p) => `<tr data-event="${esc(p.event)}">
      <td>${esc(p.event)}</td><td>${esc(p.sport)}</td><td>${esc(p.league)}</td><td>${esc(p.market_type)}</td>
      <td>${esc(p.probability_display)}</td><td><span class="${esc(p.badge.class)}">${esc(p.badge.tier)}</span></td>
      <td><small>${esc(p.source_mix_label)}</small></td></tr>`).join('');
  }
  const detail = document.getElementById('detail');
  if (!view.detail) { detail.hidden = true; return; }
  const d = view.detail;
  detail.hidden = false;
  detail.innerHTML = `<div style="display:flex;justify-content:space-between">
      <div><p class="meta">${esc(d.sport)} · ${esc(d.league)}</p><h3>${esc(d.event)}</h3><p class="meta">${esc(d.event_date_display)}</p></div>
      <button id="close">Close</button></div>` +
    d.predictions.map((p) => `<div class="card" style="margin-top:.75rem"><strong>${esc(p.prediction)}</strong>
      <p class="meta">${esc(p.market_type)} · ${esc(p.probability_display)} · confidence ${esc(p.badge.tier)}</p>
      <p class="meta">Source mix: ${esc(p.source_mix_label)}</p>
      <ul>${p.factors.map((f) => `<li>${esc(f)}</li>`).join('')}</ul></div>`).join('');
  document.getElementById('close').onclick = () => post('/api/select', { event: null }).then(render);
}

const refresh = () => fetch('/api/view').then((r) => r.json()).then((v) => { render(v); if (v.loading) setTimeout(refresh, 300); });

function readFilters() {
  const f = {};
  for (const key of ['sport', 'league', 'market_type', 'confidence']) {
    const v = document.getElementById('f-' + key).value;
    if (v) f[key] = v;
  }
  return f;
}

document.querySelectorAll('.filters input, .filters select').forEach((el) =>
  el.addEventListener('change', () => post('/api/filters', readFilters()).then((v) => { render(v); refresh(); })));
document.querySelectorAll('th.sortable').forEach((th) =>
  th.addEventListener('click', () => post('/api/sort/' + th.dataset.sort).then(render)));
document.getElementById('rows').addEventListener('click', (e) => {
  const tr = e.target.closest('tr[data-event]');
  if (tr) post('/api/select', { event: tr.dataset.event }).then(render);
});
refresh();
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::session::tests::FakeSource;
    use super::*;

    async fn spawn_dashboard() -> (String, Session) {
        let session = Session::new(Arc::new(FakeSource));
        let app = router(AppState {
            session: session.clone(),
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), session)
    }

    async fn settle(session: &Session) {
        while session.snapshot().await.is_loading() {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }

    #[tokio::test]
    async fn test_filter_sort_select_flow() {
        let (base, session) = spawn_dashboard().await;
        let http = reqwest::Client::new();

        let resp = http
            .post(format!("{}/api/filters", base))
            .json(&serde_json::json!({ "sport": "soccer" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::ACCEPTED);
        settle(&session).await;

        let view: serde_json::Value = http
            .post(format!("{}/api/sort/sport", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(view["sort"]["field"], "sport");
        assert_eq!(view["sort"]["direction"], "asc");
        assert_eq!(view["table"][0]["id"], "soccer-1");
        assert_eq!(view["table"][0]["badge"]["class"], "badge medium");

        let view: serde_json::Value = http
            .post(format!("{}/api/select", base))
            .json(&serde_json::json!({ "event": "soccer event" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(view["detail"]["event"], "soccer event");
        assert_eq!(view["events"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_sort_field_rejected() {
        let (base, _) = spawn_dashboard().await;
        let resp = reqwest::Client::new()
            .post(format!("{}/api/sort/market_type", base))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_prediction_is_404() {
        let (base, _) = spawn_dashboard().await;
        let found = reqwest::get(format!("{}/api/predictions/known", base))
            .await
            .unwrap();
        assert_eq!(found.status(), reqwest::StatusCode::OK);
        let missing = reqwest::get(format!("{}/api/predictions/unknown", base))
            .await
            .unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_serves_html() {
        let (base, _) = spawn_dashboard().await;
        let body = reqwest::get(&base).await.unwrap().text().await.unwrap();
        assert!(body.contains("Sports Predictor"));
    }
}
