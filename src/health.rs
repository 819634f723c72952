use axum::{Json, debug_handler, extract::State};
use serde_json::{Value, json};

use crate::ServiceName;

#[debug_handler(state = crate::AppState)]
pub async fn health(State(ServiceName(service)): State<ServiceName>) -> Json<Value> {
    Json(json!({ "message": format!("{service} is alive") }))
}
