use axum::{Json, debug_handler, extract::State};
use serde::Serialize;

use crate::{AppError, AppResult, res::Envelope};

use super::{Room, Rooms};

#[derive(Debug, Serialize)]
pub(crate) struct NewRoom {
    room: Room,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn new_room(State(rooms): State<Rooms>) -> AppResult<Json<Envelope<NewRoom>>> {
    let room = rooms
        .create()
        .await
        .map_err(|err| AppError::internal("failed to create room", err))?;

    Ok(Json(Envelope::new("room created successfully", NewRoom { room })))
}
