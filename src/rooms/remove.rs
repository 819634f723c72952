use axum::{
    Json, debug_handler,
    extract::{Path, State},
};

use crate::{AppError, AppResult, res::Envelope};

use super::Rooms;

#[debug_handler(state = crate::AppState)]
pub(crate) async fn remove_room(
    State(rooms): State<Rooms>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<()>>> {
    match rooms.delete(&id).await {
        Ok(true) => Ok(Json(Envelope::message("room deleted successfully"))),
        Ok(false) => Err(AppError::not_found("room not found")),
        Err(err) => Err(AppError::internal("failed to delete room", err)),
    }
}
