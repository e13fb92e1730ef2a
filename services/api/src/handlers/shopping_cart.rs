use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};

use foodgram_auth_types::identity::Identity;

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::shopping_cart::DownloadShoppingListUseCase;

pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

// ── GET /api/recipes/download_shopping_cart/ ─────────────────────────────────

pub async fn download_shopping_cart(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = DownloadShoppingListUseCase {
        marks: state.mark_repo(),
    };
    let list = usecase.execute(identity.user_id).await?;
    let disposition = format!("attachment; filename=\"{SHOPPING_LIST_FILENAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        list.render_text(),
    ))
}
