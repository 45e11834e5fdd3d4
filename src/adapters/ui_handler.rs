use axum::{
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

/// Trunk output of the `ui` crate
#[derive(RustEmbed)]
#[folder = "ui/dist"]
struct Asset;

const INDEX: &str = "index.html";

pub struct UIHandler;

impl UIHandler {
    /// Serve an embedded asset; any other path gets `index.html` so the
    /// client-side router can resolve it
    pub async fn serve(uri: Uri) -> Response {
        let path = uri.path().trim_start_matches('/');
        let path = if path.is_empty() { INDEX } else { path };

        Self::asset(path)
            .or_else(|| Self::asset(INDEX))
            .unwrap_or_else(|| (StatusCode::NOT_FOUND, "404 Not Found").into_response())
    }

    fn asset(path: &str) -> Option<Response> {
        let content = Asset::get(path)?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        // Hashed bundle names change on every build; the shell must not be cached
        let cache = if path == INDEX { "no-cache" } else { "public, max-age=31536000, immutable" };
        Some(
            (
                [
                    (header::CONTENT_TYPE, mime.as_ref().to_string()),
                    (header::CACHE_CONTROL, cache.to_string()),
                ],
                content.data,
            )
                .into_response(),
        )
    }
}
