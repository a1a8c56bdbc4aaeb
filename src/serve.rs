//! HTTP server for the interactive dashboard
//!
//! `tunestats serve` → loads the dataset once, opens the browser, answers
//! JSON requests from the embedded page

use crate::dashboard::Dashboard;
use crate::genre::{GenreFilter, ALL_GENRES};
use serde::{Deserialize, Serialize};
use std::io;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, info, warn};

// Embed the UI directly in the binary
const UI_HTML: &str = include_str!("ui.html");

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    /// Set when the dataset could not be loaded
    notice: Option<String>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T, notice: Option<&str>) -> Self {
        Self {
            ok: true,
            data: Some(data),
            notice: notice.map(str::to_string),
            error: None,
        }
    }
}

#[derive(Deserialize, Debug, PartialEq)]
pub struct GenreParams {
    #[serde(default = "default_genre")]
    pub genre: String,
}

fn default_genre() -> String {
    ALL_GENRES.to_string()
}

impl GenreParams {
    pub fn filter(&self) -> GenreFilter {
        GenreFilter::from(self.genre.as_str())
    }
}

/// Start server, optionally open browser, serve until the process ends
pub fn start(port: u16, mut dashboard: Dashboard, open_browser: bool) -> io::Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr).map_err(|e| io::Error::other(e.to_string()))?;

    let url = format!("http://localhost:{}", port);

    eprintln!("\n\x1b[1;32m♫ tunestats\x1b[0m");
    eprintln!("   {}", url);
    eprintln!("   Tracks: {}\n", dashboard.dataset().len());
    if let Some(notice) = dashboard.notice() {
        eprintln!("   \x1b[33m{}\x1b[0m\n", notice);
    }
    info!(%addr, tracks = dashboard.dataset().len(), "dashboard server listening");

    if open_browser {
        let _ = open::that(&url);
    }

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &mut dashboard) {
            warn!(error = %e, "request failed");
        }
    }

    Ok(())
}

fn handle_request(request: Request, dashboard: &mut Dashboard) -> io::Result<()> {
    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or("/");
    let method = request.method().clone();
    debug!(%method, %url, "request");

    match (&method, path) {
        (&Method::Get, "/") => {
            let html = UI_HTML.replace("{{TITLE}}", &page_title(dashboard));
            let response = Response::from_string(html).with_header(content_type("text/html")?);
            request.respond(response)
        }

        (&Method::Get, "/api/genres") => {
            let genres = dashboard.genres();
            respond_json(request, &ApiResponse::success(genres, dashboard.notice()))
        }

        (&Method::Get, "/api/top-artists") => {
            let filter = parse_params(&url).filter();
            let ranking = dashboard.top_artists(&filter).to_vec();
            respond_json(request, &ApiResponse::success(ranking, dashboard.notice()))
        }

        (&Method::Get, "/api/overview") => {
            let filter = parse_params(&url).filter();
            let overview = dashboard.overview(&filter);
            respond_json(request, &ApiResponse::success(overview, dashboard.notice()))
        }

        _ => {
            let body = ApiResponse::<()> {
                ok: false,
                data: None,
                notice: None,
                error: Some("Not found".to_string()),
            };
            let json = serde_json::to_string(&body)?;
            let response = Response::from_string(json)
                .with_status_code(404)
                .with_header(content_type("application/json")?);
            request.respond(response)
        }
    }
}

/// Genre filter from the query string; missing or unparseable means "All".
pub fn parse_params(url: &str) -> GenreParams {
    url.split_once('?')
        .and_then(|(_, query)| serde_urlencoded::from_str::<GenreParams>(query).ok())
        .unwrap_or_else(|| GenreParams {
            genre: default_genre(),
        })
}

fn respond_json<T: Serialize>(request: Request, body: &ApiResponse<T>) -> io::Result<()> {
    let json = serde_json::to_string(body)?;
    let response = Response::from_string(json).with_header(content_type("application/json")?);
    request.respond(response)
}

fn content_type(value: &str) -> io::Result<Header> {
    Header::from_bytes(&b"Content-Type"[..], value.as_bytes())
        .map_err(|_| io::Error::other(format!("invalid content type {}", value)))
}

fn page_title(dashboard: &Dashboard) -> String {
    let name = dashboard
        .dataset()
        .source()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "no data".to_string());
    html_escape(&format!("tunestats · {}", name))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // QUERY PARSING TESTS
    // ==========================================================================

    #[test]
    fn test_parse_params_genre() {
        let p = parse_params("/api/top-artists?genre=Pop");
        assert_eq!(p.filter(), GenreFilter::Genre("Pop".into()));
    }

    #[test]
    fn test_parse_params_url_encoded() {
        let p = parse_params("/api/top-artists?genre=Children%27s+Music");
        assert_eq!(p.genre, "Children's Music");
    }

    #[test]
    fn test_parse_params_defaults_to_all() {
        assert_eq!(parse_params("/api/top-artists").filter(), GenreFilter::All);
        assert_eq!(parse_params("/api/top-artists?").filter(), GenreFilter::All);
        assert_eq!(parse_params("/api/top-artists?other=1").filter(), GenreFilter::All);
        assert_eq!(parse_params("/api/overview?genre=All").filter(), GenreFilter::All);
        assert_eq!(parse_params("/api/top-artists?genre=").filter(), GenreFilter::All);
        assert_eq!(parse_params("/api/top-artists?genre=+").filter(), GenreFilter::All);
    }

    // ==========================================================================
    // RESPONSE TESTS
    // ==========================================================================

    #[test]
    fn test_api_response_envelope() {
        let body = ApiResponse::success(vec!["All", "Pop"], Some("file not found: x.csv"));
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["data"][1], "Pop");
        assert_eq!(value["notice"], "file not found: x.csv");
        assert!(value["error"].is_null());
    }

    #[test]
    fn test_content_type_header() {
        let header = content_type("application/json").unwrap();
        assert_eq!(header.value.as_str(), "application/json");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }

    #[test]
    fn test_ui_fetches_api_routes() {
        assert!(UI_HTML.contains("/api/genres"));
        assert!(UI_HTML.contains("/api/top-artists"));
        assert!(UI_HTML.contains("/api/overview"));
        assert!(UI_HTML.contains("{{TITLE}}"));
    }
}
