//! Development server with live reload and the quote request endpoint

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::ContactFormConfig;
use crate::helpers::{is_external, url_for};
use crate::quote::QuoteRequest;
use crate::{Site, CONFIG_FILE};

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Server state
struct ServerState {
    public_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
    /// Form options and redirect target, refreshed on rebuild
    contact: RwLock<ContactFormSettings>,
}

/// What the quote endpoint needs from the site configuration
#[derive(Debug, Clone)]
struct ContactFormSettings {
    form: ContactFormConfig,
    thanks_url: String,
}

impl ContactFormSettings {
    fn from_site(site: &Site) -> Self {
        Self {
            form: site.config.contact.clone(),
            thanks_url: url_for(&site.config, &site.config.contact.thanks_path),
        }
    }
}

/// Start the development server
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    // Create broadcast channel for live reload notifications
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        public_dir: site.public_dir.clone(),
        reload_tx: reload_tx.clone(),
        live_reload: watch,
        contact: RwLock::new(ContactFormSettings::from_site(site)),
    });

    let app = router(site, state.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    // Open browser if requested
    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    // Start file watcher if watch mode is enabled
    if watch {
        let base_dir = site.base_dir.clone();
        let watched = vec![
            site.content_dir.clone(),
            site.static_dir.clone(),
            site.base_dir.join(CONFIG_FILE),
        ];

        // The watcher blocks on its channel and rebuilds synchronously
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(base_dir, watched, state, reload_tx) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Routes: live reload socket, quote form endpoint, then static files
fn router(site: &Site, state: Arc<ServerState>) -> Router {
    let mut app = Router::new().route("/__livereload", get(livereload_handler));

    let action = &site.config.contact.form_action;
    if action.starts_with('/') && !is_external(action) {
        let route = url_for(&site.config, action);
        tracing::debug!("Accepting quote requests at POST {}", route);
        app = app.route(&route, get(fallback_handler).post(quote_handler));
    } else {
        tracing::warn!(
            "Quote form action {:?} is not a local path; the server will not accept submissions",
            action
        );
    }

    app.fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Watch for file changes and trigger reload
fn watch_and_reload(
    base_dir: PathBuf,
    watched: Vec<PathBuf>,
    state: Arc<ServerState>,
    reload_tx: broadcast::Sender<()>,
) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Create debouncer to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for path in &watched {
        if path.is_dir() {
            debouncer.watcher().watch(path, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", path);
        } else if path.exists() {
            debouncer.watcher().watch(path, RecursiveMode::NonRecursive)?;
            tracing::debug!("Watching: {:?}", path);
        }
    }

    // Handle file change events
    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                // Filter out irrelevant events (like .git, .DS_Store, etc.)
                let relevant_events: Vec<_> = events
                    .iter()
                    .filter(|e| {
                        let path_str = e.path.to_string_lossy();
                        !path_str.contains(".git")
                            && !path_str.contains(".DS_Store")
                            && !path_str.ends_with('~')
                    })
                    .collect();

                if relevant_events.is_empty() {
                    continue;
                }

                // Log changed files
                println!();
                for event in &relevant_events {
                    println!("📝 File changed: {}", event.path.display());
                }

                // Regenerate site, re-reading the configuration
                println!("\n🔄 Regenerating...");
                let result = Site::new(&base_dir).and_then(|site| {
                    site.generate()?;
                    Ok(site)
                });
                match result {
                    Ok(site) => {
                        if let Ok(mut contact) = state.contact.write() {
                            *contact = ContactFormSettings::from_site(&site);
                        }
                        println!("✅ Regenerated successfully!");
                        // Notify all connected clients to reload
                        let _ = reload_tx.send(());
                    }
                    Err(e) => {
                        println!("❌ Generation failed: {:#}", e);
                    }
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            // Wait for reload signal
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            // Handle incoming messages (ping/pong)
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Accept a quote request from the contact form
///
/// Valid requests are logged (nothing is stored) and redirected to the
/// thanks page; invalid ones get a 422 with every field error.
async fn quote_handler(
    State(state): State<Arc<ServerState>>,
    Form(request): Form<QuoteRequest>,
) -> Response {
    let settings = match state.contact.read() {
        Ok(settings) => settings.clone(),
        Err(_) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response();
        }
    };

    match request.validate(&settings.form) {
        Ok(()) => {
            tracing::info!(
                name = %request.full_name(),
                email = %request.email.trim(),
                phone = %request.phone.trim(),
                location = %request.location.trim(),
                interest = %request.interest_label(&settings.form),
                referral = %request.referral.trim(),
                "Quote request received"
            );
            Redirect::to(&settings.thanks_url).into_response()
        }
        Err(errors) => {
            tracing::debug!("Rejected quote request: {} field errors", errors.len());
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "errors": errors })),
            )
                .into_response()
        }
    }
}

/// Fallback handler that serves files and injects live reload script
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let Some(file_path) = resolve_path(&state.public_dir, request.uri().path()) else {
        return not_found(&state).await;
    };

    // Check if it's an HTML file that needs live reload injection
    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if is_html && state.live_reload {
        // Read and inject live reload script
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Html(inject_live_reload(&content)).into_response(),
            Err(_) => not_found(&state).await,
        }
    } else {
        // Serve static file using tower-http
        let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
        match service.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

/// Serve the generated 404 page with a 404 status
async fn not_found(state: &ServerState) -> Response {
    match tokio::fs::read_to_string(state.public_dir.join("404.html")).await {
        Ok(content) => {
            let content = if state.live_reload {
                inject_live_reload(&content)
            } else {
                content
            };
            (StatusCode::NOT_FOUND, Html(content)).into_response()
        }
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Map a request path to an existing file under `public_dir`
///
/// Directories resolve to their `index.html`; `/about` also tries
/// `about.html`. Paths that climb out of `public_dir` resolve to nothing.
fn resolve_path(public_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = percent_encoding::percent_decode_str(request_path).decode_utf8_lossy();
    let clean_path = decoded.trim_start_matches('/');

    let relative = Path::new(clean_path);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }

    let candidate = public_dir.join(relative);
    if candidate.is_dir() {
        let index = candidate.join("index.html");
        return index.is_file().then_some(index);
    }
    if candidate.is_file() {
        return Some(candidate);
    }

    // Try adding .html extension
    let with_html = public_dir.join(format!("{}.html", clean_path.trim_end_matches('/')));
    with_html.is_file().then_some(with_html)
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replace("</body>", LIVE_RELOAD_SCRIPT)
    } else {
        // If no </body> tag, append to end
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;
    use std::fs;
    use tempfile::TempDir;

    fn state(public_dir: &Path, live_reload: bool) -> Arc<ServerState> {
        let site = Site::with_config(public_dir.to_path_buf(), Default::default());
        let (reload_tx, _) = broadcast::channel(1);
        Arc::new(ServerState {
            public_dir: public_dir.to_path_buf(),
            reload_tx,
            live_reload,
            contact: RwLock::new(ContactFormSettings::from_site(&site)),
        })
    }

    fn valid_request() -> QuoteRequest {
        QuoteRequest {
            first_name: "Lena".to_string(),
            last_name: "Begay".to_string(),
            phone: "(928) 871-4000".to_string(),
            email: "lena@example.com".to_string(),
            interest: "auto".to_string(),
            consent: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_watcher_rebuilds_and_signals_reload() {
        let tmp = TempDir::new().unwrap();
        let blog_dir = tmp.path().join("content/blog");
        fs::create_dir_all(&blog_dir).unwrap();
        let site = Site::new(tmp.path()).unwrap();

        let state = state(&site.public_dir, true);
        let reload_tx = state.reload_tx.clone();
        let mut reload_rx = reload_tx.subscribe();
        let base_dir = site.base_dir.clone();
        let watched = vec![site.content_dir.clone()];
        std::thread::spawn(move || watch_and_reload(base_dir, watched, state, reload_tx));
        std::thread::sleep(Duration::from_millis(300));

        fs::write(
            blog_dir.join("new-office.md"),
            "---\ntitle: New Office in Gallup\n---\n\nNow open.\n",
        )
        .unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(10);
        let mut reloaded = false;
        while std::time::Instant::now() < deadline {
            if reload_rx.try_recv().is_ok() {
                reloaded = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(100));
        }
        assert!(reloaded);
        assert!(site.public_dir.join("blog/new-office/index.html").exists());
    }

    #[test]
    fn test_inject_live_reload() {
        let html = "<html><body><p>x</p></body></html>";
        let out = inject_live_reload(html);
        assert!(out.contains("__livereload"));
        assert!(out.ends_with("</html>"));
        assert_eq!(out.matches("</body>").count(), 1);
    }

    #[test]
    fn test_resolve_path() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("blog/hello")).unwrap();
        fs::write(tmp.path().join("index.html"), "home").unwrap();
        fs::write(tmp.path().join("blog/hello/index.html"), "post").unwrap();
        fs::write(tmp.path().join("404.html"), "missing").unwrap();

        let root = tmp.path();
        assert_eq!(resolve_path(root, "/"), Some(root.join("index.html")));
        assert_eq!(
            resolve_path(root, "/blog/hello/"),
            Some(root.join("blog/hello/index.html"))
        );
        assert_eq!(
            resolve_path(root, "/blog/hello"),
            Some(root.join("blog/hello/index.html"))
        );
        assert_eq!(resolve_path(root, "/404"), Some(root.join("404.html")));
        assert_eq!(resolve_path(root, "/blog/missing/"), None);
        assert_eq!(resolve_path(root, "/../etc/passwd"), None);
    }

    #[tokio::test]
    async fn test_valid_quote_redirects_to_thanks() {
        let tmp = TempDir::new().unwrap();
        let response = quote_handler(State(state(tmp.path(), false)), Form(valid_request())).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/contact/thanks/");
    }

    #[tokio::test]
    async fn test_invalid_quote_is_unprocessable() {
        let tmp = TempDir::new().unwrap();
        let mut request = valid_request();
        request.consent = false;
        request.email = "nope".to_string();

        let response = quote_handler(State(state(tmp.path(), false)), Form(request)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_missing_page_serves_404_document() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("404.html"), "<body>Page Not Found</body>").unwrap();

        let response = not_found(&state(tmp.path(), true)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
