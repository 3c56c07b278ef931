//! Local server for the built site.
//!
//! Serves the output directory with `tiny_http`. Requests carrying a
//! selection parameter (`/?item=robot`, `/articles.html?article=intro`) are
//! answered with the pre-rendered detail page, so deep links shared from the
//! live site keep working.
//!
//! ```text
//! request ──► deep link? ──► Projects/robot/robot.html
//!                │
//!                └── no ──► file ──► dir/index.html ──► 404
//! ```

use crate::{
    build::{DeepLinks, LINKS_FILE},
    config::cfg,
    log,
    render::Location,
};
use anyhow::{Context, Result, anyhow};
use std::{
    fs,
    io::Cursor,
    net::{IpAddr, SocketAddr},
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Serve `config.build.output` until Ctrl+C.
pub fn serve_site() -> Result<()> {
    let c = cfg();
    let interface: IpAddr = c
        .serve
        .interface
        .parse()
        .with_context(|| format!("Invalid interface `{}`", c.serve.interface))?;

    let (server, addr) = try_bind_port(interface, c.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    let output = c.build.output.clone();
    let links = DeepLinks::load(&output.join(LINKS_FILE)).unwrap_or_else(|err| {
        log!("serve"; "no deep links: {err:#}");
        DeepLinks::default()
    });

    log!("serve"; "http://{}", addr);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &output, &links) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map_or_else(|| "no attempt made".to_owned(), |e| e.to_string())
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

fn handle_request(request: Request, output: &Path, links: &DeepLinks) -> Result<()> {
    match resolve_request(output, links, request.url()) {
        Some(path) => serve_file(request, &path),
        None => serve_not_found(request),
    }
}

/// File answering `url`, if any.
///
/// Resolution order:
/// 1. Selection parameter with a pre-rendered page
/// 2. Exact file match
/// 3. Directory with `index.html`
fn resolve_request(output: &Path, links: &DeepLinks, url: &str) -> Option<PathBuf> {
    let location = Location::parse(url);

    if let Some(page) = links.resolve(&location) {
        let path = output.join(page);
        if path.is_file() {
            return Some(path);
        }
    }

    let relative = Path::new(location.path.trim_matches('/'));
    // Nothing outside the output directory.
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }

    let local = output.join(relative);
    if local.is_file() {
        return Some(local);
    }
    let index = local.join("index.html");
    index.is_file().then_some(index)
}

// ============================================================================
// Response Helpers
// ============================================================================

fn content_type_header(value: &str) -> Result<Header> {
    Header::from_bytes("Content-Type", value).map_err(|()| anyhow!("invalid header value `{value}`"))
}

/// Serve a file with appropriate content type.
fn serve_file(request: Request, path: &Path) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let response =
        Response::from_data(content).with_header(content_type_header(guess_content_type(path))?);
    request.respond(response)?;
    Ok(())
}

/// Serve 404 Not Found response.
fn serve_not_found(request: Request) -> Result<()> {
    let response = Response::new(
        StatusCode(404),
        vec![content_type_header("text/plain")?],
        Cursor::new("404 Not Found"),
        Some(13),
        None,
    );
    request.respond(response)?;
    Ok(())
}

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",

        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",

        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mview") => "application/octet-stream",

        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn output() -> (TempDir, DeepLinks) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("Projects/robot")).unwrap();
        fs::create_dir_all(root.join("Articles/intro")).unwrap();
        fs::write(root.join("index.html"), "home").unwrap();
        fs::write(root.join("Projects/robot/robot.html"), "robot").unwrap();
        fs::write(root.join("Articles/intro/index.html"), "intro").unwrap();

        let mut links = DeepLinks::default();
        links.insert("item", "robot", "Projects/robot/robot.html".into());
        links.insert("item", "gone", "Projects/gone/index.html".into());
        (dir, links)
    }

    #[test]
    fn test_deep_link_served_prerendered() {
        let (dir, links) = output();
        let root = dir.path();
        assert_eq!(
            resolve_request(root, &links, "/index.html?item=robot"),
            Some(root.join("Projects/robot/robot.html"))
        );
        assert_eq!(
            resolve_request(root, &links, "/?item=robot"),
            Some(root.join("Projects/robot/robot.html"))
        );
    }

    #[test]
    fn test_unknown_or_missing_deep_link_falls_back() {
        let (dir, links) = output();
        let root = dir.path();
        assert_eq!(
            resolve_request(root, &links, "/?item=gone"),
            Some(root.join("index.html"))
        );
        assert_eq!(
            resolve_request(root, &links, "/index.html?item=nope"),
            Some(root.join("index.html"))
        );
    }

    #[test]
    fn test_files_and_directory_index() {
        let (dir, links) = output();
        let root = dir.path();
        assert_eq!(
            resolve_request(root, &links, "/Articles/intro/"),
            Some(root.join("Articles/intro/index.html"))
        );
        assert_eq!(resolve_request(root, &links, "/missing.html"), None);
        assert_eq!(resolve_request(root, &links, "/../secret"), None);
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("a/b.HTML")), "text/html; charset=utf-8");
        assert_eq!(guess_content_type(Path::new("clip.mp4")), "video/mp4");
        assert_eq!(guess_content_type(Path::new("blob")), "application/octet-stream");
    }
}
