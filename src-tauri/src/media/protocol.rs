//! `media://` URI scheme: serves the current session's video to the webview
//! with HTTP range support so the player can seek without loading the whole file.

use std::{
    fs::File,
    io::{ErrorKind, Read, Seek, SeekFrom},
    path::Path,
};

use tauri::http::{header, Request, Response, StatusCode};

use crate::{log_error, log_warn};

use super::{path_from_media_uri_path, video_mime_type};

const ENABLE_LOGS: bool = true;

/// Upper bound on bytes served for an open-ended range request, and for a
/// request without a usable range.
pub const MAX_CHUNK_BYTES: u64 = 4 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
    Full,
    Partial { start: u64, end: u64 },
    Unsatisfiable,
}

/// Interprets a `Range` header against a file of `len` bytes.
/// Only single `bytes=` ranges are honoured; anything else serves the full file.
pub fn parse_range(header_value: Option<&str>, len: u64) -> ByteRange {
    let Some(spec) = header_value.and_then(|v| v.trim().strip_prefix("bytes=")) else {
        return ByteRange::Full;
    };
    if spec.contains(',') {
        return ByteRange::Full;
    }
    let Some((start_raw, end_raw)) = spec.split_once('-') else {
        return ByteRange::Full;
    };
    let (start_raw, end_raw) = (start_raw.trim(), end_raw.trim());

    if start_raw.is_empty() {
        // Suffix range: last N bytes.
        return match end_raw.parse::<u64>() {
            Ok(0) | Err(_) => ByteRange::Unsatisfiable,
            Ok(_) if len == 0 => ByteRange::Unsatisfiable,
            Ok(suffix) => ByteRange::Partial {
                start: len.saturating_sub(suffix),
                end: len - 1,
            },
        };
    }

    let Ok(start) = start_raw.parse::<u64>() else {
        return ByteRange::Full;
    };
    if start >= len {
        return ByteRange::Unsatisfiable;
    }

    let end = if end_raw.is_empty() {
        start.saturating_add(MAX_CHUNK_BYTES - 1).min(len - 1)
    } else {
        match end_raw.parse::<u64>() {
            Ok(end) if end >= start => end.min(len - 1),
            Ok(_) => return ByteRange::Unsatisfiable,
            Err(_) => return ByteRange::Full,
        }
    };

    ByteRange::Partial { start, end }
}

fn respond(status: StatusCode, headers: &[(header::HeaderName, String)], body: Vec<u8>) -> Response<Vec<u8>> {
    let mut builder = Response::builder()
        .status(status)
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*");
    for (name, value) in headers {
        builder = builder.header(name, value.as_str());
    }
    builder.body(body).unwrap_or_else(|err| {
        log_warn!("Failed to build media response: {err}");
        let mut fallback = Response::new(Vec::new());
        *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}

/// Only the video the session was started for is served.
fn is_servable(requested: &Path, current_video: Option<&Path>) -> bool {
    let Some(current) = current_video else {
        return false;
    };
    if requested == current {
        return true;
    }
    match (requested.canonicalize(), current.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn read_span(path: &Path, start: u64, len: u64) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(start))?;
    let mut buf = Vec::with_capacity(len as usize);
    file.take(len).read_to_end(&mut buf)?;
    Ok(buf)
}

/// Builds the response for one `media://` request against the video of the
/// current session.
pub fn serve(request: &Request<Vec<u8>>, current_video: Option<&Path>) -> Response<Vec<u8>> {
    let Some(path) = path_from_media_uri_path(request.uri().path()) else {
        return respond(StatusCode::BAD_REQUEST, &[], Vec::new());
    };
    if !is_servable(&path, current_video) {
        log_warn!("Refusing media request for {}", path.display());
        return respond(StatusCode::FORBIDDEN, &[], Vec::new());
    }

    let len = match std::fs::metadata(&path) {
        Ok(meta) if meta.is_file() => meta.len(),
        Ok(_) => return respond(StatusCode::NOT_FOUND, &[], Vec::new()),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return respond(StatusCode::NOT_FOUND, &[], Vec::new())
        }
        Err(err) => {
            log_error!("Failed to stat {}: {err}", path.display());
            return respond(StatusCode::INTERNAL_SERVER_ERROR, &[], Vec::new());
        }
    };

    let mime = video_mime_type(&path);
    let range_header = request
        .headers()
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok());

    let (status, start, span) = match parse_range(range_header, len) {
        ByteRange::Unsatisfiable => {
            return respond(
                StatusCode::RANGE_NOT_SATISFIABLE,
                &[(header::CONTENT_RANGE, format!("bytes */{len}"))],
                Vec::new(),
            )
        }
        ByteRange::Full if len > MAX_CHUNK_BYTES => {
            log_warn!(
                "Serving the first {MAX_CHUNK_BYTES} of {len} bytes of {} without a range",
                path.display()
            );
            (StatusCode::PARTIAL_CONTENT, 0, MAX_CHUNK_BYTES)
        }
        ByteRange::Full => (StatusCode::OK, 0, len),
        ByteRange::Partial { start, end } => (StatusCode::PARTIAL_CONTENT, start, end - start + 1),
    };

    let body = match read_span(&path, start, span) {
        Ok(body) => body,
        Err(err) => {
            log_error!("Failed to read {}: {err}", path.display());
            return respond(StatusCode::INTERNAL_SERVER_ERROR, &[], Vec::new());
        }
    };

    let mut headers = vec![
        (header::CONTENT_TYPE, mime),
        (header::ACCEPT_RANGES, "bytes".to_string()),
        (header::CONTENT_LENGTH, body.len().to_string()),
    ];
    if status == StatusCode::PARTIAL_CONTENT {
        let end = start + body.len().saturating_sub(1) as u64;
        headers.push((header::CONTENT_RANGE, format!("bytes {start}-{end}/{len}")));
    }

    respond(status, &headers, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::media_url;

    #[test]
    fn range_header_variants() {
        assert_eq!(parse_range(None, 100), ByteRange::Full);
        assert_eq!(
            parse_range(Some("bytes=10-19"), 100),
            ByteRange::Partial { start: 10, end: 19 }
        );
        assert_eq!(
            parse_range(Some("bytes=90-"), 100),
            ByteRange::Partial { start: 90, end: 99 }
        );
        assert_eq!(
            parse_range(Some("bytes=-10"), 100),
            ByteRange::Partial { start: 90, end: 99 }
        );
        assert_eq!(
            parse_range(Some("bytes=50-500"), 100),
            ByteRange::Partial { start: 50, end: 99 }
        );
        assert_eq!(parse_range(Some("bytes=100-"), 100), ByteRange::Unsatisfiable);
        assert_eq!(parse_range(Some("bytes=20-10"), 100), ByteRange::Unsatisfiable);
        assert_eq!(parse_range(Some("bytes=0-1,5-6"), 100), ByteRange::Full);
    }

    #[test]
    fn open_ended_range_is_capped() {
        let len = MAX_CHUNK_BYTES * 3;
        assert_eq!(
            parse_range(Some("bytes=0-"), len),
            ByteRange::Partial {
                start: 0,
                end: MAX_CHUNK_BYTES - 1
            }
        );
    }

    fn request_for(path: &Path, range: Option<&str>) -> Request<Vec<u8>> {
        let url = media_url(path);
        let mut builder = Request::builder().uri(url);
        if let Some(range) = range {
            builder = builder.header(header::RANGE, range);
        }
        builder.body(Vec::new()).expect("valid request")
    }

    #[test]
    fn serves_partial_content() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let video = tmp.path().join("clip.mp4");
        std::fs::write(&video, b"0123456789").expect("write");

        let response = serve(&request_for(&video, Some("bytes=2-5")), Some(&video));
        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(response.body().as_slice(), b"2345");
        assert_eq!(
            response.headers().get(header::CONTENT_RANGE).and_then(|v| v.to_str().ok()),
            Some("bytes 2-5/10")
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("video/mp4")
        );
    }

    #[test]
    fn serves_whole_file_without_range() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let video = tmp.path().join("clip.webm");
        std::fs::write(&video, b"abc").expect("write");

        let response = serve(&request_for(&video, None), Some(&video));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_slice(), b"abc");
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let video = tmp.path().join("nope.mp4");
        let response = serve(&request_for(&video, None), Some(&video));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn only_the_session_video_is_served() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let video = tmp.path().join("case.mp4");
        let other = tmp.path().join("other.mp4");
        std::fs::write(&video, b"case").expect("write");
        std::fs::write(&other, b"other").expect("write");

        let response = serve(&request_for(&other, None), Some(&video));
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.body().is_empty());

        let response = serve(&request_for(&video, None), None);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let dotted = tmp.path().join(".").join("case.mp4");
        let response = serve(&request_for(&dotted, None), Some(&video));
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn large_file_without_range_is_served_in_one_chunk() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let video = tmp.path().join("long.mp4");
        let len = MAX_CHUNK_BYTES + 10;
        std::fs::write(&video, vec![7u8; len as usize]).expect("write");

        let response = serve(&request_for(&video, None), Some(&video));
        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(response.body().len() as u64, MAX_CHUNK_BYTES);
        assert_eq!(
            response.headers().get(header::CONTENT_RANGE).and_then(|v| v.to_str().ok()),
            Some(format!("bytes 0-{}/{len}", MAX_CHUNK_BYTES - 1).as_str())
        );
    }
}
