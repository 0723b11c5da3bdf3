// URI / path codec
//
// A graph identifier becomes a filesystem path by splitting the URI on '/'
// and replacing every empty segment (produced by "scheme://host", double or
// trailing slashes) with the reserved literal "%". Decoding reverses the
// substitution. The scheme is lossless as long as no URI segment literally
// equals "%"; such identifiers are rejected by encode so they can never be
// mistaken for an escaped empty segment.

/// Reserved path segment marking an empty URI segment.
pub const EMPTY_SEGMENT: &str = "%";

/// Splits a graph URI into filesystem path segments.
///
/// Returns `None` for identifiers the escape scheme cannot represent, i.e.
/// those containing a segment that is literally `%`.
pub fn encode(uri: &str) -> Option<Vec<String>> {
    let mut segments = Vec::new();
    for part in uri.split('/') {
        if part == EMPTY_SEGMENT {
            return None;
        }
        if part.is_empty() {
            segments.push(EMPTY_SEGMENT.to_string());
        } else {
            segments.push(part.to_string());
        }
    }
    Some(segments)
}

/// Encodes a graph URI into an absolute filesystem path.
pub fn encode_path(uri: &str) -> Option<String> {
    encode(uri).map(|segments| format!("/{}", segments.join("/")))
}

/// Recovers the graph URI from a filesystem path produced by [`encode`].
///
/// Decoding a path that did not come out of the encoder is undefined.
pub fn decode(path: &str) -> String {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    trimmed
        .split('/')
        .map(|segment| if segment == EMPTY_SEGMENT { "" } else { segment })
        .collect::<Vec<_>>()
        .join("/")
}

/// Splits a filesystem request path into tree segments.
///
/// A literal empty segment in the request path (double or trailing slash)
/// maps to the same `%` escape used by [`encode`], so filesystem-level
/// double slashes line up with the convention used for URIs.
pub fn path_segments(path: &str) -> Vec<String> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    trimmed
        .split('/')
        .map(|segment| {
            if segment.is_empty() {
                EMPTY_SEGMENT.to_string()
            } else {
                segment.to_string()
            }
        })
        .collect()
}
