// Endpoint catalog of the rbxstats API and the string helpers that turn an
// endpoint path into request URLs and storage filenames.

/// Every endpoint fetched by "Fetch all default endpoints".
pub const ALL_ENDPOINTS: &[&str] = &[
    "offsets",
    "offsets/plain",
    "offsets/shuffles",
    "offsets/shuffles/plain",
    "offsets/shuffles/search/test",
    "offsets/shuffles/search/test/plain",
    "offsets/search/test",
    "offsets/search/test/plain",
    "offsets/prefix/test",
    "offsets/prefix/test/plain",
    "offsets/camera",
    "offsets/camera/plain",
    "offsets/game/123",
    "offsets/game/123/plain",
    "exploits",
    "exploits/windows",
    "exploits/mac",
    "exploits/detected",
    "exploits/undetected",
    "exploits/free",
    "exploits/paid",
    "exploits/indev",
    "exploits/summary",
    "exploits/count",
    "versions/latest",
    "versions/latest/plain",
    "versions/future",
    "versions/future/plain",
];

/// Templates for endpoints that take a user-supplied value.
const PARAM_TEMPLATES: &[&str] = &[
    "offsets/search/{name}",
    "offsets/search/{name}/plain",
    "offsets/prefix/{prefix}",
    "offsets/prefix/{prefix}/plain",
    "offsets/game/{game_id}",
    "offsets/game/{game_id}/plain",
    "offsets/shuffles/search/{name}",
    "offsets/shuffles/search/{name}/plain",
];

pub const DEFAULT_SEARCH_NAME: &str = "test";
pub const DEFAULT_PREFIX: &str = "test";
pub const DEFAULT_GAME_ID: &str = "123";

pub fn all_endpoints() -> Vec<String> {
    ALL_ENDPOINTS.iter().map(|s| s.to_string()).collect()
}

/// Offsets without the shuffles family.
pub fn offsets_endpoints() -> Vec<String> {
    select(|ep| ep.starts_with("offsets") && !ep.contains("shuffles"))
}

pub fn shuffles_endpoints() -> Vec<String> {
    select(|ep| ep.contains("shuffles"))
}

pub fn versions_endpoints() -> Vec<String> {
    select(|ep| ep.starts_with("versions"))
}

fn select(pred: impl Fn(&str) -> bool) -> Vec<String> {
    ALL_ENDPOINTS
        .iter()
        .copied()
        .filter(|ep| pred(ep))
        .map(str::to_string)
        .collect()
}

/// Expand the parameterised templates. Blank values fall back to the same
/// defaults the catalog uses (`test`, `test`, `123`).
pub fn parameterised_endpoints(name: &str, prefix: &str, game_id: &str) -> Vec<String> {
    let name = or_default(name, DEFAULT_SEARCH_NAME);
    let prefix = or_default(prefix, DEFAULT_PREFIX);
    let game_id = or_default(game_id, DEFAULT_GAME_ID);
    PARAM_TEMPLATES
        .iter()
        .map(|t| {
            t.replace("{name}", name)
                .replace("{prefix}", prefix)
                .replace("{game_id}", game_id)
        })
        .collect()
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        default
    } else {
        value
    }
}

/// Split a manually typed, whitespace-separated endpoint list.
pub fn parse_manual_endpoints(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_string).collect()
}

/// Parse `key=value` tokens separated by whitespace. Tokens without `=` are
/// ignored.
pub fn parse_params(input: &str) -> Vec<(String, String)> {
    input
        .split_whitespace()
        .filter_map(|token| token.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Strip a single leading `/`.
pub fn normalize_endpoint(endpoint: &str) -> &str {
    endpoint.strip_prefix('/').unwrap_or(endpoint)
}

/// Storage key for an endpoint: `/`, `?`, `&` and `=` become `_`.
pub fn sanitize_endpoint(endpoint: &str) -> String {
    endpoint
        .chars()
        .map(|c| match c {
            '/' | '?' | '&' | '=' => '_',
            other => other,
        })
        .collect()
}

/// Endpoints ending in `/plain` are stored as raw text.
pub fn is_plain(endpoint: &str) -> bool {
    endpoint.ends_with("/plain")
}

pub fn success_filename(endpoint: &str) -> String {
    let ext = if is_plain(endpoint) { "txt" } else { "json" };
    format!("{}.{}", sanitize_endpoint(endpoint), ext)
}

pub fn error_filename(endpoint: &str) -> String {
    format!("error_{}.log", sanitize_endpoint(endpoint))
}
