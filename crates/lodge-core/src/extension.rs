//! Extension token extraction from destination names.

use std::borrow::Cow;

/// Extracts the lower-cased extension token (with its leading period) from a
/// path or URL.
///
/// For URLs only the path component is examined, so query strings and
/// fragments never leak into the token. Leading dots of the file name do not
/// start an extension, and a trailing lone period is not one either.
///
/// # Examples
///
/// - `extension_token("out/Result.JSON")` → `Some(".json")`
/// - `extension_token("gs://bucket/img.png?generation=3")` → `Some(".png")`
/// - `extension_token("archive.tar.gz")` → `Some(".gz")`
/// - `extension_token(".bashrc")` → `None`
pub fn extension_token(name: &str) -> Option<String> {
    let path = url_path(name);
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or("");
    let file_name = file_name.trim_start_matches('.');
    let dot = file_name.rfind('.')?;
    let ext = &file_name[dot..];
    if ext.len() <= 1 {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Normalizes a registry key: lower-cased, with exactly one leading period.
pub fn normalize_token(token: &str) -> String {
    format!(".{}", token.trim_start_matches('.').to_ascii_lowercase())
}

/// Parses `location` as a URL only when it is written `scheme://...`.
/// Relative paths containing a colon (`run:1/out.json`) and Windows drive
/// paths stay plain paths.
pub(crate) fn parse_url(location: &str) -> Option<url::Url> {
    let (scheme, _) = location.split_once("://")?;
    if scheme.len() < 2 || scheme.contains(['/', '\\']) {
        return None;
    }
    url::Url::parse(location).ok()
}

fn url_path(name: &str) -> Cow<'_, str> {
    match parse_url(name) {
        Some(url) => Cow::Owned(url.path().to_string()),
        None => Cow::Borrowed(name),
    }
}
