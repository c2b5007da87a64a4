//! Product video links.

use reqwest::Url;

const EMBED_BASE: &str = "https://www.youtube-nocookie.com/embed";

/// Rewrites a YouTube link into a privacy-enhanced embed URL.
///
/// Understands `youtu.be/<id>`, `/watch?v=<id>`, `/embed/<id>` and
/// `/shorts/<id>`, carrying over `t`/`start` and `list`. Anything that is not
/// a recognizable YouTube link is returned unchanged; blank input is `None`.
#[must_use]
pub fn youtube_embed_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let Ok(url) = Url::parse(raw) else {
        return Some(raw.to_string());
    };
    let host = url.host_str().unwrap_or_default().trim_start_matches("www.");
    let host = host.trim_start_matches("m.");

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();
    let query = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    };

    let id = match host {
        "youtu.be" => segments.first().map(|s| (*s).to_string()),
        "youtube.com" | "youtube-nocookie.com" => match segments.as_slice() {
            ["watch", ..] => query("v"),
            ["embed" | "shorts", id, ..] => Some((*id).to_string()),
            _ => None,
        },
        _ => None,
    };
    let Some(id) = id else {
        return Some(raw.to_string());
    };

    let Ok(mut embed) = Url::parse(EMBED_BASE) else {
        return Some(raw.to_string());
    };
    if let Ok(mut path) = embed.path_segments_mut() {
        path.push(&id);
    }
    {
        let mut pairs = embed.query_pairs_mut();
        pairs.append_pair("modestbranding", "1").append_pair("rel", "0");
        if let Some(start) = query("t").or_else(|| query("start")) {
            pairs.append_pair("start", start.trim_end_matches('s'));
        }
        if let Some(list) = query("list") {
            pairs.append_pair("list", &list);
        }
    }
    Some(embed.into())
}
