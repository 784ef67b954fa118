//! Model URL handling
//!
//! Generated models live either on a CDN mirror (`alist_url`) or on the
//! generator's own host (`tripo_url`). The generator host does not serve
//! cross-origin requests, so its URLs are routed through the service proxy.

use ephemera_context::config::endpoints;
use std::future::Future;
use url::Url;

/// Model shown when a context has none
pub const FALLBACK_MODEL_URL: &str = "https://raw.githubusercontent.com/KhronosGroup/glTF-Sample-Models/main/2.0/DamagedHelmet/glTF-Binary/DamagedHelmet.glb";

/// Host suffix that needs the proxy
pub const PROXIED_HOST_SUFFIX: &str = "tripo3d.com";

/// Proxy URL for an absolute model URL
///
/// The origin URL is percent-encoded as a single query component, so a
/// space becomes `%20` rather than `+`.
#[must_use]
pub fn proxy_url(url: &str, base: &str) -> String {
    let encoded = urlencoding::encode(url);
    format!(
        "{}{}?url={encoded}",
        base.trim_end_matches('/'),
        endpoints::PROXY_MODEL
    )
}

/// Make a model URL loadable
///
/// Empty input yields [`FALLBACK_MODEL_URL`]. Plain `http:` is upgraded.
/// Generator-hosted URLs are rewritten through the proxy at `base`.
/// Input that does not parse is returned after the upgrade, untouched.
#[must_use]
pub fn process_model_url(url: &str, base: &str) -> String {
    if url.is_empty() {
        return FALLBACK_MODEL_URL.to_string();
    }

    let upgraded = match url.strip_prefix("http:") {
        Some(rest) => format!("https:{rest}"),
        None => url.to_string(),
    };

    match Url::parse(&upgraded) {
        Ok(parsed)
            if parsed
                .host_str()
                .is_some_and(|host| host.ends_with(PROXIED_HOST_SUFFIX)) =>
        {
            proxy_url(&upgraded, base)
        }
        _ => upgraded,
    }
}

/// Whether a URL already points at the service proxy
#[must_use]
pub fn is_proxy_url(url: &str, base: &str) -> bool {
    url.starts_with(base.trim_end_matches('/')) && url.contains(endpoints::PROXY_MODEL)
}

/// Pick a model URL, preferring the mirror when it answers
///
/// `probe` is asked about `alist` only; a `true` answer selects it. Otherwise
/// the `tripo` URL is proxied, and failing that the unprobed mirror (or an
/// empty string) is returned.
pub async fn resolve_with_fallback<P, Fut>(
    base: &str,
    alist: Option<&str>,
    tripo: Option<&str>,
    probe: P,
) -> String
where
    P: FnOnce(String) -> Fut,
    Fut: Future<Output = bool>,
{
    let alist = alist.filter(|u| !u.is_empty());
    let tripo = tripo.filter(|u| !u.is_empty());

    if let Some(mirror) = alist {
        if probe(mirror.to_string()).await {
            return mirror.to_string();
        }
        tracing::debug!(url = mirror, "mirror probe failed");
    }

    if let Some(origin) = tripo {
        return proxy_url(origin, base);
    }

    alist.unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://api.example.test";

    #[test]
    fn empty_url_falls_back() {
        assert_eq!(process_model_url("", BASE), FALLBACK_MODEL_URL);
    }

    #[test]
    fn http_is_upgraded() {
        assert_eq!(
            process_model_url("http://cdn.example.test/m.glb", BASE),
            "https://cdn.example.test/m.glb"
        );
    }

    #[test]
    fn generator_host_is_proxied() {
        let out = process_model_url("http://files.tripo3d.com/a b.glb?sig=1", BASE);
        assert!(out.starts_with(
            "https://api.example.test/api/proxy-model?url=https%3A%2F%2Ffiles.tripo3d.com"
        ));
        assert!(is_proxy_url(&out, BASE));
        assert!(!out.contains(' '));
    }

    #[test]
    fn proxied_origin_is_encoded_as_one_component() {
        assert_eq!(
            proxy_url("https://files.tripo3d.com/a b+c.glb?sig=1&x=~y", BASE),
            "https://api.example.test/api/proxy-model?url=\
             https%3A%2F%2Ffiles.tripo3d.com%2Fa%20b%2Bc.glb%3Fsig%3D1%26x%3D~y"
        );
    }

    #[test]
    fn other_hosts_pass_through() {
        let url = "https://mirror.example.test/model.glb";
        assert_eq!(process_model_url(url, BASE), url);
        assert!(!is_proxy_url(url, BASE));
    }

    #[test]
    fn unparsable_url_is_returned_upgraded() {
        assert_eq!(process_model_url("http:not a url", BASE), "https:not a url");
        assert_eq!(process_model_url("relative/model.glb", BASE), "relative/model.glb");
    }

    #[tokio::test]
    async fn mirror_wins_when_probe_succeeds() {
        let out = resolve_with_fallback(
            BASE,
            Some("https://m/a.glb"),
            Some("https://x.tripo3d.com/a.glb"),
            |_| async { true },
        )
        .await;
        assert_eq!(out, "https://m/a.glb");
    }

    #[tokio::test]
    async fn failed_probe_proxies_origin() {
        let out = resolve_with_fallback(
            BASE,
            Some("https://m/a.glb"),
            Some("https://x.tripo3d.com/a.glb"),
            |_| async { false },
        )
        .await;
        assert!(is_proxy_url(&out, BASE));
    }

    #[tokio::test]
    async fn failed_probe_without_origin_keeps_mirror() {
        let out =
            resolve_with_fallback(BASE, Some("https://m/a.glb"), None, |_| async { false }).await;
        assert_eq!(out, "https://m/a.glb");
    }

    #[tokio::test]
    async fn no_urls_resolve_to_empty() {
        let out = resolve_with_fallback(BASE, None, Some(""), |_| async { true }).await;
        assert_eq!(out, "");
    }
}
