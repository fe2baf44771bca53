//! Header manipulation for forwarded requests and relayed responses

use std::net::SocketAddr;

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

use crate::proxy::config::ProxyRule;

/// Headers that describe a single transport hop and must not be forwarded
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Remove hop-by-hop headers, including any named in `Connection`
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in &listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

/// Build the outbound header set for a proxied request
pub fn outbound_headers(
    rule: &ProxyRule,
    inbound: &HeaderMap,
    client_addr: Option<SocketAddr>,
) -> HeaderMap {
    let mut headers = inbound.clone();
    strip_hop_by_hop(&mut headers);
    // Recomputed by the client from the buffered body
    headers.remove(header::CONTENT_LENGTH);

    if rule.change_origin {
        if let Ok(host) = HeaderValue::from_str(&rule.upstream_host()) {
            headers.insert(header::HOST, host);
        }
        if headers.contains_key(header::ORIGIN) {
            if let Ok(origin) = HeaderValue::from_str(&rule.upstream_origin()) {
                headers.insert(header::ORIGIN, origin);
            }
        }
    }

    if rule.xfwd {
        append_forwarded(&mut headers, inbound, client_addr);
    }

    headers
}

fn append_forwarded(headers: &mut HeaderMap, inbound: &HeaderMap, client_addr: Option<SocketAddr>) {
    if let Some(addr) = client_addr {
        let ip = addr.ip().to_string();
        let value = match inbound.get(X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
            Some(existing) if !existing.is_empty() => format!("{}, {}", existing, ip),
            _ => ip,
        };
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(X_FORWARDED_FOR, value);
        }
    }

    if !headers.contains_key(X_FORWARDED_PROTO) {
        headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http"));
    }

    if !headers.contains_key(X_FORWARDED_HOST) {
        if let Some(host) = inbound.get(header::HOST) {
            headers.insert(X_FORWARDED_HOST, host.clone());
        }
    }
}

/// Upstream response headers relayed to the client
pub fn response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = upstream.clone();
    strip_hop_by_hop(&mut headers);
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;

    fn rule(change_origin: bool, xfwd: bool) -> ProxyRule {
        ProxyRule::from_config(&UpstreamConfig {
            target: "https://pic.furrysp.top/@api".to_string(),
            change_origin,
            xfwd,
            ..UpstreamConfig::default()
        })
        .unwrap()
    }

    fn inbound() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:5173"));
        headers.insert(header::ORIGIN, HeaderValue::from_static("http://localhost:5173"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, x-session-hop"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert("x-session-hop", HeaderValue::from_static("1"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("12"));
        headers
    }

    #[test]
    fn change_origin_rewrites_host_and_origin() {
        let headers = outbound_headers(&rule(true, false), &inbound(), None);
        assert_eq!(headers[header::HOST], "pic.furrysp.top");
        assert_eq!(headers[header::ORIGIN], "https://pic.furrysp.top");
        assert_eq!(headers[header::ACCEPT], "application/json");
    }

    #[test]
    fn without_change_origin_client_host_is_kept() {
        let headers = outbound_headers(&rule(false, false), &inbound(), None);
        assert_eq!(headers[header::HOST], "localhost:5173");
        assert_eq!(headers[header::ORIGIN], "http://localhost:5173");
    }

    #[test]
    fn origin_is_not_invented() {
        let mut inbound = inbound();
        inbound.remove(header::ORIGIN);
        let headers = outbound_headers(&rule(true, false), &inbound, None);
        assert!(headers.get(header::ORIGIN).is_none());
    }

    #[test]
    fn hop_by_hop_headers_are_removed() {
        let headers = outbound_headers(&rule(true, false), &inbound(), None);
        assert!(headers.get(header::CONNECTION).is_none());
        assert!(headers.get("keep-alive").is_none());
        assert!(headers.get("x-session-hop").is_none());
        assert!(headers.get(header::CONTENT_LENGTH).is_none());
    }

    #[test]
    fn xfwd_appends_client_chain() {
        let mut inbound = inbound();
        inbound.insert(X_FORWARDED_FOR, HeaderValue::from_static("10.0.0.1"));
        let addr: SocketAddr = "192.168.1.20:50000".parse().unwrap();

        let headers = outbound_headers(&rule(true, true), &inbound, Some(addr));
        assert_eq!(headers[X_FORWARDED_FOR], "10.0.0.1, 192.168.1.20");
        assert_eq!(headers[X_FORWARDED_PROTO], "http");
        assert_eq!(headers[X_FORWARDED_HOST], "localhost:5173");
    }

    #[test]
    fn xfwd_disabled_adds_nothing() {
        let addr: SocketAddr = "192.168.1.20:50000".parse().unwrap();
        let headers = outbound_headers(&rule(true, false), &inbound(), Some(addr));
        assert!(headers.get(X_FORWARDED_FOR).is_none());
    }

    #[test]
    fn response_headers_drop_transfer_encoding() {
        let mut upstream = HeaderMap::new();
        upstream.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        upstream.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));

        let headers = response_headers(&upstream);
        assert!(headers.get(header::TRANSFER_ENCODING).is_none());
        assert_eq!(headers[header::CONTENT_TYPE], "image/png");
    }
}
