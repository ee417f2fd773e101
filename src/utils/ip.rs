use std::net::{IpAddr, SocketAddr};

use actix_web::HttpRequest;

/// Identity used to key a client's quota record.
///
/// Without `trust_proxy_headers` this is the peer address of the connection.
/// With it, the first `X-Forwarded-For` entry or `X-Real-IP` wins when
/// present, as a reverse proxy would report them.
pub fn client_ip(req: &HttpRequest, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(forwarded) = forwarded_ip(req) {
            return strip_port(&forwarded);
        }
    }

    match req.peer_addr() {
        Some(addr) => addr.ip().to_string(),
        // Only happens for requests that never touched a socket
        None => req
            .connection_info()
            .peer_addr()
            .map(strip_port)
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

fn forwarded_ip(req: &HttpRequest) -> Option<String> {
    let headers = req.headers();
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Drop the port from `host:port` or `[v6]:port`; bare addresses pass through
pub fn strip_port(addr: &str) -> String {
    if let Ok(socket) = addr.parse::<SocketAddr>() {
        return socket.ip().to_string();
    }
    if let Ok(ip) = addr.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>() {
        return ip.to_string();
    }
    match addr.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && port.chars().all(|c| c.is_ascii_digit()) => {
            host.to_string()
        }
        _ => addr.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("192.168.1.7:51234"), "192.168.1.7");
        assert_eq!(strip_port("192.168.1.7"), "192.168.1.7");
        assert_eq!(strip_port("[::1]:8080"), "::1");
        assert_eq!(strip_port("2001:db8::1"), "2001:db8::1");
        assert_eq!(strip_port("[2001:db8::1]"), "2001:db8::1");
        assert_eq!(strip_port("proxy.local:80"), "proxy.local");
    }

    #[test]
    fn test_peer_address_is_used_by_default() {
        let req = TestRequest::default()
            .peer_addr("203.0.113.9:40000".parse().unwrap())
            .insert_header(("x-forwarded-for", "198.51.100.1"))
            .to_http_request();

        assert_eq!(client_ip(&req, false), "203.0.113.9");
    }

    #[test]
    fn test_forwarded_headers_when_trusted() {
        let req = TestRequest::default()
            .peer_addr("10.0.0.2:40000".parse().unwrap())
            .insert_header(("x-forwarded-for", "198.51.100.1, 10.0.0.2"))
            .to_http_request();
        assert_eq!(client_ip(&req, true), "198.51.100.1");

        let req = TestRequest::default()
            .peer_addr("10.0.0.2:40000".parse().unwrap())
            .insert_header(("x-real-ip", "198.51.100.4:1234"))
            .to_http_request();
        assert_eq!(client_ip(&req, true), "198.51.100.4");
    }

    #[test]
    fn test_trusted_without_headers_falls_back_to_peer() {
        let req = TestRequest::default()
            .peer_addr("[2001:db8::7]:9000".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req, true), "2001:db8::7");
    }
}
