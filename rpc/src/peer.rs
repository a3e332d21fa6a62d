// Copyright 2026 The Cairn Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Strips the port (and, for IPv6 literals, the surrounding brackets) off a
/// transport-level peer address string, falling back to `"unknown"` when no
/// address is available. Input is whatever `ToString` form the transport
/// hands us (`SocketAddr::to_string()` for a plain TCP peer, or a proxy
/// header for anything fronted by one).
pub fn normalize_peer_address(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return "unknown".to_string(),
    };

    if let Some(rest) = raw.strip_prefix('[') {
        // "[::1]:5678" -> "::1"
        if let Some(end) = rest.find(']') {
            return rest[..end].to_string();
        }
        return raw.to_string();
    }

    // IPv4 "1.2.3.4:5678" has exactly one colon; a bare IPv6 literal with no
    // port has more than one. Only strip when there's exactly one.
    if raw.matches(':').count() == 1 {
        if let Some((host, _port)) = raw.rsplit_once(':') {
            return host.to_string();
        }
    }

    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ipv4_port() {
        assert_eq!(normalize_peer_address(Some("203.0.113.5:4455")), "203.0.113.5");
    }

    #[test]
    fn strips_ipv6_brackets_and_port() {
        assert_eq!(normalize_peer_address(Some("[2001:db8::1]:4455")), "2001:db8::1");
    }

    #[test]
    fn leaves_bare_ipv6_alone() {
        assert_eq!(normalize_peer_address(Some("::1")), "::1");
    }

    #[test]
    fn falls_back_to_unknown() {
        assert_eq!(normalize_peer_address(None), "unknown");
        assert_eq!(normalize_peer_address(Some("")), "unknown");
    }
}
