// Pairing configuration: which PC receives pointer events and serves video

use serde::{Deserialize, Serialize};

/// Remote endpoint configuration
/// - `host`: PC address (e.g. 192.168.5.5)
/// - `stream_port`: HTTP port serving the MJPEG stream
/// - `control_port`: UDP port receiving pointer/gesture messages
/// - `display_name`: label shown to the user, cosmetic only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingConfig {
    pub host: String,
    pub stream_port: u32,
    pub control_port: u32,
    pub display_name: String,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            stream_port: 8081,
            control_port: 39500,
            display_name: "PC".to_string(),
        }
    }
}

impl PairingConfig {
    pub fn is_valid(&self) -> bool {
        !self.host.trim().is_empty()
            && (1..=65535).contains(&self.stream_port)
            && (1..=65535).contains(&self.control_port)
    }

    /// URL of the MJPEG stream on the paired PC
    pub fn stream_url(&self) -> String {
        format!("http://{}:{}/mjpeg", self.host, self.stream_port)
    }
}

/// Parse a pairing URI of the form
/// `gestureos://pair?pc=192.168.5.5&http=8081&udp=39500&name=DESK`.
///
/// Returns None for anything that is not a pairing URI. The caller still
/// checks `is_valid()` before applying the result.
pub fn parse_pairing(text: &str) -> Option<PairingConfig> {
    let url = reqwest::Url::parse(text.trim()).ok()?;
    if !url.scheme().eq_ignore_ascii_case("gestureos") {
        return None;
    }
    if !url.host_str()?.eq_ignore_ascii_case("pair") {
        return None;
    }

    let mut config = PairingConfig {
        host: String::new(),
        stream_port: 0,
        control_port: 0,
        display_name: "PC".to_string(),
    };

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "pc" => config.host = value.trim().to_string(),
            "http" => config.stream_port = value.parse().unwrap_or(0),
            "udp" => config.control_port = value.parse().unwrap_or(0),
            "name" => {
                let name = value.trim();
                if !name.is_empty() {
                    config.display_name = name.to_string();
                }
            }
            _ => {}
        }
    }

    Some(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_pairing() {
        let cfg =
            parse_pairing("gestureos://pair?pc=192.168.5.5&http=8081&udp=39500&name=DESK").unwrap();
        assert_eq!(cfg.host, "192.168.5.5");
        assert_eq!(cfg.stream_port, 8081);
        assert_eq!(cfg.control_port, 39500);
        assert_eq!(cfg.display_name, "DESK");
        assert!(cfg.is_valid());
        assert_eq!(cfg.stream_url(), "http://192.168.5.5:8081/mjpeg");
    }

    #[test]
    fn test_parse_scheme_is_case_insensitive() {
        let cfg = parse_pairing("GESTUREOS://PAIR?pc=10.0.0.2&http=80&udp=39500").unwrap();
        assert_eq!(cfg.host, "10.0.0.2");
        assert_eq!(cfg.display_name, "PC");
        assert!(cfg.is_valid());
    }

    #[test]
    fn test_parse_rejects_other_uris() {
        assert!(parse_pairing("http://pair?pc=1.2.3.4&http=80&udp=39500").is_none());
        assert!(parse_pairing("gestureos://other?pc=1.2.3.4").is_none());
        assert!(parse_pairing("not a uri at all").is_none());
        assert!(parse_pairing("").is_none());
    }

    #[test]
    fn test_missing_ports_fail_validity() {
        let cfg = parse_pairing("gestureos://pair?pc=1.2.3.4").unwrap();
        assert!(!cfg.is_valid());

        let cfg = parse_pairing("gestureos://pair?pc=1.2.3.4&http=8081&udp=99999").unwrap();
        assert!(!cfg.is_valid());
    }

    #[test]
    fn test_empty_host_invalid() {
        let cfg = PairingConfig::default();
        assert!(!cfg.is_valid());
    }
}
