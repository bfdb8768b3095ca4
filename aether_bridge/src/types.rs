//! Frames sent to the shell over WebSocket.
//! Keep this module minimal and stable; it defines the wire format.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum Frame {
    // kernel JSON is forwarded untouched
    #[serde(rename = "DATA")]
    Data(serde_json::Value),
    #[serde(rename = "LOG")]
    Log(String),
}

impl Frame {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape() {
        let log = Frame::Log("[*] Bridge Active".into()).to_json().unwrap();
        assert_eq!(log, r#"{"type":"LOG","payload":"[*] Bridge Active"}"#);
        let data = Frame::Data(serde_json::json!({"memory": {"used_kb": 8}}))
            .to_json()
            .unwrap();
        assert_eq!(data, r#"{"type":"DATA","payload":{"memory":{"used_kb":8}}}"#);
    }
}
