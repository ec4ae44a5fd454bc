//! Structured ping sample as emitted by `jc --ping`

use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};

/// Packet counts (and optional timing summary) of one probe execution.
///
/// Only the two counters are required; the formatter emits more fields,
/// which are kept when present for reporting and otherwise ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeSample {
    pub packets_transmitted: u32,
    pub packets_received: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_ip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet_loss_percent: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_trip_ms_min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_trip_ms_avg: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_trip_ms_max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_trip_ms_stddev: Option<f64>,
}

impl ProbeSample {
    /// Sample with only the packet counters set
    pub fn new(packets_transmitted: u32, packets_received: u32) -> Self {
        Self {
            packets_transmitted,
            packets_received,
            destination_ip: None,
            packet_loss_percent: None,
            duplicates: None,
            round_trip_ms_min: None,
            round_trip_ms_avg: None,
            round_trip_ms_max: None,
            round_trip_ms_stddev: None,
        }
    }

    /// Parse the formatter's JSON document.
    ///
    /// A sample claiming more received than transmitted packets is rejected
    /// rather than clamped.
    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        let sample: ProbeSample = serde_json::from_str(raw.trim())?;
        sample.validate()?;
        Ok(sample)
    }

    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.packets_received > self.packets_transmitted {
            return Err(ProtocolError::ReceivedExceedsTransmitted {
                transmitted: self.packets_transmitted,
                received: self.packets_received,
            });
        }
        Ok(())
    }

    /// Number of packets that did not come back
    pub fn lost(&self) -> u32 {
        self.packets_transmitted.saturating_sub(self.packets_received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JC_OUTPUT: &str = r#"{
        "destination_ip": "192.0.2.10",
        "data_bytes": 56,
        "pattern": null,
        "destination": "192.0.2.10",
        "packets_transmitted": 5,
        "packets_received": 4,
        "packet_loss_percent": 20.0,
        "duplicates": 0,
        "time_ms": 4005.0,
        "round_trip_ms_min": 0.321,
        "round_trip_ms_avg": 0.402,
        "round_trip_ms_max": 0.511,
        "round_trip_ms_stddev": 0.061,
        "responses": [
            {"type": "reply", "timestamp": null, "bytes": 64, "response_ip": "192.0.2.10",
             "icmp_seq": 1, "ttl": 64, "time_ms": 0.321, "duplicate": false}
        ]
    }"#;

    #[test]
    fn test_parse_jc_output() {
        let sample = ProbeSample::from_json(JC_OUTPUT).unwrap();
        assert_eq!(sample.packets_transmitted, 5);
        assert_eq!(sample.packets_received, 4);
        assert_eq!(sample.lost(), 1);
        assert_eq!(sample.destination_ip.as_deref(), Some("192.0.2.10"));
        assert_eq!(sample.round_trip_ms_avg, Some(0.402));
    }

    #[test]
    fn test_parse_total_loss_with_null_timings() {
        let raw = r#"{"destination_ip": "192.0.2.99", "packets_transmitted": 5,
            "packets_received": 0, "packet_loss_percent": 100.0,
            "round_trip_ms_min": null, "round_trip_ms_avg": null}"#;
        let sample = ProbeSample::from_json(raw).unwrap();
        assert_eq!(sample.packets_received, 0);
        assert_eq!(sample.lost(), 5);
        assert_eq!(sample.round_trip_ms_min, None);
    }

    #[test]
    fn test_parse_rejects_plain_text() {
        let raw = "ping: unknown host nowhere.invalid";
        assert!(matches!(
            ProbeSample::from_json(raw),
            Err(ProtocolError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_counters() {
        let raw = r#"{"destination_ip": "192.0.2.10", "packets_transmitted": 5}"#;
        assert!(ProbeSample::from_json(raw).is_err());
    }

    #[test]
    fn test_parse_rejects_received_above_transmitted() {
        let raw = r#"{"packets_transmitted": 3, "packets_received": 4}"#;
        match ProbeSample::from_json(raw) {
            Err(ProtocolError::ReceivedExceedsTransmitted { transmitted, received }) => {
                assert_eq!(transmitted, 3);
                assert_eq!(received, 4);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
