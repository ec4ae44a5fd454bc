//! Verdict classification of a single probe

use crate::error::ProtocolError;
use crate::sample::ProbeSample;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of one probe, compared by its exact upper-case identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "FAIL")]
    Fail,
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FLAPPING")]
    Flapping,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Fail => "FAIL",
            Verdict::Success => "SUCCESS",
            Verdict::Flapping => "FLAPPING",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FAIL" => Ok(Verdict::Fail),
            "SUCCESS" => Ok(Verdict::Success),
            "FLAPPING" => Ok(Verdict::Flapping),
            other => Err(ProtocolError::UnknownVerdict(other.to_string())),
        }
    }
}

/// Classify a sample against the tolerated packet loss.
///
/// Total loss is FAIL regardless of `max_drop`. Otherwise loss up to and
/// including `max_drop` is SUCCESS and anything above is FLAPPING.
pub fn classify(sample: &ProbeSample, max_drop: u32) -> Verdict {
    if sample.packets_received == 0 {
        return Verdict::Fail;
    }
    if sample.lost() <= max_drop {
        Verdict::Success
    } else {
        Verdict::Flapping
    }
}
