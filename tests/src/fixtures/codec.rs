//! Codec that carries frames as JSON.

use shared_types::clusters;
use shared_types::{ClusterCodec, CodecError, ZclCommand, ZclFrame};

pub struct JsonCodec;

impl ClusterCodec for JsonCodec {
    fn decode(&self, cluster_id: u16, payload: &[u8]) -> Result<ZclFrame, CodecError> {
        serde_json::from_slice(payload).map_err(|e| CodecError::Malformed {
            cluster_id,
            reason: e.to_string(),
        })
    }

    fn encode(&self, cluster_id: u16, frame: &ZclFrame) -> Result<Vec<u8>, CodecError> {
        if let ZclCommand::Unknown(_) = frame.command {
            return Err(CodecError::Unsupported {
                cluster_id,
                command_id: frame.command_id,
            });
        }
        serde_json::to_vec(frame).map_err(|e| CodecError::Malformed {
            cluster_id,
            reason: e.to_string(),
        })
    }

    fn cluster_name(&self, cluster_id: u16) -> Option<String> {
        clusters::well_known_name(cluster_id).map(str::to_string)
    }
}
