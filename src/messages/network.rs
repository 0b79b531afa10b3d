//! Network messages - communication between App and Network layers

use crate::assembler::RequestDescriptor;
use crate::models::ResponseOutcome;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Execute an assembled request
    Execute {
        id: u64,
        descriptor: RequestDescriptor,
    },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
///
/// Every response carries the generation id of the send that produced it;
/// the App layer drops anything tagged with a stale id.
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    Completed { id: u64, outcome: ResponseOutcome },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Completed { id, .. } => *id,
        }
    }
}
