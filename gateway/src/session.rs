//! Session/challenge issuance
//!
//! Two independent random tokens per call. The engine never stores
//! them; they only exist to be signed over by the client.

use crate::models::SessionResponse;
use rand::RngCore;

fn random_token() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn issue_session() -> SessionResponse {
    SessionResponse {
        session_id: random_token(),
        challenge: random_token(),
    }
}
