use crate::connection::ConnId;
use crate::state::ServerState;

/// `PING [token]`. Never requires registration.
pub(super) fn handle(state: &mut ServerState, id: ConnId, params: &[String]) {
    let token = params.first().cloned().unwrap_or_else(|| "token".to_string());
    let server_name = state.server_name.clone();
    state.send_line(id, &format!(":{server_name} PONG {server_name} :{token}\r\n"));
}
