use crate::connection::ConnId;
use crate::state::ServerState;

use super::part;

/// `QUIT [:reason]`.
///
/// Compatibility quirk preserved from the original implementation: if
/// the first parameter begins with `#`, this is treated exactly as a
/// PART with the same parameters and the connection is left open.
/// Otherwise the connection is disconnected with the given reason (or
/// `"Quit"` if none was given).
pub(super) fn handle(state: &mut ServerState, id: ConnId, params: &[String]) {
    if params.first().is_some_and(|p| p.starts_with('#')) {
        part::handle(state, id, params);
        return;
    }
    let reason = params.first().cloned().unwrap_or_else(|| "Quit".to_string());
    state.disconnect(id, &reason);
}
