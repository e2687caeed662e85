pub mod dashboard;
pub mod health;
pub mod revise;
pub mod ws;

use crate::AppState;

/// Tells connected dashboards to refetch.
pub(crate) fn broadcast_change(state: &AppState, source: &str) {
    if let Some(tx) = state.ws_tx.as_ref() {
        let msg = serde_json::json!({
            "type": "dashboard_changed",
            "source": source,
        });
        // No subscribers is not an error.
        let _ = tx.send(msg.to_string());
    }
}
