//! Event names emitted by the stores

use badgeflow::EventName;

pub const DATA_UPDATED: EventName = EventName::new("DATA_UPDATED");
pub const API_STORE_FAILURE: EventName = EventName::new("API_STORE_FAILURE");
pub const ACTIVE_ACTION_UPDATED: EventName = EventName::new("ACTIVE_ACTION_UPDATED");
pub const ROUTE_CHANGED: EventName = EventName::new("ROUTE_CHANGED");
pub const INITIAL_DATA_LOADED: EventName = EventName::new("INITIAL_DATA_LOADED");
pub const UNCAUGHT_DOCUMENT_CLICK: EventName = EventName::new("UNCAUGHT_DOCUMENT_CLICK");
pub const OPEN_DIALOG: EventName = EventName::new("OPEN_DIALOG");
pub const CLOSE_MODAL: EventName = EventName::new("CLOSE_MODAL");

/// `DATA_UPDATED_{collection}`
pub fn data_updated_for(collection: &str) -> EventName {
    EventName::scoped("DATA_UPDATED", collection)
}

/// `FORM_DATA_UPDATED_{form_id}`
pub fn form_data_updated(form_id: &str) -> EventName {
    EventName::scoped("FORM_DATA_UPDATED", form_id)
}
