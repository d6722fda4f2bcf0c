//! Reducers for the CEP lookup flow.
//!
//! [`LookupReducer`] owns the lookup state and its persistence;
//! [`WidgetReducer`] runs the popup state machine and submits through the
//! lookup store.

pub mod lookup;
pub mod widget;

pub use lookup::LookupReducer;
pub use widget::{CLOSE_TIMER, Popup, WidgetReducer, WidgetState, WidgetView};
