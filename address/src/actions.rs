//! Actions for the lookup store and the widget.

use crate::error::LookupError;
use crate::state::AddressRecord;

/// Lookup store actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupAction {
    /// Command: look up the typed code
    FetchByCode {
        /// Raw user input, possibly with punctuation
        input: String,
    },

    /// Event: the provider resolved `code`
    LookupSucceeded {
        /// Display form of the code that was requested
        code: String,
        /// Resolved address
        record: AddressRecord,
    },

    /// Event: the lookup of `code` failed
    LookupFailed {
        /// Display form of the code that was requested
        code: String,
        /// Why it failed
        error: LookupError,
    },

    /// Command: reset to the initial state
    Clear,

    /// Command: drop the error message, keep everything else
    ClearError,
}

impl LookupAction {
    /// Settle a lookup of `code` from the provider's result.
    #[must_use]
    pub fn settled(code: String, result: Result<AddressRecord, LookupError>) -> Self {
        match result {
            Ok(record) => Self::LookupSucceeded { code, record },
            Err(error) => Self::LookupFailed { code, error },
        }
    }
}

/// Widget actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetAction {
    /// Pointer entered the trigger or the popup
    PointerEntered,

    /// Pointer left the trigger or the popup
    PointerLeft,

    /// The close delay ran out
    CloseTimerElapsed {
        /// Timer the firing belongs to; older timers are ignored
        generation: u64,
    },

    /// The user dismissed the popup
    CloseRequested,

    /// The input text changed
    InputChanged {
        /// Text as typed
        value: String,
    },

    /// The user confirmed the typed code
    Submit,

    /// The widget is going away
    Disposed,

    /// The lookup started by a submit has settled in the store
    LookupSettled {
        /// The store now holds a valid address and no error
        resolved: bool,
    },
}
