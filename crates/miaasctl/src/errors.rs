//! Exit codes for the one-shot commands

use miaas_common::FetchError;

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors (bad config, unknown node)
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the control-plane returns a body that is not a node list
pub const EXIT_INVALID_RESPONSE: i32 = 65;

/// Exit code when the control-plane is unreachable or answers with an error status
pub const EXIT_CONTROL_PLANE_UNAVAILABLE: i32 = 70;

pub fn exit_code_for(err: &FetchError) -> i32 {
    match err {
        FetchError::Transport(_) | FetchError::Status(_) => EXIT_CONTROL_PLANE_UNAVAILABLE,
        FetchError::Parse(_) => EXIT_INVALID_RESPONSE,
        FetchError::NotFound(_) | FetchError::InvalidUrl(_) => EXIT_GENERAL_ERROR,
    }
}
