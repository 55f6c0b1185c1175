pub mod login;
pub mod popups;
pub mod returns;

use shopwright_common::ResolveError;
use thiserror::Error;

pub use login::{LoginFlow, LoginReport, OtpProvider, StaticOtp};
pub use popups::{DismissalReport, PopupDismisser};
pub use returns::{ActionReport, ReturnFlow};

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Step '{goal}' failed: {source}")]
    Step {
        goal: String,
        #[source]
        source: ResolveError,
    },

    #[error("OTP unavailable: {0}")]
    Otp(String),
}
