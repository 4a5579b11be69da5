//! Console logging setup.
//!
//! Library code logs through the `log` facade. In the browser the facade is
//! routed to the devtools console by `console_log`; development builds log
//! at `Debug`, production builds only surface warnings and errors.

#[cfg(test)]
#[path = "logging_test.rs"]
mod logging_test;

use crate::config::BuildEnvironment;

/// Maximum log level for a build flavor.
#[must_use]
pub fn level_for(environment: BuildEnvironment) -> log::Level {
    if environment.is_development() {
        log::Level::Debug
    } else {
        log::Level::Warn
    }
}

/// Install the console logger and panic hook. Safe to call more than once.
#[cfg_attr(not(feature = "csr"), expect(unused_variables))]
pub fn init(environment: BuildEnvironment) {
    #[cfg(feature = "csr")]
    {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(level_for(environment)).is_err() {
            log::debug!("console logger already installed");
        }
    }
}
