//! Console logging macros
//!
//! In the browser: forwards to `console.log` / `console.warn` via web-sys.
//! Natively (tests, benches): the message is type-checked but never formatted,
//! because web-sys imports panic outside of wasm.
//!
//! Usage:
//! ```rust
//! use tumble_engine::console_log;
//!
//! let id = 7;
//! console_log!("entity {} created", id);
//! ```

/// Log an informational line to the browser console.
#[macro_export]
macro_rules! console_log {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        {
            ::web_sys::console::log_1(&::std::format!($($arg)*).into());
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = || ::std::format!($($arg)*);
        }
    }};
}

/// Log a warning (contract violations that are tolerated in release builds).
#[macro_export]
macro_rules! console_warn {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        {
            ::web_sys::console::warn_1(&::std::format!($($arg)*).into());
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = || ::std::format!($($arg)*);
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn macros_are_silent_natively() {
        let id = 3u32;
        crate::console_log!("entity {} created", id);
        crate::console_warn!("entity {} updated after destroy", id);
    }
}
