//! ---
//! acts_section: "03-logging-metrics"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Structured logging context and convenience macros."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---

#[doc(hidden)]
#[macro_export]
macro_rules! __acts_event {
    ($level:expr, $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            $level,
            suite = ctx.suite.unwrap_or(""),
            case = ctx.case.unwrap_or(""),
            object = ctx.target.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit an informational log enriched with suite/case context.
#[macro_export]
macro_rules! acts_info {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__acts_event!(tracing::Level::INFO, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__acts_event!(tracing::Level::INFO, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a debug log enriched with suite/case context.
#[macro_export]
macro_rules! acts_debug {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__acts_event!(tracing::Level::DEBUG, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__acts_event!(tracing::Level::DEBUG, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a warning enriched with suite/case context.
#[macro_export]
macro_rules! acts_warn {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__acts_event!(tracing::Level::WARN, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__acts_event!(tracing::Level::WARN, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit an error log enriched with suite/case context.
#[macro_export]
macro_rules! acts_error {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__acts_event!(tracing::Level::ERROR, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__acts_event!(tracing::Level::ERROR, $crate::LogContext::default(), $($arg)+)
    };
}
