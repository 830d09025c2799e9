//! Advisory slow-path diagnostics.
//!
//! `perf_warning!` records that an operation left the native register path (a scalar
//! tail, or a limb operation the instruction set has no instruction for). Each call
//! site logs at most once per process, and only when the `perf-warnings` feature is
//! enabled; otherwise the macro expands to nothing. It never changes results.

#[cfg(feature = "perf-warnings")]
macro_rules! perf_warning {
    ($($arg:tt)+) => {{
        static ONCE: ::std::sync::Once = ::std::sync::Once::new();
        ONCE.call_once(|| {
            ::log::warn!(target: "simdvec::perf", $($arg)+);
        });
    }};
}

#[cfg(not(feature = "perf-warnings"))]
macro_rules! perf_warning {
    ($($arg:tt)+) => {{
        if false {
            ::log::trace!(target: "simdvec::perf", $($arg)+);
        }
    }};
}
