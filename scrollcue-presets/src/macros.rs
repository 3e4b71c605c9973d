#[cfg(feature = "tracing")]
macro_rules! sc_trace {
    ($($tt:tt)*) => {
        tracing::trace!(target: "scrollcue_presets", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! sc_trace {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! sc_debug {
    ($($tt:tt)*) => {
        tracing::debug!(target: "scrollcue_presets", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! sc_debug {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! sc_warn {
    ($($tt:tt)*) => {
        tracing::warn!(target: "scrollcue_presets", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! sc_warn {
    ($($tt:tt)*) => {};
}
