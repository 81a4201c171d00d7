//! Convenient Macros for creating event logs
///
/// Creates an [`EventLog`](crate::core::event_data::case_centric::EventLog).
///
/// Traces are denoted by `trace id => [events...]`, separated by commas.
///
/// # Examples
///
/// ```rust
/// use dcr_mining::event_log;
///
/// let log = event_log!(
///     "1" => ["a", "b", "c"],
///     "2" => ["a", "c"],
///     "3" => [],
/// );
/// assert_eq!(log.traces.len(), 3);
/// ```
#[macro_export]
macro_rules! event_log {
    ( $( $trace_id:expr => [ $( $event:expr ),* $(,)? ] ),* $(,)? ) => {{
        #[allow(unused_mut)]
        let mut log = $crate::core::event_data::case_centric::EventLog::new();
        $(
            let trace: ::std::vec::Vec<::std::string::String> =
                ::std::vec![ $( ::std::string::ToString::to_string(&$event) ),* ];
            log.add_trace($trace_id, trace);
        )*
        log
    }};
}
