use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

lazy_static! {
    /// Answered questions by where the context came from (vector_search, transcript, placeholder).
    pub static ref QA_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "learning_qa_requests_total",
        "Questions answered segmented by context source",
        &["source"]
    )
    .expect("failed to register learning_qa_requests_total");

    /// LLM completion latency by provider and outcome.
    pub static ref LLM_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "learning_llm_request_duration_seconds",
        "LLM completion latency segmented by provider and result",
        &["provider", "result"],
        vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
    )
    .expect("failed to register learning_llm_request_duration_seconds");

    /// Vector store lookups that fell back to the full transcript, by reason.
    pub static ref VECTOR_FALLBACK_TOTAL: IntCounterVec = register_int_counter_vec!(
        "learning_vector_fallback_total",
        "Vector store lookups that fell back to the transcript segmented by reason",
        &["reason"]
    )
    .expect("failed to register learning_vector_fallback_total");

    /// Seconds of video reported watched by students.
    pub static ref WATCH_SECONDS_TOTAL: IntCounter = register_int_counter!(
        "learning_watch_seconds_total",
        "Total seconds of lecture video reported as watched"
    )
    .expect("failed to register learning_watch_seconds_total");
}
