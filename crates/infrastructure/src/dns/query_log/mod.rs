mod tracing_writer;

pub use tracing_writer::TracingQueryLogWriter;
