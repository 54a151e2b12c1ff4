pub mod invocation_reader;
