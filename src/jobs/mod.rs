pub mod push_consumer;
