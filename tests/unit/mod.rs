/// Unit tests for the streak engine and its supporting types
mod engine_tests;
mod property_tests;
