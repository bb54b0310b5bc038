/// Integration tests running the tools against real storage
mod persistence_tests;
mod tool_workflow_tests;
