/// Demonstration runs of the plug-flow reactor model, selected by task number
pub mod pfr_examples;
