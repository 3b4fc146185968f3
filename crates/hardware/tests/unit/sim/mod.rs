/// Fibonacci end to end, as raw words and as structured instructions.
pub mod fibonacci;

/// Program placement, relocation and symbol lookup.
pub mod program;
