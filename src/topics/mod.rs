// Topic accumulation — registry, round instructions, prompts, and the miner.

pub mod instructions;
pub mod miner;
pub mod prompt;
pub mod registry;
