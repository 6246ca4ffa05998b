// Gleaner: iterative LLM topic mining for tweet corpora
//
// This is the library root. Each module corresponds to a stage of the
// topic-mining pipeline.

pub mod config;
pub mod corpus;
pub mod llm;
pub mod output;
pub mod topics;
