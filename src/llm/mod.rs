// LLM completion layer — one request/response exchange per call.
//
// `traits` defines the backend seam; `client` is the OpenAI implementation.

pub mod client;
pub mod traits;
