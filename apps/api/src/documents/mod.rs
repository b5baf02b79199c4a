// Document ingestion: multipart parsing and text extraction.
// Nothing here touches session state or the LLM.

pub mod extract;
pub mod upload;
